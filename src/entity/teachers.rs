//! 教师档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
    pub subject: Option<String>,
    #[sea_orm(unique)]
    pub employee_id: Option<String>,
    pub date_of_joining: Option<Date>,
    #[sea_orm(unique)]
    pub secret_key: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    User,
    #[sea_orm(has_many = "super::teacher_leaves::Entity")]
    Leaves,
    #[sea_orm(has_many = "super::subjects::Entity")]
    Subjects,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::teacher_leaves::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leaves.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_teacher(self) -> crate::models::teachers::entities::Teacher {
        use crate::models::teachers::entities::{Teacher, TeacherStatus};
        use super::to_datetime;

        Teacher {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            qualification: self.qualification,
            subject: self.subject,
            employee_id: self.employee_id,
            date_of_joining: self.date_of_joining,
            secret_key: self.secret_key,
            status: self.status.parse().unwrap_or(TeacherStatus::Active),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
