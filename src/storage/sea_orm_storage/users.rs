//! 用户账号存储操作

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

fn query_failed(e: sea_orm::DbErr) -> SchoolDeskError {
    SchoolDeskError::database_operation(format!("查询用户失败: {e}"))
}

/// 新账号一律为 active；注册开户与管理员创建共用
pub(super) fn new_user_model(req: CreateUserRequest, now: i64) -> ActiveModel {
    ActiveModel {
        username: Set(req.username),
        email: Set(req.email),
        password_hash: Set(req.password),
        role: Set(req.role.to_string()),
        status: Set(UserStatus::Active.to_string()),
        display_name: Set(req.display_name),
        phone: Set(req.phone),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// 在给定连接（或事务）上插入用户
pub(super) async fn insert_user<C: ConnectionTrait>(
    conn: &C,
    req: CreateUserRequest,
    now: i64,
) -> Result<User> {
    new_user_model(req, now)
        .insert(conn)
        .await
        .map(|m| m.into_user())
        .map_err(|e| SchoolDeskError::database_operation(format!("创建用户失败: {e}")))
}

fn apply_list_filters(mut select: Select<Users>, query: &UserListQuery) -> Select<Users> {
    if let Some(search) = &query.search {
        let escaped = escape_like_pattern(search);
        select = select.filter(
            Condition::any()
                .add(Column::Username.contains(&escaped))
                .add(Column::Email.contains(&escaped))
                .add(Column::DisplayName.contains(&escaped)),
        );
    }
    if let Some(role) = &query.role {
        select = select.filter(Column::Role.eq(role.to_string()));
    }
    if let Some(status) = &query.status {
        select = select.filter(Column::Status.eq(status.to_string()));
    }
    select
}

impl SeaOrmStorage {
    async fn find_user(&self, condition: Condition) -> Result<Option<User>> {
        Users::find()
            .filter(condition)
            .one(&self.db)
            .await
            .map(|m| m.map(|m| m.into_user()))
            .map_err(query_failed)
    }

    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        insert_user(&self.db, req, chrono::Utc::now().timestamp()).await
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Id.eq(id))).await
    }

    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Username.eq(username)))
            .await
    }

    /// 邮箱按小写存储
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Email.eq(email.to_lowercase())))
            .await
    }

    /// 登录标识可以是用户名或邮箱
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        self.find_user(
            Condition::any()
                .add(Column::Username.eq(identifier))
                .add(Column::Email.eq(identifier.to_lowercase())),
        )
        .await
    }

    /// 最近创建的在前
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>> {
        let page = query.page.max(1) as u64;
        let size = query.size.clamp(1, 100) as u64;

        let paginator = apply_list_filters(Users::find(), &query)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(query_failed)?;
        let users = paginator.fetch_page(page - 1).await.map_err(query_failed)?;

        Ok(PaginatedResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 通知广播用：某角色下全部活跃账号
    pub async fn list_user_ids_by_role_impl(&self, role: UserRole) -> Result<Vec<i64>> {
        Users::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::Role.eq(role.to_string()))
            .filter(Column::Status.eq(UserStatus::Active.to_string()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_failed)
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                SchoolDeskError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 只写入请求中出现的字段；用户不存在时返回 None
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let Some(existing) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_failed)?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(display_name) = update.display_name {
            model.display_name = Set(Some(display_name));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        model
            .update(&self.db)
            .await
            .map(|m| Some(m.into_user()))
            .map_err(|e| SchoolDeskError::database_operation(format!("更新用户失败: {e}")))
    }

    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 启动时判断是否需要创建初始管理员
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find().count(&self.db).await.map_err(query_failed)
    }
}
