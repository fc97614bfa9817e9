//! 家长存储操作

use super::SeaOrmStorage;
use super::users::insert_user;
use crate::entity::parents::{ActiveModel, Column, Entity as Parents};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    parents::{
        entities::Parent,
        requests::{CreateParentRequest, ParentListParams, UpdateParentRequest},
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建家长档案
    pub async fn create_parent_impl(
        &self,
        req: CreateParentRequest,
        secret_key: &str,
    ) -> Result<Parent> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(None),
            student_id: Set(req.student_id),
            name: Set(req.name),
            email: Set(req.email),
            phone: Set(req.phone),
            address: Set(req.address),
            relation: Set(req.relation),
            secret_key: Set(Some(secret_key.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建家长失败: {e}")))?;

        Ok(result.into_parent())
    }

    pub async fn get_parent_by_id_impl(&self, id: i64) -> Result<Option<Parent>> {
        let result = Parents::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询家长失败: {e}")))?;

        Ok(result.map(|m| m.into_parent()))
    }

    pub async fn get_parent_by_secret_key_impl(&self, secret_key: &str) -> Result<Option<Parent>> {
        let result = Parents::find()
            .filter(Column::SecretKey.eq(secret_key))
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询家长失败: {e}")))?;

        Ok(result.map(|m| m.into_parent()))
    }

    /// 分页列出家长
    pub async fn list_parents_with_pagination_impl(
        &self,
        query: ParentListParams,
    ) -> Result<PaginatedResponse<Parent>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Parents::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::Phone.contains(&escaped)),
            );
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询家长总数失败: {e}")))?;
        let parents = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询家长列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: parents.into_iter().map(|m| m.into_parent()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 某个账号关联的全部家长档案
    pub async fn list_parents_by_user_id_impl(&self, user_id: i64) -> Result<Vec<Parent>> {
        let parents = Parents::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询家长失败: {e}")))?;

        Ok(parents.into_iter().map(|m| m.into_parent()).collect())
    }

    pub async fn update_parent_impl(
        &self,
        id: i64,
        update: UpdateParentRequest,
    ) -> Result<Option<Parent>> {
        if self.get_parent_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(student_id) = update.student_id {
            model.student_id = Set(Some(student_id));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(relation) = update.relation {
            model.relation = Set(Some(relation));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新家长失败: {e}")))?;

        self.get_parent_by_id_impl(id).await
    }

    pub async fn set_parent_secret_key_impl(
        &self,
        id: i64,
        secret_key: &str,
    ) -> Result<Option<Parent>> {
        if self.get_parent_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        ActiveModel {
            id: Set(id),
            secret_key: Set(Some(secret_key.to_string())),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("更新注册密钥失败: {e}")))?;

        self.get_parent_by_id_impl(id).await
    }

    pub async fn delete_parent_impl(&self, id: i64) -> Result<bool> {
        let result = Parents::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除家长失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 创建家长账号并关联档案
    pub async fn register_parent_account_impl(
        &self,
        parent_id: i64,
        user: CreateUserRequest,
    ) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("开启事务失败: {e}")))?;

        let parent = Parents::find_by_id(parent_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询家长失败: {e}")))?
            .ok_or_else(|| SchoolDeskError::not_found(format!("家长 {parent_id} 不存在")))?;
        if parent.user_id.is_some() {
            return Err(SchoolDeskError::conflict("该家长档案已关联账号"));
        }

        let created = insert_user(&txn, user, now).await?;

        ActiveModel {
            id: Set(parent_id),
            user_id: Set(Some(created.id)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("关联家长账号失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }
}
