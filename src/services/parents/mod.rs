pub mod children;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::SchoolDeskError;
use crate::middlewares::RequireJWT;
use crate::models::parents::requests::{
    CreateParentRequest, ParentListParams, UpdateParentRequest,
};
use crate::models::teachers::entities::SecretKeyResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::activity::log_activity;
use crate::storage::Storage;
use crate::utils::validate::{PARENT_SECRET_KEY_LEN, validate_email};

pub struct ParentService {
    storage: Option<Arc<dyn Storage>>,
}

impl ParentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_parents(
        &self,
        query: ParentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_parents_with_pagination(query).await {
            Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "家长列表获取成功"))),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 创建档案时生成 6 位注册密钥
    pub async fn create_parent(
        &self,
        mut req: CreateParentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.name = req.name.trim().to_string();
        if req.name.is_empty() {
            return Ok(super::bad_request(
                ErrorCode::ValidationFailed,
                "Parent name is required",
            ));
        }
        if let Some(email) = &req.email
            && let Err(msg) = validate_email(email)
        {
            return Ok(super::bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        if let Some(resp) = check_student(&storage, req.student_id).await {
            return Ok(resp);
        }

        let secret_key = match generate_secret_key(&storage).await {
            Ok(key) => key,
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        match storage.create_parent(req, &secret_key).await {
            Ok(parent) => {
                log_activity(
                    &storage,
                    "parent",
                    format!("Parent {} created", parent.name),
                    RequireJWT::extract_user_id(request),
                    Some(request),
                )
                .await;
                Ok(HttpResponse::Created().json(ApiResponse::success(parent, "家长创建成功")))
            }
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn get_parent(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_parent_by_id(id).await {
            Ok(Some(parent)) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(parent, "家长获取成功")))
            }
            Ok(None) => Ok(parent_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn update_parent(
        &self,
        id: i64,
        mut update: UpdateParentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(name) = update.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Ok(super::bad_request(
                    ErrorCode::ValidationFailed,
                    "Parent name is required",
                ));
            }
        }
        if let Some(email) = &update.email
            && let Err(msg) = validate_email(email)
        {
            return Ok(super::bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        if let Some(resp) = check_student(&storage, update.student_id).await {
            return Ok(resp);
        }

        match storage.update_parent(id, update).await {
            Ok(Some(parent)) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(parent, "家长更新成功")))
            }
            Ok(None) => Ok(parent_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn delete_parent(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_parent(id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("家长删除成功"))),
            Ok(false) => Ok(parent_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    pub async fn regenerate_secret_key(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        let secret_key = match generate_secret_key(&storage).await {
            Ok(key) => key,
            Err(e) => return Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        };

        match storage.set_parent_secret_key(id, &secret_key).await {
            Ok(Some(parent)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                SecretKeyResponse {
                    secret_key: parent.secret_key.unwrap_or(secret_key),
                },
                "注册密钥已重新生成",
            ))),
            Ok(None) => Ok(parent_not_found()),
            Err(e) => Ok(super::error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    // 当前家长账号关联的全部孩子
    pub async fn my_children(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        children::my_children(self, request).await
    }
}

async fn generate_secret_key(storage: &Arc<dyn Storage>) -> Result<String, SchoolDeskError> {
    super::unique_secret_key(PARENT_SECRET_KEY_LEN, |key| {
        let storage = storage.clone();
        async move { Ok(storage.get_parent_by_secret_key(&key).await?.is_some()) }
    })
    .await
}

async fn check_student(storage: &Arc<dyn Storage>, student_id: Option<i64>) -> Option<HttpResponse> {
    let student_id = student_id?;
    match storage.get_student_by_id(student_id).await {
        Ok(Some(_)) => None,
        Ok(None) => Some(super::students::student_not_found()),
        Err(e) => Some(super::error_response(&e, ErrorCode::InternalServerError)),
    }
}

fn parent_not_found() -> HttpResponse {
    super::not_found(ErrorCode::ParentNotFound, "Parent not found")
}
