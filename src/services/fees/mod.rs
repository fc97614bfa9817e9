pub mod analytics;
pub mod class_fees;
pub mod discounts;
pub mod fee_types;
pub mod fees;
pub mod ledger;
pub mod payments;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::PaginationQuery;
use crate::models::fees::requests::{
    AdjustClassFeeRequest, ClassFeeListParams, CreateDiscountRequest, CreateFeeRequest,
    CreateFeeTypeRequest, DiscountListParams, FeeListParams, RecordPaymentRequest,
    SetupClassFeeRequest, UpdateFeeRequest, UpdateFeeTypeRequest,
};
use crate::storage::Storage;

pub use ledger::fee_details;

pub struct FeeService {
    storage: Option<Arc<dyn Storage>>,
}

impl FeeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 费用类型
    pub async fn list_fee_types(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        fee_types::list_fee_types(self, request).await
    }

    pub async fn create_fee_type(
        &self,
        req: CreateFeeTypeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fee_types::create_fee_type(self, req, request).await
    }

    pub async fn get_fee_type(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        fee_types::get_fee_type(self, id, request).await
    }

    pub async fn update_fee_type(
        &self,
        id: i64,
        update: UpdateFeeTypeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fee_types::update_fee_type(self, id, update, request).await
    }

    pub async fn toggle_fee_type(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fee_types::toggle_fee_type(self, id, request).await
    }

    pub async fn delete_fee_type(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fee_types::delete_fee_type(self, id, request).await
    }

    // 费用
    pub async fn list_fees(
        &self,
        query: FeeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fees::list_fees(self, query, request).await
    }

    pub async fn create_fee(
        &self,
        req: CreateFeeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fees::create_fee(self, req, request).await
    }

    pub async fn get_fee(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        fees::get_fee(self, id, request).await
    }

    pub async fn update_fee(
        &self,
        id: i64,
        update: UpdateFeeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fees::update_fee(self, id, update, request).await
    }

    pub async fn delete_fee(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        fees::delete_fee(self, id, request).await
    }

    pub async fn fee_summary(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        fees::fee_summary(self, id, request).await
    }

    pub async fn student_fees(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fees::student_fees(self, student_id, request).await
    }

    // 班级收费标准
    pub async fn list_class_fees(
        &self,
        classroom_id: i64,
        query: ClassFeeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        class_fees::list_class_fees(self, classroom_id, query, request).await
    }

    pub async fn setup_class_fee(
        &self,
        classroom_id: i64,
        req: SetupClassFeeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        class_fees::setup_class_fee(self, classroom_id, req, request).await
    }

    pub async fn adjust_class_fee(
        &self,
        classroom_id: i64,
        class_fee_id: i64,
        req: AdjustClassFeeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        class_fees::adjust_class_fee(self, classroom_id, class_fee_id, req, request).await
    }

    pub async fn generate_class_fees(
        &self,
        classroom_id: i64,
        query: ClassFeeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        class_fees::generate_class_fees(self, classroom_id, query, request).await
    }

    // 折扣
    pub async fn list_discounts(
        &self,
        query: DiscountListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        discounts::list_discounts(self, query, request).await
    }

    pub async fn create_discount(
        &self,
        req: CreateDiscountRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        discounts::create_discount(self, req, request).await
    }

    pub async fn deactivate_discount(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        discounts::deactivate_discount(self, id, request).await
    }

    // 缴费与收据
    pub async fn record_payment(
        &self,
        fee_id: i64,
        req: RecordPaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payments::record_payment(self, fee_id, req, request).await
    }

    pub async fn list_receipts(
        &self,
        query: PaginationQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payments::list_receipts(self, query, request).await
    }

    pub async fn get_receipt(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        payments::get_receipt(self, id, request).await
    }

    // 收费统计
    pub async fn analytics(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        analytics::fee_analytics(self, request).await
    }
}
