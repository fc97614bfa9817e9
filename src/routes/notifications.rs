use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::notifications::requests::{
    InboxParams, NotificationListParams, SendMessageRequest, SendNotificationRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{MessageService, NotificationService};
use crate::utils::{SafeIDI64, SafeUserIdI64};

static NOTIFICATION_SERVICE: Lazy<NotificationService> =
    Lazy::new(NotificationService::new_lazy);
static MESSAGE_SERVICE: Lazy<MessageService> = Lazy::new(MessageService::new_lazy);

pub async fn list_notifications(
    req: HttpRequest,
    query: web::Query<NotificationListParams>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .list_notifications(query.into_inner(), &req)
        .await
}

pub async fn notification_unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.unread_count(&req).await
}

pub async fn mark_read(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.mark_read(id.0, &req).await
}

pub async fn mark_all_read(req: HttpRequest) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.mark_all_read(&req).await
}

pub async fn send_notification(
    req: HttpRequest,
    body: web::Json<SendNotificationRequest>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.send(body.into_inner(), &req).await
}

pub async fn send_message(
    req: HttpRequest,
    body: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.send_message(body.into_inner(), &req).await
}

pub async fn inbox(
    req: HttpRequest,
    query: web::Query<InboxParams>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.inbox(query.into_inner(), &req).await
}

pub async fn conversation(req: HttpRequest, user_id: SafeUserIdI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.conversation(user_id.0, &req).await
}

pub async fn message_unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.unread_count(&req).await
}

// 配置路由
pub fn configure_notification_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notifications")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_notifications))
            .route("/unread-count", web::get().to(notification_unread_count))
            .route("/read-all", web::post().to(mark_all_read))
            .service(
                web::resource("/send").route(
                    web::post()
                        .to(send_notification)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .route("/{id}/read", web::post().to(mark_read)),
    );

    cfg.service(
        web::scope("/api/v1/messages")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(inbox))
            .route("", web::post().to(send_message))
            .route("/unread-count", web::get().to(message_unread_count))
            .route("/conversations/{user_id}", web::get().to(conversation)),
    );
}
