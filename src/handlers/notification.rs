use crate::models::*;
use crate::services::NotificationService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Notifications, newest first")
    )
)]
pub async fn list_notifications(
    notification_service: web::Data<NotificationService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match notification_service
        .list_notifications(&query.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    tag = "notifications",
    params(
        ("id" = i64, Path, description = "Notification id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = NotificationResponse),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn mark_read(
    notification_service: web::Data<NotificationService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match notification_service.mark_read(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn notification_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(list_notifications))
            .route("/{id}/read", web::post().to(mark_read)),
    );
}
