use crate::models::*;
use crate::services::ExpiryService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use chrono::Utc;
use serde_json::json;

#[utoipa::path(
    post,
    path = "/admin/check-expiries",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Expiry sweep finished", body = ExpiryScanReport),
        (status = 500, description = "Sweep failed")
    )
)]
pub async fn check_expiries(expiry_service: web::Data<ExpiryService>) -> Result<HttpResponse> {
    match expiry_service.scan_expiries(Utc::now()).await {
        Ok(report) => {
            let message = format!(
                "Finished checking for expired passes. {} new notifications created.",
                report.notifications_created
            );
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": report,
                "message": message
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/admin").route("/check-expiries", web::post().to(check_expiries)));
}
