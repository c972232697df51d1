use crate::models::*;
use crate::services::DashboardService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use chrono::Utc;
use serde_json::json;

#[utoipa::path(
    get,
    path = "/dashboard/stats",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Point-in-time lot statistics", body = DashboardStats)
    )
)]
pub async fn get_stats(dashboard_service: web::Data<DashboardService>) -> Result<HttpResponse> {
    match dashboard_service.get_stats(Utc::now()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/dashboard/slots",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Slot occupancy and availability", body = SlotAvailability)
    )
)]
pub async fn get_slots(dashboard_service: web::Data<DashboardService>) -> Result<HttpResponse> {
    match dashboard_service.get_slot_availability().await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard")
            .route("/stats", web::get().to(get_stats))
            .route("/slots", web::get().to(get_slots)),
    );
}
