use crate::models::*;
use crate::services::VehicleService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/owners",
    tag = "vehicles",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Owners ordered by name")
    )
)]
pub async fn list_owners(
    vehicle_service: web::Data<VehicleService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match vehicle_service.list_owners(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "vehicles",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Vehicles ordered by plate number")
    )
)]
pub async fn list_vehicles(
    vehicle_service: web::Data<VehicleService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match vehicle_service.list_vehicles(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn vehicle_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/owners", web::get().to(list_owners))
        .route("/vehicles", web::get().to(list_vehicles));
}
