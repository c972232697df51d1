use crate::models::*;
use crate::services::SessionService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/sessions/entry",
    tag = "sessions",
    request_body = VehicleEntryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Vehicle entered", body = EntryResponse),
        (status = 400, description = "Invalid plate number"),
        (status = 409, description = "Vehicle is already parked inside")
    )
)]
pub async fn vehicle_entry(
    session_service: web::Data<SessionService>,
    request: web::Json<VehicleEntryRequest>,
) -> Result<HttpResponse> {
    match session_service.record_entry(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/sessions/exit",
    tag = "sessions",
    request_body = VehicleExitRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Vehicle exited with fee settled", body = ExitResponse),
        (status = 404, description = "No active entry for this vehicle")
    )
)]
pub async fn vehicle_exit(
    session_service: web::Data<SessionService>,
    request: web::Json<VehicleExitRequest>,
) -> Result<HttpResponse> {
    match session_service.record_exit(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/sessions",
    tag = "sessions",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Parking sessions, newest first")
    )
)]
pub async fn list_sessions(
    session_service: web::Data<SessionService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match session_service.list_sessions(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/sessions/recent",
    tag = "sessions",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Five most recent sessions")
    )
)]
pub async fn recent_sessions(session_service: web::Data<SessionService>) -> Result<HttpResponse> {
    match session_service.recent_sessions().await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn session_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sessions")
            .route("/entry", web::post().to(vehicle_entry))
            .route("/exit", web::post().to(vehicle_exit))
            .route("/recent", web::get().to(recent_sessions))
            .route("", web::get().to(list_sessions)),
    );
}
