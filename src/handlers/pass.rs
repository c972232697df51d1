use crate::models::*;
use crate::services::PassService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use chrono::Utc;
use serde_json::json;

#[utoipa::path(
    post,
    path = "/passes",
    tag = "passes",
    request_body = CreatePassRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Pass created", body = CreatePassResponse),
        (status = 400, description = "Invalid plate number or owner name"),
        (status = 409, description = "Vehicle already has an active pass")
    )
)]
pub async fn create_pass(
    pass_service: web::Data<PassService>,
    request: web::Json<CreatePassRequest>,
) -> Result<HttpResponse> {
    match pass_service.create_pass(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/passes",
    tag = "passes",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Passes, newest first")
    )
)]
pub async fn list_passes(
    pass_service: web::Data<PassService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match pass_service.list_passes(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/passes/expiring",
    tag = "passes",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Active passes expiring within seven days")
    )
)]
pub async fn list_expiring(pass_service: web::Data<PassService>) -> Result<HttpResponse> {
    match pass_service.list_expiring(Utc::now()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn pass_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/passes")
            .route("", web::post().to(create_pass))
            .route("", web::get().to(list_passes))
            .route("/expiring", web::get().to(list_expiring)),
    );
}
