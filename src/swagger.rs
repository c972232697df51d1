use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{NotificationType, ParkingSessionStatus, PassType, VehicleType};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::pass::create_pass,
        handlers::pass::list_passes,
        handlers::pass::list_expiring,
        handlers::session::vehicle_entry,
        handlers::session::vehicle_exit,
        handlers::session::list_sessions,
        handlers::session::recent_sessions,
        handlers::dashboard::get_stats,
        handlers::dashboard::get_slots,
        handlers::vehicle::list_owners,
        handlers::vehicle::list_vehicles,
        handlers::notification::list_notifications,
        handlers::notification::mark_read,
        handlers::admin::check_expiries,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UserResponse,
            AuthResponse,
            OwnerResponse,
            VehicleResponse,
            VehicleType,
            CreatePassRequest,
            CreatePassResponse,
            PassResponse,
            ExpiringPassResponse,
            PassType,
            VehicleEntryRequest,
            VehicleExitRequest,
            EntryResponse,
            ExitResponse,
            SessionResponse,
            ParkingSessionStatus,
            DashboardStats,
            SlotAvailability,
            NotificationResponse,
            NotificationType,
            ExpiryScanReport,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "passes", description = "Parking pass API"),
        (name = "sessions", description = "Vehicle entry/exit API"),
        (name = "dashboard", description = "Dashboard statistics API"),
        (name = "vehicles", description = "Owner and vehicle listings"),
        (name = "notifications", description = "Notification API"),
        (name = "admin", description = "Administrative operations"),
    ),
    info(
        title = "Parklot Backend API",
        version = "1.0.0",
        description = "Parking lot management REST API documentation",
        contact(
            name = "API Support"
        )
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
