pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod notification;
pub mod pass;
pub mod session;
pub mod vehicle;

pub use admin::admin_config;
pub use auth::auth_config;
pub use dashboard::dashboard_config;
pub use notification::notification_config;
pub use pass::pass_config;
pub use session::session_config;
pub use vehicle::vehicle_config;
