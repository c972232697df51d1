pub mod auth_service;
pub mod dashboard_service;
pub mod expiry_service;
pub mod notification_service;
pub mod pass_service;
pub mod session_service;
pub mod vehicle_service;

pub use auth_service::*;
pub use dashboard_service::*;
pub use expiry_service::*;
pub use notification_service::*;
pub use pass_service::*;
pub use session_service::*;
pub use vehicle_service::*;
