pub mod notifications;
pub mod owners;
pub mod parking_sessions;
pub mod passes;
pub mod users;
pub mod vehicles;

pub use notifications::NotificationType;
pub use parking_sessions::ParkingSessionStatus;
pub use passes::PassType;
pub use vehicles::VehicleType;

pub use notifications as notification_entity;
pub use owners as owner_entity;
pub use parking_sessions as parking_session_entity;
pub use passes as pass_entity;
pub use users as user_entity;
pub use vehicles as vehicle_entity;
