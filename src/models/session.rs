use crate::entities::{ParkingSessionStatus, VehicleType, parking_session_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VehicleEntryRequest {
    #[schema(example = "KA01AB1234")]
    pub plate_number: String,
    /// Used when the plate is seen for the first time; defaults to car.
    pub vehicle_type: Option<VehicleType>,
    #[schema(example = "John Doe")]
    pub owner_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VehicleExitRequest {
    #[schema(example = "KA01AB1234")]
    pub plate_number: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntryResponse {
    pub session_id: i64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExitResponse {
    pub session_id: i64,
    pub fee: f64,
    pub message: String,
    pub slots_filled: i64,
    pub earnings_today: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: i64,
    pub plate_number: String,
    pub owner_name: String,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub fee: Option<f64>,
    pub status: ParkingSessionStatus,
}

impl SessionResponse {
    pub fn from_model(
        session: parking_session_entity::Model,
        plate_number: String,
        owner_name: String,
    ) -> Self {
        Self {
            id: session.id,
            plate_number,
            owner_name,
            entry_time: session.entry_time,
            exit_time: session.exit_time,
            fee: session.fee,
            status: session.status,
        }
    }
}
