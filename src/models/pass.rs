use crate::entities::{PassType, VehicleType, pass_entity};
use crate::models::VehicleResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePassRequest {
    #[schema(example = "John Doe")]
    pub owner_name: String,
    #[schema(example = "KA01AB1234")]
    pub plate_number: String,
    pub vehicle_type: VehicleType,
    pub pass_type: PassType,
    #[schema(example = "+12345678901")]
    pub contact_number: Option<String>,
    #[schema(example = "john@example.com")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePassResponse {
    pub pass_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PassResponse {
    pub id: i64,
    pub vehicle: Option<VehicleResponse>,
    pub pass_type: PassType,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl PassResponse {
    pub fn from_model(pass: pass_entity::Model, vehicle: Option<VehicleResponse>) -> Self {
        Self {
            id: pass.id,
            vehicle,
            pass_type: pass.pass_type,
            issued_at: pass.issued_at,
            expires_at: pass.expires_at,
            is_active: pass.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExpiringPassResponse {
    pub id: i64,
    pub plate_number: String,
    pub owner_name: String,
    pub pass_type: PassType,
    pub expires_at: DateTime<Utc>,
    pub days_left: i64,
}
