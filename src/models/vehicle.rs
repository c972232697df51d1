use crate::entities::{VehicleType, owner_entity, vehicle_entity};
use crate::models::OwnerResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VehicleResponse {
    pub id: i64,
    pub plate_number: String,
    pub vehicle_type: VehicleType,
    pub owner: Option<OwnerResponse>,
}

impl VehicleResponse {
    pub fn from_model(vehicle: vehicle_entity::Model, owner: Option<owner_entity::Model>) -> Self {
        Self {
            id: vehicle.id,
            plate_number: vehicle.plate_number,
            vehicle_type: vehicle.vehicle_type,
            owner: owner.map(OwnerResponse::from),
        }
    }
}
