use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub active_passes_count: i64,
    pub vehicles_today: i64,
    pub earnings_today: f64,
    pub slots_filled: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlotAvailability {
    pub cars_occupied: i64,
    pub bikes_occupied: i64,
    pub total_car_slots: i64,
    pub total_bike_slots: i64,
    pub car_available: i64,
    pub bike_available: i64,
}
