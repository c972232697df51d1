use crate::entities::vehicle_entity::VehicleType;
use chrono::{DateTime, Utc};

/// Hourly parking rate per vehicle type.
pub fn hourly_rate(vehicle_type: VehicleType) -> f64 {
    match vehicle_type {
        VehicleType::Car => 20.0,
        VehicleType::Bike => 10.0,
        VehicleType::Truck => 15.0,
        VehicleType::Other => 15.0,
    }
}

/// Billable duration in fractional hours, with a one hour minimum.
pub fn billable_hours(entry_time: DateTime<Utc>, exit_time: DateTime<Utc>) -> f64 {
    let hours = (exit_time - entry_time).num_seconds() as f64 / 3600.0;
    hours.max(1.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn compute_fee(
    entry_time: DateTime<Utc>,
    exit_time: DateTime<Utc>,
    vehicle_type: VehicleType,
) -> f64 {
    round2(billable_hours(entry_time, exit_time) * hourly_rate(vehicle_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_minimum_one_hour_charge() {
        let t = Utc::now();
        // zero duration still bills one hour
        assert_eq!(compute_fee(t, t, VehicleType::Car), 20.0);
        assert_eq!(
            compute_fee(t, t + Duration::minutes(5), VehicleType::Bike),
            10.0
        );
    }

    #[test]
    fn test_fractional_hours_billed() {
        let t = Utc::now();
        assert_eq!(
            compute_fee(t, t + Duration::minutes(90), VehicleType::Bike),
            15.0
        );
        assert_eq!(
            compute_fee(t, t + Duration::hours(3), VehicleType::Other),
            45.0
        );
        assert_eq!(
            compute_fee(t, t + Duration::minutes(150), VehicleType::Truck),
            37.5
        );
    }

    #[test]
    fn test_fee_rounded_to_cents() {
        let t = Utc::now();
        // 70 minutes on a bike: 1.1666… hours * 10 = 11.67
        assert_eq!(
            compute_fee(t, t + Duration::minutes(70), VehicleType::Bike),
            11.67
        );
    }

    #[test]
    fn test_rates_by_vehicle_type() {
        assert_eq!(hourly_rate(VehicleType::Car), 20.0);
        assert_eq!(hourly_rate(VehicleType::Bike), 10.0);
        assert_eq!(hourly_rate(VehicleType::Truck), 15.0);
        assert_eq!(hourly_rate(VehicleType::Other), 15.0);
    }
}
