use crate::config::ParkingConfig;
use crate::entities::{
    VehicleType, parking_session_entity as sessions, pass_entity as passes,
    vehicle_entity as vehicles,
};
use crate::error::AppResult;
use crate::models::{DashboardStats, SlotAvailability};
use crate::utils::round2;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QuerySelect,
};

fn day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (day_start, day_start + Duration::days(1))
}

pub(crate) async fn open_session_count<C: ConnectionTrait>(conn: &C) -> AppResult<i64> {
    let count = sessions::Entity::find()
        .filter(sessions::Column::ExitTime.is_null())
        .count(conn)
        .await?;
    Ok(count as i64)
}

/// Fees collected for sessions that entered on the UTC calendar day of `now`.
pub(crate) async fn earnings_on<C: ConnectionTrait>(
    conn: &C,
    now: DateTime<Utc>,
) -> AppResult<f64> {
    let (day_start, day_end) = day_bounds(now);

    #[derive(Debug, FromQueryResult)]
    struct SumRow {
        total: Option<f64>,
    }

    let row = sessions::Entity::find()
        .select_only()
        .column_as(Expr::col(sessions::Column::Fee).sum(), "total")
        .filter(sessions::Column::EntryTime.gte(day_start))
        .filter(sessions::Column::EntryTime.lt(day_end))
        .into_model::<SumRow>()
        .one(conn)
        .await?;

    Ok(round2(row.and_then(|r| r.total).unwrap_or(0.0)))
}

#[derive(Clone)]
pub struct DashboardService {
    pool: DatabaseConnection,
    car_slots: i64,
    bike_slots: i64,
}

impl DashboardService {
    pub fn new(pool: DatabaseConnection, parking: &ParkingConfig) -> Self {
        Self {
            pool,
            car_slots: parking.car_slots as i64,
            bike_slots: parking.bike_slots as i64,
        }
    }

    pub async fn get_stats(&self, now: DateTime<Utc>) -> AppResult<DashboardStats> {
        let active_passes_count = passes::Entity::find()
            .filter(passes::Column::IsActive.eq(true))
            .filter(passes::Column::ExpiresAt.gt(now))
            .count(&self.pool)
            .await? as i64;

        #[derive(Debug, FromQueryResult)]
        struct VehicleIdRow {
            vehicle_id: i64,
        }

        let (day_start, day_end) = day_bounds(now);
        let vehicle_ids: std::collections::HashSet<i64> = sessions::Entity::find()
            .select_only()
            .column(sessions::Column::VehicleId)
            .distinct()
            .filter(sessions::Column::EntryTime.gte(day_start))
            .filter(sessions::Column::EntryTime.lt(day_end))
            .into_model::<VehicleIdRow>()
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|r| r.vehicle_id)
            .collect();

        Ok(DashboardStats {
            active_passes_count,
            vehicles_today: vehicle_ids.len() as i64,
            earnings_today: earnings_on(&self.pool, now).await?,
            slots_filled: open_session_count(&self.pool).await?,
        })
    }

    pub async fn get_slot_availability(&self) -> AppResult<SlotAvailability> {
        let bikes_occupied = sessions::Entity::find()
            .filter(sessions::Column::ExitTime.is_null())
            .inner_join(vehicles::Entity)
            .filter(vehicles::Column::VehicleType.eq(VehicleType::Bike))
            .count(&self.pool)
            .await? as i64;

        // cars, trucks and "other" vehicles all take car slots
        let cars_occupied = sessions::Entity::find()
            .filter(sessions::Column::ExitTime.is_null())
            .inner_join(vehicles::Entity)
            .filter(vehicles::Column::VehicleType.ne(VehicleType::Bike))
            .count(&self.pool)
            .await? as i64;

        Ok(SlotAvailability {
            cars_occupied,
            bikes_occupied,
            total_car_slots: self.car_slots,
            total_bike_slots: self.bike_slots,
            car_available: self.car_slots - cars_occupied,
            bike_available: self.bike_slots - bikes_occupied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ParkingSessionStatus;
    use crate::services::vehicle_service::{find_or_create_owner, find_or_create_vehicle};
    use crate::test_support::setup_test_db;
    use sea_orm::{ActiveModelTrait, Set};

    async fn seed_session(
        db: &DatabaseConnection,
        plate: &str,
        vehicle_type: VehicleType,
        entry_time: DateTime<Utc>,
        exit_time: Option<DateTime<Utc>>,
        fee: Option<f64>,
    ) -> sessions::Model {
        let owner = find_or_create_owner(db, "Guest", None, None).await.unwrap();
        let vehicle = find_or_create_vehicle(db, plate, vehicle_type, owner.id)
            .await
            .unwrap();
        sessions::ActiveModel {
            vehicle_id: Set(vehicle.id),
            entry_time: Set(entry_time),
            exit_time: Set(exit_time),
            fee: Set(fee),
            status: Set(if exit_time.is_some() {
                ParkingSessionStatus::Exited
            } else {
                ParkingSessionStatus::Parked
            }),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_stats_count_today_only() {
        let db = setup_test_db().await;
        let now = Utc::now();
        let (day_start, _) = day_bounds(now);

        seed_session(&db, "CAR1", VehicleType::Car, day_start + Duration::hours(1), Some(now), Some(40.0)).await;
        // CAR1 re-entered later the same day; counted once
        seed_session(&db, "CAR1", VehicleType::Car, day_start + Duration::hours(3), None, None).await;
        seed_session(&db, "CAR2", VehicleType::Car, day_start + Duration::hours(2), None, None).await;
        // yesterday's sessions are excluded from today's numbers
        seed_session(&db, "OLD1", VehicleType::Car, day_start - Duration::hours(3), Some(now), Some(99.0)).await;
        // but a car parked overnight still fills a slot
        seed_session(&db, "OLD2", VehicleType::Car, day_start - Duration::hours(5), None, None).await;

        let service = DashboardService::new(db, &ParkingConfig::default());
        let stats = service.get_stats(now).await.unwrap();

        assert_eq!(stats.vehicles_today, 2);
        assert_eq!(stats.earnings_today, 40.0);
        assert_eq!(stats.slots_filled, 3); // CAR1 again, CAR2, OLD2
        assert_eq!(stats.active_passes_count, 0);
    }

    #[tokio::test]
    async fn test_slot_availability_groups_non_bikes_as_cars() {
        let db = setup_test_db().await;
        let now = Utc::now();

        seed_session(&db, "CAR1", VehicleType::Car, now, None, None).await;
        seed_session(&db, "TRK1", VehicleType::Truck, now, None, None).await;
        seed_session(&db, "OTH1", VehicleType::Other, now, None, None).await;
        seed_session(&db, "BIK1", VehicleType::Bike, now, None, None).await;
        // an exited car frees its slot
        seed_session(&db, "CAR2", VehicleType::Car, now - Duration::hours(2), Some(now), Some(40.0)).await;

        let service = DashboardService::new(db, &ParkingConfig::default());
        let slots = service.get_slot_availability().await.unwrap();

        assert_eq!(slots.cars_occupied, 3);
        assert_eq!(slots.bikes_occupied, 1);
        assert_eq!(slots.car_available, 47);
        assert_eq!(slots.bike_available, 49);
    }
}
