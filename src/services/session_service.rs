use crate::entities::{
    ParkingSessionStatus, VehicleType, parking_session_entity as sessions,
    vehicle_entity as vehicles,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    EntryResponse, ExitResponse, PaginatedResponse, PaginationParams, SessionResponse,
    VehicleEntryRequest, VehicleExitRequest,
};
use crate::services::dashboard_service::{earnings_on, open_session_count};
use crate::services::pass_service::has_active_pass;
use crate::services::vehicle_service::{find_or_create_owner, find_or_create_vehicle, load_owner_map};
use crate::utils::{compute_fee, normalize_plate, validate_plate};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

#[derive(Clone)]
pub struct SessionService {
    pool: DatabaseConnection,
}

impl SessionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn record_entry(&self, req: VehicleEntryRequest) -> AppResult<EntryResponse> {
        let plate = normalize_plate(&req.plate_number);
        validate_plate(&plate)?;
        let owner_name = req
            .owner_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Guest");

        let vehicle_type = req.vehicle_type.unwrap_or(VehicleType::Car);
        let owner = find_or_create_owner(&self.pool, owner_name, None, None).await?;
        let vehicle = find_or_create_vehicle(&self.pool, &plate, vehicle_type, owner.id).await?;

        let txn = self.pool.begin().await?;
        let open = sessions::Entity::find()
            .filter(sessions::Column::VehicleId.eq(vehicle.id))
            .filter(sessions::Column::ExitTime.is_null())
            .one(&txn)
            .await?;
        if open.is_some() {
            return Err(AppError::Conflict(
                "Vehicle is already parked inside.".to_string(),
            ));
        }

        let inserted = sessions::ActiveModel {
            vehicle_id: Set(vehicle.id),
            entry_time: Set(Utc::now()),
            exit_time: Set(None),
            fee: Set(None),
            status: Set(ParkingSessionStatus::Parked),
            ..Default::default()
        }
        .insert(&txn)
        .await;
        let session = match inserted {
            Ok(session) => session,
            // lost the race to another entry for the same vehicle
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    return Err(AppError::Conflict(
                        "Vehicle is already parked inside.".to_string(),
                    ));
                }
                _ => return Err(e.into()),
            },
        };
        txn.commit().await?;

        Ok(EntryResponse {
            session_id: session.id,
            message: format!("Vehicle {plate} entered."),
        })
    }

    pub async fn record_exit(&self, req: VehicleExitRequest) -> AppResult<ExitResponse> {
        let plate = normalize_plate(&req.plate_number);
        let vehicle = vehicles::Entity::find()
            .filter(vehicles::Column::PlateNumber.eq(&plate))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No active entry for this vehicle.".to_string()))?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let session = sessions::Entity::find()
            .filter(sessions::Column::VehicleId.eq(vehicle.id))
            .filter(sessions::Column::ExitTime.is_null())
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("No active entry for this vehicle.".to_string()))?;

        // an active pass waives the parking fee
        let fee = if has_active_pass(&txn, vehicle.id, now).await? {
            0.0
        } else {
            compute_fee(session.entry_time, now, vehicle.vehicle_type)
        };

        let session_id = session.id;
        let mut am = session.into_active_model();
        am.exit_time = Set(Some(now));
        am.fee = Set(Some(fee));
        am.status = Set(ParkingSessionStatus::Exited);
        am.update(&txn).await?;
        txn.commit().await?;

        let mut message = format!("Vehicle {plate} exited.");
        if fee > 0.0 {
            message.push_str(&format!(" Fees: {fee:.2}"));
        }

        Ok(ExitResponse {
            session_id,
            fee,
            message,
            slots_filled: open_session_count(&self.pool).await?,
            earnings_today: earnings_on(&self.pool, now).await?,
        })
    }

    pub async fn list_sessions(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<SessionResponse>> {
        let total = sessions::Entity::find().count(&self.pool).await? as i64;
        let rows = sessions::Entity::find()
            .find_also_related(vehicles::Entity)
            .order_by_desc(sessions::Column::EntryTime)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?;

        let data = self.to_responses(rows).await?;
        Ok(PaginatedResponse::new(
            data,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    /// The five most recent sessions, for the dashboard feed.
    pub async fn recent_sessions(&self) -> AppResult<Vec<SessionResponse>> {
        let rows = sessions::Entity::find()
            .find_also_related(vehicles::Entity)
            .order_by_desc(sessions::Column::EntryTime)
            .limit(5)
            .all(&self.pool)
            .await?;
        self.to_responses(rows).await
    }

    async fn to_responses(
        &self,
        rows: Vec<(sessions::Model, Option<vehicles::Model>)>,
    ) -> AppResult<Vec<SessionResponse>> {
        let owner_ids = rows
            .iter()
            .filter_map(|(_, v)| v.as_ref().map(|v| v.owner_id))
            .collect();
        let owner_map = load_owner_map(&self.pool, owner_ids).await?;

        Ok(rows
            .into_iter()
            .map(|(session, vehicle)| {
                let (plate_number, owner_name) = vehicle
                    .map(|v| {
                        let owner_name = owner_map
                            .get(&v.owner_id)
                            .map(|o| o.name.clone())
                            .unwrap_or_default();
                        (v.plate_number, owner_name)
                    })
                    .unwrap_or_default();
                SessionResponse::from_model(session, plate_number, owner_name)
            })
            .collect())
    }
}
