use crate::entities::{owner_entity as owners, pass_entity as passes, vehicle_entity as vehicles};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreatePassRequest, CreatePassResponse, ExpiringPassResponse, PaginatedResponse,
    PaginationParams, PassResponse, VehicleResponse,
};
use crate::services::vehicle_service::{find_or_create_owner, find_or_create_vehicle, load_owner_map};
use crate::utils::{expiry_for, normalize_plate, validate_plate};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// Whether the vehicle holds a pass that is active at `now`.
pub(crate) async fn has_active_pass<C: ConnectionTrait>(
    conn: &C,
    vehicle_id: i64,
    now: DateTime<Utc>,
) -> AppResult<bool> {
    let existing = passes::Entity::find()
        .filter(passes::Column::VehicleId.eq(vehicle_id))
        .filter(passes::Column::IsActive.eq(true))
        .filter(passes::Column::ExpiresAt.gt(now))
        .one(conn)
        .await?;
    Ok(existing.is_some())
}

#[derive(Clone)]
pub struct PassService {
    pool: DatabaseConnection,
}

impl PassService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_pass(&self, req: CreatePassRequest) -> AppResult<CreatePassResponse> {
        let plate = normalize_plate(&req.plate_number);
        validate_plate(&plate)?;
        let owner_name = req.owner_name.trim();
        if owner_name.is_empty() {
            return Err(AppError::ValidationError(
                "Owner name is required".to_string(),
            ));
        }

        let owner = find_or_create_owner(
            &self.pool,
            owner_name,
            req.contact_number.clone(),
            req.email.clone(),
        )
        .await?;
        let vehicle = find_or_create_vehicle(&self.pool, &plate, req.vehicle_type, owner.id).await?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        // row lock serializes concurrent creates for the same vehicle
        vehicles::Entity::find_by_id(vehicle.id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        if has_active_pass(&txn, vehicle.id, now).await? {
            return Err(AppError::Conflict(
                "Vehicle already has an active pass.".to_string(),
            ));
        }
        let pass = passes::ActiveModel {
            vehicle_id: Set(vehicle.id),
            pass_type: Set(req.pass_type),
            issued_at: Set(now),
            expires_at: Set(expiry_for(req.pass_type, now)),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        Ok(CreatePassResponse {
            pass_id: pass.id,
            message: format!("Pass for {plate} created successfully!"),
        })
    }

    pub async fn list_passes(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<PassResponse>> {
        let total = passes::Entity::find().count(&self.pool).await? as i64;
        let rows = passes::Entity::find()
            .find_also_related(vehicles::Entity)
            .order_by_desc(passes::Column::IssuedAt)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?;

        let owner_ids = rows
            .iter()
            .filter_map(|(_, v)| v.as_ref().map(|v| v.owner_id))
            .collect();
        let owner_map = load_owner_map(&self.pool, owner_ids).await?;

        let data = rows
            .into_iter()
            .map(|(pass, vehicle)| {
                let vehicle = vehicle.map(|v| {
                    let owner = owner_map.get(&v.owner_id).cloned();
                    VehicleResponse::from_model(v, owner)
                });
                PassResponse::from_model(pass, vehicle)
            })
            .collect();
        Ok(PaginatedResponse::new(
            data,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    /// Active passes expiring within the next seven days.
    pub async fn list_expiring(&self, now: DateTime<Utc>) -> AppResult<Vec<ExpiringPassResponse>> {
        let soon = now + Duration::days(7);
        let rows = passes::Entity::find()
            .filter(passes::Column::IsActive.eq(true))
            .filter(passes::Column::ExpiresAt.gt(now))
            .filter(passes::Column::ExpiresAt.lte(soon))
            .find_also_related(vehicles::Entity)
            .order_by_asc(passes::Column::ExpiresAt)
            .all(&self.pool)
            .await?;

        let owner_ids = rows
            .iter()
            .filter_map(|(_, v)| v.as_ref().map(|v| v.owner_id))
            .collect();
        let owner_map = load_owner_map(&self.pool, owner_ids).await?;

        let mut data = Vec::with_capacity(rows.len());
        for (pass, vehicle) in rows {
            let Some(vehicle) = vehicle else { continue };
            let owner_name = owner_map
                .get(&vehicle.owner_id)
                .map(|o| o.name.clone())
                .unwrap_or_default();
            data.push(ExpiringPassResponse {
                id: pass.id,
                plate_number: vehicle.plate_number,
                owner_name,
                pass_type: pass.pass_type,
                expires_at: pass.expires_at,
                days_left: (pass.expires_at.date_naive() - now.date_naive()).num_days(),
            });
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PassType, VehicleType};
    use crate::test_support::setup_test_db;
    use sea_orm::IntoActiveModel;

    fn pass_request(plate: &str, pass_type: PassType) -> CreatePassRequest {
        CreatePassRequest {
            owner_name: "John Doe".to_string(),
            plate_number: plate.to_string(),
            vehicle_type: VehicleType::Car,
            pass_type,
            contact_number: None,
            email: None,
        }
    }

    #[tokio::test]
    async fn test_create_pass_sets_expiry_from_type() {
        let db = setup_test_db().await;
        let service = PassService::new(db.clone());

        let created = service
            .create_pass(pass_request("KA01AB1234", PassType::Weekly))
            .await
            .unwrap();
        assert_eq!(created.message, "Pass for KA01AB1234 created successfully!");

        let pass = passes::Entity::find_by_id(created.pass_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pass.expires_at - pass.issued_at, Duration::days(7));
        assert!(pass.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_active_pass_is_rejected() {
        let db = setup_test_db().await;
        let service = PassService::new(db.clone());

        service
            .create_pass(pass_request("KA01AB1234", PassType::Daily))
            .await
            .unwrap();
        // a second handle contending for the same vehicle loses with Conflict
        let err = PassService::new(db.clone())
            .create_pass(pass_request("KA01AB1234", PassType::Monthly))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        let active = passes::Entity::find()
            .filter(passes::Column::IsActive.eq(true))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(active, 1);
    }

    #[tokio::test]
    async fn test_new_pass_allowed_after_previous_expires() {
        let db = setup_test_db().await;
        let service = PassService::new(db.clone());

        let first = service
            .create_pass(pass_request("KA01AB1234", PassType::Daily))
            .await
            .unwrap();

        // age the first pass past its expiry
        let pass = passes::Entity::find_by_id(first.pass_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let mut am = pass.into_active_model();
        am.expires_at = Set(Utc::now() - Duration::hours(1));
        am.update(&db).await.unwrap();

        assert!(
            service
                .create_pass(pass_request("KA01AB1234", PassType::Yearly))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_expiring_listing_window_and_days_left() {
        let db = setup_test_db().await;
        let service = PassService::new(db.clone());
        let now = Utc::now();

        let created = service
            .create_pass(pass_request("KA01AB1234", PassType::Monthly))
            .await
            .unwrap();
        // too far out to appear
        assert!(service.list_expiring(now).await.unwrap().is_empty());

        let pass = passes::Entity::find_by_id(created.pass_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let mut am = pass.into_active_model();
        am.expires_at = Set(now + Duration::days(2));
        am.update(&db).await.unwrap();

        let expiring = service.list_expiring(now).await.unwrap();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].plate_number, "KA01AB1234");
        assert_eq!(expiring[0].owner_name, "John Doe");
        assert_eq!(expiring[0].days_left, 2);

        // a pass expiring exactly seven days out is still listed
        let second = service
            .create_pass(pass_request("DL3C4567", PassType::Monthly))
            .await
            .unwrap();
        let pass = passes::Entity::find_by_id(second.pass_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let mut am = pass.into_active_model();
        am.expires_at = Set(now + Duration::days(7));
        am.update(&db).await.unwrap();

        let expiring = service.list_expiring(now).await.unwrap();
        assert_eq!(expiring.len(), 2);
        assert_eq!(expiring[1].plate_number, "DL3C4567");
        assert_eq!(expiring[1].days_left, 7);
    }

    #[tokio::test]
    async fn test_has_active_pass_boundary() {
        let db = setup_test_db().await;
        let service = PassService::new(db.clone());

        let created = service
            .create_pass(pass_request("KA01AB1234", PassType::Daily))
            .await
            .unwrap();
        let pass = passes::Entity::find_by_id(created.pass_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();

        assert!(has_active_pass(&db, pass.vehicle_id, pass.expires_at - Duration::seconds(1))
            .await
            .unwrap());
        // exactly at expiry the pass no longer covers the vehicle
        assert!(!has_active_pass(&db, pass.vehicle_id, pass.expires_at)
            .await
            .unwrap());
    }
}
