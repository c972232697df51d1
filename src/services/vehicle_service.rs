use crate::entities::{VehicleType, owner_entity as owners, vehicle_entity as vehicles};
use crate::error::{AppError, AppResult};
use crate::models::{OwnerResponse, PaginatedResponse, PaginationParams, VehicleResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

/// Look up an owner by name, creating one on first reference.
/// Contact details are only applied when the owner is created.
pub(crate) async fn find_or_create_owner<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    contact_number: Option<String>,
    email: Option<String>,
) -> AppResult<owners::Model> {
    if let Some(owner) = owners::Entity::find()
        .filter(owners::Column::Name.eq(name))
        .one(conn)
        .await?
    {
        return Ok(owner);
    }

    let owner = owners::ActiveModel {
        name: Set(name.to_string()),
        contact_number: Set(contact_number),
        email: Set(email),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(owner)
}

/// Look up a vehicle by plate, creating one on first reference.
/// The type and owner are only applied when the vehicle is created.
pub(crate) async fn find_or_create_vehicle<C: ConnectionTrait>(
    conn: &C,
    plate_number: &str,
    vehicle_type: VehicleType,
    owner_id: i64,
) -> AppResult<vehicles::Model> {
    if let Some(vehicle) = vehicles::Entity::find()
        .filter(vehicles::Column::PlateNumber.eq(plate_number))
        .one(conn)
        .await?
    {
        return Ok(vehicle);
    }

    let inserted = vehicles::ActiveModel {
        owner_id: Set(owner_id),
        plate_number: Set(plate_number.to_string()),
        vehicle_type: Set(vehicle_type),
        ..Default::default()
    }
    .insert(conn)
    .await;

    match inserted {
        Ok(vehicle) => Ok(vehicle),
        // A concurrent request created the same plate first; use its row.
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => vehicles::Entity::find()
                .filter(vehicles::Column::PlateNumber.eq(plate_number))
                .one(conn)
                .await?
                .ok_or_else(|| {
                    AppError::InternalError(format!("Vehicle {plate_number} disappeared"))
                }),
            _ => Err(e.into()),
        },
    }
}

/// Owners keyed by id, for resolving names after a joined fetch.
pub(crate) async fn load_owner_map<C: ConnectionTrait>(
    conn: &C,
    owner_ids: Vec<i64>,
) -> AppResult<std::collections::HashMap<i64, owners::Model>> {
    if owner_ids.is_empty() {
        return Ok(std::collections::HashMap::new());
    }
    let rows = owners::Entity::find()
        .filter(owners::Column::Id.is_in(owner_ids))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|o| (o.id, o)).collect())
}

#[derive(Clone)]
pub struct VehicleService {
    pool: DatabaseConnection,
}

impl VehicleService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_owners(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<OwnerResponse>> {
        let total = owners::Entity::find().count(&self.pool).await? as i64;
        let rows = owners::Entity::find()
            .order_by_asc(owners::Column::Name)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?;

        let data = rows.into_iter().map(OwnerResponse::from).collect();
        Ok(PaginatedResponse::new(
            data,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    pub async fn list_vehicles(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<VehicleResponse>> {
        let total = vehicles::Entity::find().count(&self.pool).await? as i64;
        let rows = vehicles::Entity::find()
            .find_also_related(owners::Entity)
            .order_by_asc(vehicles::Column::PlateNumber)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?;

        let data = rows
            .into_iter()
            .map(|(vehicle, owner)| VehicleResponse::from_model(vehicle, owner))
            .collect();
        Ok(PaginatedResponse::new(
            data,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup_test_db;

    #[tokio::test]
    async fn test_find_or_create_owner_is_idempotent() {
        let db = setup_test_db().await;

        let first = find_or_create_owner(&db, "John Doe", None, None).await.unwrap();
        let second = find_or_create_owner(&db, "John Doe", Some("+12025550123".into()), None)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        // details from the second call are not applied to the existing row
        assert_eq!(second.contact_number, None);
    }

    #[tokio::test]
    async fn test_find_or_create_vehicle_keeps_first_registration() {
        let db = setup_test_db().await;
        let owner = find_or_create_owner(&db, "Guest", None, None).await.unwrap();

        let first = find_or_create_vehicle(&db, "KA01AB1234", VehicleType::Car, owner.id)
            .await
            .unwrap();
        let second = find_or_create_vehicle(&db, "KA01AB1234", VehicleType::Truck, owner.id)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.vehicle_type, VehicleType::Car);
    }

    #[tokio::test]
    async fn test_list_vehicles_includes_owner() {
        let db = setup_test_db().await;
        let owner = find_or_create_owner(&db, "Jane", None, None).await.unwrap();
        find_or_create_vehicle(&db, "DL3C4567", VehicleType::Bike, owner.id)
            .await
            .unwrap();

        let service = VehicleService::new(db);
        let page = service
            .list_vehicles(&PaginationParams::default())
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].plate_number, "DL3C4567");
        assert_eq!(page.data[0].owner.as_ref().unwrap().name, "Jane");
    }
}
