use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "vehicle_type")]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    #[sea_orm(string_value = "car")]
    Car,
    #[sea_orm(string_value = "bike")]
    Bike,
    #[sea_orm(string_value = "truck")]
    Truck,
    #[sea_orm(string_value = "other")]
    Other,
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleType::Car => write!(f, "car"),
            VehicleType::Bike => write!(f, "bike"),
            VehicleType::Truck => write!(f, "truck"),
            VehicleType::Other => write!(f, "other"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    #[sea_orm(unique)]
    pub plate_number: String,
    pub vehicle_type: VehicleType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::owners::Entity",
        from = "Column::OwnerId",
        to = "super::owners::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::passes::Entity")]
    Passes,
    #[sea_orm(has_many = "super::parking_sessions::Entity")]
    ParkingSessions,
}

impl Related<super::owners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::passes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Passes.def()
    }
}

impl Related<super::parking_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
