use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "notification_type")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    #[sea_orm(string_value = "pass_expiry")]
    PassExpiry,
    #[sea_orm(string_value = "low_balance")]
    LowBalance,
    #[sea_orm(string_value = "system_alert")]
    SystemAlert,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::PassExpiry => write!(f, "pass_expiry"),
            NotificationType::LowBalance => write!(f, "low_balance"),
            NotificationType::SystemAlert => write!(f, "system_alert"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub recipient_id: Option<i64>,
    pub pass_id: Option<i64>,
    pub notification_type: NotificationType,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::owners::Entity",
        from = "Column::RecipientId",
        to = "super::owners::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Recipient,
    #[sea_orm(
        belongs_to = "super::passes::Entity",
        from = "Column::PassId",
        to = "super::passes::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Pass,
}

impl Related<super::owners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipient.def()
    }
}

impl Related<super::passes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pass.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
