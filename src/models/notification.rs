use crate::entities::{NotificationType, notification_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i64,
    pub recipient_id: Option<i64>,
    pub pass_id: Option<i64>,
    pub notification_type: NotificationType,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<notification_entity::Model> for NotificationResponse {
    fn from(m: notification_entity::Model) -> Self {
        Self {
            id: m.id,
            recipient_id: m.recipient_id,
            pass_id: m.pass_id,
            notification_type: m.notification_type,
            message: m.message,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpiryScanReport {
    pub expired_passes: i64,
    pub notifications_created: i64,
}
