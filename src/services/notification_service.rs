use crate::entities::notification_entity as notifications;
use crate::error::{AppError, AppResult};
use crate::models::{NotificationResponse, PaginatedResponse, PaginationParams};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct NotificationService {
    pool: DatabaseConnection,
}

impl NotificationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Newest first.
    pub async fn list_notifications(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<NotificationResponse>> {
        let total = notifications::Entity::find().count(&self.pool).await? as i64;

        let rows = notifications::Entity::find()
            .order_by_desc(notifications::Column::CreatedAt)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?;

        let data = rows.into_iter().map(NotificationResponse::from).collect();
        Ok(PaginatedResponse::new(
            data,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    pub async fn mark_read(&self, id: i64) -> AppResult<NotificationResponse> {
        let notification = notifications::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification {id} not found")))?;

        let mut am = notification.into_active_model();
        am.is_read = Set(true);
        let updated = am.update(&self.pool).await?;

        Ok(NotificationResponse::from(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NotificationType;
    use crate::test_support::setup_test_db;
    use chrono::{Duration, Utc};

    async fn seed_notification(db: &DatabaseConnection, message: &str, age_mins: i64) -> i64 {
        notifications::ActiveModel {
            recipient_id: Set(None),
            pass_id: Set(None),
            notification_type: Set(NotificationType::SystemAlert),
            message: Set(message.to_string()),
            is_read: Set(false),
            created_at: Set(Utc::now() - Duration::minutes(age_mins)),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let db = setup_test_db().await;
        let service = NotificationService::new(db.clone());
        seed_notification(&db, "older", 10).await;
        seed_notification(&db, "newer", 1).await;

        let page = service
            .list_notifications(&PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.data[0].message, "newer");
        assert_eq!(page.data[1].message, "older");
    }

    #[tokio::test]
    async fn test_mark_read() {
        let db = setup_test_db().await;
        let service = NotificationService::new(db.clone());
        let id = seed_notification(&db, "unread", 1).await;

        let updated = service.mark_read(id).await.unwrap();
        assert!(updated.is_read);

        let refreshed = notifications::Entity::find_by_id(id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(refreshed.is_read);
    }

    #[tokio::test]
    async fn test_mark_read_missing_notification() {
        let db = setup_test_db().await;
        let service = NotificationService::new(db);

        let err = service.mark_read(999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
