use crate::entities::{
    NotificationType, notification_entity as notifications, pass_entity as passes,
    vehicle_entity as vehicles,
};
use crate::error::{AppError, AppResult};
use crate::models::ExpiryScanReport;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, SqlErr, TransactionTrait,
};

#[derive(Clone)]
pub struct ExpiryService {
    pool: DatabaseConnection,
}

impl ExpiryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// One sweep over all passes: deactivate the expired ones and write
    /// expiry/reminder notices. Safe to rerun; a pass gets each notice once.
    pub async fn scan_expiries(&self, now: DateTime<Utc>) -> AppResult<ExpiryScanReport> {
        let mut expired_passes = 0i64;
        let mut notifications_created = 0i64;

        let expired = passes::Entity::find()
            .filter(passes::Column::IsActive.eq(true))
            .filter(passes::Column::ExpiresAt.lt(now))
            .all(&self.pool)
            .await?;
        for pass in expired {
            match self.expire_single(&pass).await {
                Ok(created) => {
                    expired_passes += 1;
                    if created {
                        notifications_created += 1;
                    }
                }
                Err(e) => log::error!("Failed to expire pass {}: {e}", pass.id),
            }
        }

        let soon = passes::Entity::find()
            .filter(passes::Column::IsActive.eq(true))
            .filter(passes::Column::ExpiresAt.gt(now))
            .filter(passes::Column::ExpiresAt.lt(now + Duration::days(3)))
            .all(&self.pool)
            .await?;
        for pass in soon {
            match self.remind_single(&pass, now).await {
                Ok(true) => notifications_created += 1,
                Ok(false) => {}
                Err(e) => log::error!("Failed to write reminder for pass {}: {e}", pass.id),
            }
        }

        Ok(ExpiryScanReport {
            expired_passes,
            notifications_created,
        })
    }

    /// Deactivate one expired pass and, unless one exists already, write its
    /// expiry notice. Both happen in one transaction.
    async fn expire_single(&self, pass: &passes::Model) -> AppResult<bool> {
        let txn = self.pool.begin().await?;

        let mut am = pass.clone().into_active_model();
        am.is_active = Set(false);
        am.update(&txn).await?;

        let existing = notifications::Entity::find()
            .filter(notifications::Column::PassId.eq(pass.id))
            .filter(notifications::Column::NotificationType.eq(NotificationType::PassExpiry))
            .filter(notifications::Column::Message.not_like("Reminder:%"))
            .one(&txn)
            .await?;

        let mut created = false;
        if existing.is_none() {
            let vehicle = vehicles::Entity::find_by_id(pass.vehicle_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Vehicle {} not found", pass.vehicle_id))
                })?;
            notifications::ActiveModel {
                recipient_id: Set(Some(vehicle.owner_id)),
                pass_id: Set(Some(pass.id)),
                notification_type: Set(NotificationType::PassExpiry),
                message: Set(format!(
                    "Your parking pass for vehicle {} expired on {}.",
                    vehicle.plate_number,
                    pass.expires_at.format("%Y-%m-%d %H:%M")
                )),
                is_read: Set(false),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            created = true;
        }

        txn.commit().await?;
        Ok(created)
    }

    async fn remind_single(&self, pass: &passes::Model, now: DateTime<Utc>) -> AppResult<bool> {
        let existing = notifications::Entity::find()
            .filter(notifications::Column::PassId.eq(pass.id))
            .filter(notifications::Column::NotificationType.eq(NotificationType::PassExpiry))
            .filter(notifications::Column::Message.starts_with("Reminder:"))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        let vehicle = vehicles::Entity::find_by_id(pass.vehicle_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", pass.vehicle_id)))?;
        let days_left = (pass.expires_at.date_naive() - now.date_naive()).num_days();

        let inserted = notifications::ActiveModel {
            recipient_id: Set(Some(vehicle.owner_id)),
            pass_id: Set(Some(pass.id)),
            notification_type: Set(NotificationType::PassExpiry),
            message: Set(format!(
                "Reminder: Your parking pass for vehicle {} expires in {days_left} day(s) on {}.",
                vehicle.plate_number,
                pass.expires_at.format("%Y-%m-%d %H:%M")
            )),
            is_read: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(true),
            // another scan wrote the reminder first
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Ok(false),
                _ => Err(e.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PassType, VehicleType};
    use crate::services::vehicle_service::{find_or_create_owner, find_or_create_vehicle};
    use crate::test_support::setup_test_db;
    use sea_orm::DatabaseConnection;

    async fn seed_pass(
        db: &DatabaseConnection,
        plate: &str,
        expires_at: DateTime<Utc>,
    ) -> passes::Model {
        let owner = find_or_create_owner(db, "John Doe", None, None).await.unwrap();
        let vehicle = find_or_create_vehicle(db, plate, VehicleType::Car, owner.id)
            .await
            .unwrap();
        passes::ActiveModel {
            vehicle_id: Set(vehicle.id),
            pass_type: Set(PassType::Monthly),
            issued_at: Set(expires_at - Duration::days(30)),
            expires_at: Set(expires_at),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_expired_pass_is_deactivated_and_notified_once() {
        let db = setup_test_db().await;
        let service = ExpiryService::new(db.clone());
        let now = Utc::now();
        let pass = seed_pass(&db, "KA01AB1234", now - Duration::hours(2)).await;

        let report = service.scan_expiries(now).await.unwrap();
        assert_eq!(report.expired_passes, 1);
        assert_eq!(report.notifications_created, 1);

        let refreshed = passes::Entity::find_by_id(pass.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(!refreshed.is_active);

        let notice = notifications::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(
            notice.message,
            format!(
                "Your parking pass for vehicle KA01AB1234 expired on {}.",
                pass.expires_at.format("%Y-%m-%d %H:%M")
            )
        );
        assert_eq!(notice.pass_id, Some(pass.id));

        // a second sweep finds nothing left to do
        let report = service.scan_expiries(now).await.unwrap();
        assert_eq!(report.expired_passes, 0);
        assert_eq!(report.notifications_created, 0);
        assert_eq!(notifications::Entity::find().all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reminder_written_inside_three_day_window() {
        let db = setup_test_db().await;
        let service = ExpiryService::new(db.clone());
        let now = Utc::now();
        let pass = seed_pass(&db, "KA01AB1234", now + Duration::days(2)).await;

        let report = service.scan_expiries(now).await.unwrap();
        assert_eq!(report.expired_passes, 0);
        assert_eq!(report.notifications_created, 1);

        let notice = notifications::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(
            notice.message,
            format!(
                "Reminder: Your parking pass for vehicle KA01AB1234 expires in 2 day(s) on {}.",
                pass.expires_at.format("%Y-%m-%d %H:%M")
            )
        );

        // rerunning does not duplicate the reminder
        let report = service.scan_expiries(now).await.unwrap();
        assert_eq!(report.notifications_created, 0);
        assert_eq!(notifications::Entity::find().all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_reminder_outside_window() {
        let db = setup_test_db().await;
        let service = ExpiryService::new(db.clone());
        let now = Utc::now();
        seed_pass(&db, "KA01AB1234", now + Duration::days(5)).await;
        // exactly three days out sits on the excluded upper bound
        seed_pass(&db, "DL3C4567", now + Duration::days(3)).await;

        let report = service.scan_expiries(now).await.unwrap();
        assert_eq!(report.notifications_created, 0);
        assert!(notifications::Entity::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reminded_pass_still_gets_expiry_notice() {
        let db = setup_test_db().await;
        let service = ExpiryService::new(db.clone());
        let now = Utc::now();
        let pass = seed_pass(&db, "KA01AB1234", now + Duration::days(1)).await;

        // reminder sweep first
        service.scan_expiries(now).await.unwrap();

        // then the pass lapses
        let later = now + Duration::days(2);
        let report = service.scan_expiries(later).await.unwrap();
        assert_eq!(report.expired_passes, 1);
        assert_eq!(report.notifications_created, 1);

        let all = notifications::Entity::find().all(&db).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|n| n.message.starts_with("Reminder:")));
        assert!(
            all.iter()
                .any(|n| n.message.starts_with("Your parking pass") && n.pass_id == Some(pass.id))
        );
    }
}
