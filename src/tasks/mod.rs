//! Background scheduled tasks for the application.
//!
//! The one recurring job is the pass-expiry sweep that deactivates lapsed
//! passes and writes expiry/reminder notifications.
//! Call `spawn_all` once during startup to launch it.

use crate::services::ExpiryService;
use chrono::Utc;

/// Spawn all background tasks.
///
/// Notes
/// - The sweep is idempotent as implemented in its service, so a restart or
///   an overlapping manual run never duplicates notifications.
/// - This function detaches tasks via `tokio::spawn`; it does not block.
pub fn spawn_all(expiry_service: ExpiryService, scan_interval_secs: u64) {
    // 定时扫描过期通行证并生成通知
    tokio::spawn(async move {
        loop {
            match expiry_service.scan_expiries(Utc::now()).await {
                Ok(report) if report.expired_passes > 0 || report.notifications_created > 0 => {
                    log::info!(
                        "Expiry sweep finished: {} passes expired, {} notifications created",
                        report.expired_passes,
                        report.notifications_created
                    );
                }
                Ok(_) => {}
                Err(e) => log::error!("Failed to run expiry sweep: {e:?}"),
            }
            tokio::time::sleep(std::time::Duration::from_secs(scan_interval_secs)).await;
        }
    });
}
