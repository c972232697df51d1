use crate::entities::pass_entity::PassType;
use chrono::{DateTime, Duration, Utc};

/// Validity period granted by each pass type.
pub fn duration_for(pass_type: PassType) -> Duration {
    match pass_type {
        PassType::Daily => Duration::days(1),
        PassType::Weekly => Duration::days(7),
        PassType::Monthly => Duration::days(30),
        PassType::Yearly => Duration::days(365),
    }
}

pub fn expiry_for(pass_type: PassType, issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + duration_for(pass_type)
}

/// A pass is active while its flag is set and its expiry is still in the future.
pub fn is_active(is_active_flag: bool, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    is_active_flag && expires_at > now
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_for_each_pass_type() {
        assert_eq!(duration_for(PassType::Daily), Duration::days(1));
        assert_eq!(duration_for(PassType::Weekly), Duration::days(7));
        assert_eq!(duration_for(PassType::Monthly), Duration::days(30));
        assert_eq!(duration_for(PassType::Yearly), Duration::days(365));
    }

    #[test]
    fn test_expiry_from_issue_time() {
        let issued = Utc::now();
        assert_eq!(
            expiry_for(PassType::Weekly, issued),
            issued + Duration::days(7)
        );
    }

    #[test]
    fn test_active_window_is_exclusive_at_expiry() {
        let now = Utc::now();
        assert!(is_active(true, now + Duration::seconds(1), now));
        // exactly at expiry the pass is no longer active
        assert!(!is_active(true, now, now));
        assert!(!is_active(true, now - Duration::seconds(1), now));
        assert!(!is_active(false, now + Duration::days(1), now));
    }
}
