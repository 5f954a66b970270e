// ==========================================
// 到港货柜看板 - 货运状态判定
// ==========================================
// 规则（顺序执行,命中即返回）:
// 1) eta < now → Arrived
// 2) etd <= now <= eta → At sea
// 3) 其他 → Scheduled
// 边界: eta == now 不算 Arrived;etd == eta == now 为 At sea
// 无法解析的日期参与的比较一律为假
// ==========================================

use crate::domain::shipment::ShipmentRow;
use crate::domain::types::ShipmentStatus;
use crate::engine::dates::in_next_window;
use chrono::{DateTime, Utc};

// ==========================================
// StatusClassifier - 状态判定器
// ==========================================
// 无状态,所有方法都是纯函数
pub struct StatusClassifier;

impl StatusClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn status(&self, row: &ShipmentRow, now: DateTime<Utc>) -> ShipmentStatus {
        Self::classify(row.etd_date, row.eta_date, now)
    }

    pub fn classify(
        etd: Option<DateTime<Utc>>,
        eta: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> ShipmentStatus {
        if let Some(eta) = eta {
            if eta < now {
                return ShipmentStatus::Arrived;
            }
        }

        match (etd, eta) {
            (Some(etd), Some(eta)) if etd <= now && now <= eta => ShipmentStatus::AtSea,
            _ => ShipmentStatus::Scheduled,
        }
    }

    /// 0 < eta - now <= days（严格未来,已到港不算）
    pub fn is_within_days(eta: Option<DateTime<Utc>>, now: DateTime<Utc>, days: i64) -> bool {
        eta.map_or(false, |eta| in_next_window(eta, now, days))
    }

    /// eta < now
    pub fn has_passed(eta: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        eta.map_or(false, |eta| eta < now)
    }
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        crate::engine::dates::parse_timestamp("2024-03-10T12:00:00Z").unwrap()
    }

    #[test]
    fn test_three_states() {
        let now = now();
        let day = Duration::days(1);

        assert_eq!(
            StatusClassifier::classify(Some(now - day * 10), Some(now - day), now),
            ShipmentStatus::Arrived
        );
        assert_eq!(
            StatusClassifier::classify(Some(now - day), Some(now + day * 2), now),
            ShipmentStatus::AtSea
        );
        assert_eq!(
            StatusClassifier::classify(Some(now + day), Some(now + day * 10), now),
            ShipmentStatus::Scheduled
        );
    }

    #[test]
    fn test_boundary_eta_equals_now() {
        let now = now();
        assert_eq!(
            StatusClassifier::classify(Some(now - Duration::days(3)), Some(now), now),
            ShipmentStatus::AtSea
        );
    }

    #[test]
    fn test_boundary_etd_eta_equal_now() {
        let now = now();
        assert_eq!(
            StatusClassifier::classify(Some(now), Some(now), now),
            ShipmentStatus::AtSea
        );
    }

    #[test]
    fn test_boundary_etd_equals_now_before_eta() {
        let now = now();
        assert_eq!(
            StatusClassifier::classify(Some(now), Some(now + Duration::hours(1)), now),
            ShipmentStatus::AtSea
        );
    }

    #[test]
    fn test_unparsed_dates() {
        let now = now();
        assert_eq!(StatusClassifier::classify(None, None, now), ShipmentStatus::Scheduled);
        assert_eq!(
            StatusClassifier::classify(None, Some(now - Duration::days(1)), now),
            ShipmentStatus::Arrived
        );
        assert_eq!(
            StatusClassifier::classify(Some(now - Duration::days(1)), None, now),
            ShipmentStatus::Scheduled
        );
    }

    #[test]
    fn test_badge_helpers() {
        let now = now();
        assert!(!StatusClassifier::is_within_days(Some(now), now, 7));
        assert!(StatusClassifier::is_within_days(Some(now + Duration::days(7)), now, 7));
        assert!(!StatusClassifier::is_within_days(Some(now + Duration::days(8)), now, 7));
        assert!(!StatusClassifier::is_within_days(None, now, 7));

        assert!(StatusClassifier::has_passed(Some(now - Duration::seconds(1)), now));
        assert!(!StatusClassifier::has_passed(Some(now), now));
        assert!(!StatusClassifier::has_passed(None, now));
    }
}
