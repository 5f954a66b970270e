// ==========================================
// 测试辅助函数（仅测试编译）
// ==========================================

use crate::domain::shipment::{RawShipmentRecord, ShipmentRow};
use crate::engine::dates::parse_timestamp;
use crate::engine::normalizer::DatasetNormalizer;
use chrono::{DateTime, Duration, SecondsFormat, Utc};

pub fn now() -> DateTime<Utc> {
    parse_timestamp("2024-03-10T12:00:00Z").unwrap()
}

pub fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 创建测试用明细: ETA = now + eta_days 天,ETD = ETA - 20 天
pub fn record(shipment: &str, container: &str, pod: &str, eta_days: i64, kg: f64) -> RawShipmentRecord {
    let eta = now() + Duration::days(eta_days);
    RawShipmentRecord {
        booking_ref: Some(format!("BK-{}", shipment)),
        shipment_id: Some(shipment.to_string()),
        container_id: Some(container.to_string()),
        container_code: Some(format!("MSCU{}", container)),
        pod: Some(pod.to_string()),
        vessel: Some("MSC Aurora".to_string()),
        voyage: Some("VY101".to_string()),
        etd: Some(iso(eta - Duration::days(20))),
        eta: Some(iso(eta)),
        variety: Some("Hass".to_string()),
        caliber: Some("18".to_string()),
        pack_format: Some("4kg".to_string()),
        box_count: Some(100.0),
        box_weight_kg: Some(kg / 100.0),
        line_weight_kg: Some(kg),
        ..Default::default()
    }
}

pub fn rows(records: Vec<RawShipmentRecord>) -> Vec<ShipmentRow> {
    DatasetNormalizer::new().normalize(records)
}

pub fn keys(rows: &[&ShipmentRow]) -> Vec<String> {
    rows.iter().map(|r| r.key.clone()).collect()
}
