// ==========================================
// 到港货柜看板 - 数据集规范化
// ==========================================
// 职责: 原始记录 → 派生明细行（解析日期 + 稳定键）
// 输入: 有序原始记录
// 输出: 等长、同序的 ShipmentRow
// 红线: 每次加载数据集只执行一次,不随筛选/排序重跑
// ==========================================

use crate::domain::shipment::{RawShipmentRecord, ShipmentRow};
use crate::engine::dates::parse_timestamp;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

// ==========================================
// DatasetNormalizer - 数据集规范化器
// ==========================================
pub struct DatasetNormalizer;

impl DatasetNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// 规范化整个数据集
    ///
    /// 稳定键 = shipment_id | (container_id ?? container_code) | (line_id ?? 位置序号)
    ///
    /// 输入数据若出现重复键,追加 `#<序号>` 消歧,保证键唯一且确定
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn normalize(&self, records: Vec<RawShipmentRecord>) -> Vec<ShipmentRow> {
        let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
        let mut unparsed_dates = 0usize;

        let rows: Vec<ShipmentRow> = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let mut key = Self::stable_key(&record, index);
                if !seen.insert(key.clone()) {
                    warn!(key = %key, index, "稳定键重复,追加序号消歧");
                    // 追加后的键仍可能与其他行的原始键相同,继续追加直到唯一
                    key = format!("{}#{}", key, index);
                    while !seen.insert(key.clone()) {
                        key = format!("{}#{}", key, index);
                    }
                }

                let etd_date = record.etd.as_deref().and_then(parse_timestamp);
                let eta_date = record.eta.as_deref().and_then(parse_timestamp);
                if etd_date.is_none() || eta_date.is_none() {
                    unparsed_dates += 1;
                }

                ShipmentRow {
                    record,
                    index,
                    key,
                    etd_date,
                    eta_date,
                }
            })
            .collect();

        if unparsed_dates > 0 {
            warn!(unparsed_dates, "存在无法解析的 ETD/ETA,相关行不参与日期筛选");
        }
        debug!(rows = rows.len(), "数据集规范化完成");

        rows
    }

    /// 计算单行稳定键
    pub fn stable_key(record: &RawShipmentRecord, index: usize) -> String {
        let shipment = record.shipment_id.as_deref().unwrap_or("");
        let container = record
            .container_id
            .as_deref()
            .or(record.container_code.as_deref())
            .unwrap_or("");
        let line = match record.line_id.as_deref() {
            Some(line_id) => line_id.to_string(),
            None => index.to_string(),
        };

        format!("{}|{}|{}", shipment, container, line)
    }
}

impl Default for DatasetNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(shipment: &str, container_id: Option<&str>, code: Option<&str>, line: Option<&str>) -> RawShipmentRecord {
        RawShipmentRecord {
            shipment_id: Some(shipment.to_string()),
            container_id: container_id.map(str::to_string),
            container_code: code.map(str::to_string),
            line_id: line.map(str::to_string),
            etd: Some("2024-03-01T00:00:00Z".to_string()),
            eta: Some("2024-03-20T00:00:00Z".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_stable_key_fallbacks() {
        let a = record("S1", Some("C1"), Some("MSCU1"), Some("L7"));
        let b = record("S1", None, Some("MSCU1"), None);
        assert_eq!(DatasetNormalizer::stable_key(&a, 0), "S1|C1|L7");
        assert_eq!(DatasetNormalizer::stable_key(&b, 3), "S1|MSCU1|3");
    }

    #[test]
    fn test_normalize_preserves_order_and_parses_dates() {
        let mut bad = record("S2", Some("C2"), None, None);
        bad.eta = Some("garbage".to_string());

        let rows = DatasetNormalizer::new().normalize(vec![record("S1", Some("C1"), None, None), bad]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[1].index, 1);
        assert!(rows[0].eta_date.is_some());
        assert!(rows[1].etd_date.is_some());
        assert!(rows[1].eta_date.is_none());
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let input = vec![
            record("S1", Some("C1"), None, None),
            record("S1", Some("C1"), None, None),
        ];
        let first = DatasetNormalizer::new().normalize(input.clone());
        let second = DatasetNormalizer::new().normalize(input);
        let keys: Vec<&str> = first.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, second.iter().map(|r| r.key.as_str()).collect::<Vec<_>>());
    }

    #[test]
    fn test_duplicate_keys_are_disambiguated() {
        let rows = DatasetNormalizer::new().normalize(vec![
            record("S1", Some("C1"), None, Some("L1")),
            record("S1", Some("C1"), None, Some("L1")),
        ]);
        assert_eq!(rows[0].key, "S1|C1|L1");
        assert_eq!(rows[1].key, "S1|C1|L1#1");
    }

    #[test]
    fn test_suffixed_key_never_collides_with_natural_key() {
        let rows = DatasetNormalizer::new().normalize(vec![
            record("S", Some("C"), None, Some("L#2")),
            record("S", Some("C"), None, Some("L")),
            record("S", Some("C"), None, Some("L")),
        ]);

        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["S|C|L#2", "S|C|L", "S|C|L#2#2"]);

        let distinct: HashSet<&str> = keys.iter().copied().collect();
        assert_eq!(distinct.len(), rows.len());
    }
}
