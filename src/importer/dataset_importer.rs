// ==========================================
// 到港货柜看板 - 数据集导入器
// ==========================================
// 流程: 解析文件 → 原始记录 → 规范化（稳定键 + 日期解析）
// 输出: 行序与文件内记录顺序一致
// ==========================================

use crate::domain::shipment::{RawShipmentRecord, ShipmentRow};
use crate::engine::normalizer::DatasetNormalizer;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{records_from_json_str, UniversalFileParser};
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument};

// ==========================================
// DatasetImporter - 数据集导入器
// ==========================================
pub struct DatasetImporter {
    parser: UniversalFileParser,
    normalizer: DatasetNormalizer,
}

impl DatasetImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            normalizer: DatasetNormalizer::new(),
        }
    }

    /// 从文件导入（按扩展名选择 JSON / CSV）
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> ImportResult<Vec<ShipmentRow>> {
        let started = Instant::now();
        let records = self.parser.parse(path.as_ref())?;
        let rows = self.import_records(records);

        info!(
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "数据集导入完成"
        );
        Ok(rows)
    }

    /// 从 JSON 文本导入
    pub fn import_json_str(&self, raw: &str) -> ImportResult<Vec<ShipmentRow>> {
        let records = records_from_json_str(raw)?;
        Ok(self.import_records(records))
    }

    /// 已解析记录直接规范化
    pub fn import_records(&self, records: Vec<RawShipmentRecord>) -> Vec<ShipmentRow> {
        self.normalizer.normalize(records)
    }
}

impl Default for DatasetImporter {
    fn default() -> Self {
        Self::new()
    }
}

/// 便捷入口: 读取并规范化数据集文件
pub fn load_dataset<P: AsRef<Path>>(path: P) -> ImportResult<Vec<ShipmentRow>> {
    DatasetImporter::new().import_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ImportError;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_import_json_keeps_order_and_keys() {
        let rows = DatasetImporter::new()
            .import_json_str(
                r#"[
                    {"shipment_id": "S2", "container_id": "C9", "line_id": "L1"},
                    {"shipment_id": "S1", "container_code": "MSCU1"}
                ]"#,
            )
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "S2|C9|L1");
        assert_eq!(rows[1].key, "S1|MSCU1|1");
        assert_eq!(rows[1].index, 1);
    }

    #[test]
    fn test_load_dataset_from_csv_file() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "shipment_id,container_code,eta,line_weight_kg").unwrap();
        writeln!(file, "S1,MSCU1,2024-03-12T00:00:00Z,100").unwrap();
        writeln!(file, "S1,MSCU1,not-a-date,50").unwrap();

        let rows = load_dataset(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].eta_date.is_some());
        assert!(rows[1].eta_date.is_none());
        assert_eq!(rows[1].line_weight_kg(), 50.0);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let result = load_dataset("/nonexistent/shipments.json");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
