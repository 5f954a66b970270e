// ==========================================
// 到港货柜看板 - 数据集文件解析
// ==========================================
// 支持: JSON（记录数组,或 {"records"|"data"|"rows": [...]}）/ CSV（首行表头）
// 红线: 单条记录无法识别时跳过并告警,不中断整体加载
// ==========================================

use crate::domain::shipment::RawShipmentRecord;
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, Trim};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// JSON 包装对象中可能承载记录数组的键
const WRAPPER_KEYS: [&str; 3] = ["records", "data", "rows"];

// ==========================================
// DatasetParser - 文件解析接口
// ==========================================
pub trait DatasetParser {
    /// 解析文件为原始记录（保持文件内顺序）
    fn parse_records(&self, path: &Path) -> ImportResult<Vec<RawShipmentRecord>>;
}

fn check_file(path: &Path, expected: &[&str]) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !expected.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    Ok(())
}

// ==========================================
// JSON Parser 实现
// ==========================================
pub struct JsonParser;

impl DatasetParser for JsonParser {
    fn parse_records(&self, path: &Path) -> ImportResult<Vec<RawShipmentRecord>> {
        check_file(path, &["json"])?;
        let raw = std::fs::read_to_string(path)?;
        records_from_json_str(&raw)
    }
}

/// 从 JSON 文本解析记录
pub fn records_from_json_str(raw: &str) -> ImportResult<Vec<RawShipmentRecord>> {
    let root: Value = serde_json::from_str(raw)?;

    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut obj) => WRAPPER_KEYS
            .iter()
            .find_map(|key| match obj.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                ImportError::DatasetShapeError(format!(
                    "JSON 对象中未找到记录数组（{}）",
                    WRAPPER_KEYS.join("/")
                ))
            })?,
        other => {
            return Err(ImportError::DatasetShapeError(format!(
                "期望记录数组,实际为 {}",
                json_kind(&other)
            )))
        }
    };

    Ok(deserialize_items(items))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn deserialize_items(items: Vec<Value>) -> Vec<RawShipmentRecord> {
    let total = items.len();
    let mut skipped = 0usize;

    let records: Vec<RawShipmentRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<RawShipmentRecord>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                skipped += 1;
                warn!(record = idx, error = %e, "记录无法识别,已跳过");
                None
            }
        })
        .collect();

    debug!(total, skipped, "记录解析完成");
    records
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 每行先转为 表头 → 文本 的映射,再按字段名映射到记录;
// 所有值按文本读入,标识字段保留前导零
pub struct CsvParser;

impl DatasetParser for CsvParser {
    fn parse_records(&self, path: &Path) -> ImportResult<Vec<RawShipmentRecord>> {
        check_file(path, &["csv"])?;
        let file = File::open(path)?;
        records_from_csv_reader(file)
    }
}

/// 从 CSV 输入流解析记录
pub fn records_from_csv_reader<R: Read>(input: R) -> ImportResult<Vec<RawShipmentRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .trim(Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut items = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = Map::new();

        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                row.insert(header.clone(), Value::String(value.to_string()));
            }
        }

        // 跳过完全空白的行
        if row.values().all(|v| v.as_str().map_or(true, str::is_empty)) {
            continue;
        }

        items.push(Value::Object(row));
    }

    Ok(deserialize_items(items))
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawShipmentRecord>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "json" => JsonParser.parse_records(path),
            "csv" => CsvParser.parse_records(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
