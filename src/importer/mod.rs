// ==========================================
// 到港货柜看板 - 导入层
// ==========================================
// 职责: 外部数据集文件 → 规范化明细行
// 支持: JSON, CSV
// ==========================================

pub mod dataset_importer;
pub mod error;
pub mod file_parser;

pub use dataset_importer::{load_dataset, DatasetImporter};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, DatasetParser, JsonParser, UniversalFileParser};
