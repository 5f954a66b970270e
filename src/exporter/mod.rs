// ==========================================
// 到港货柜看板 - 导出层
// ==========================================
// 职责: 当前可见行（已筛选 + 已排序）导出为 CSV
// ==========================================

pub mod csv_exporter;
pub mod error;

pub use csv_exporter::CsvExporter;
pub use error::{ExportError, ExportResult};
