// ==========================================
// 到港货柜看板 - 核心库
// ==========================================
// 职责: 在途货柜明细的筛选、排序、重量 KPI、到港汇总与 CSV 导出
// 系统定位: 决策支持 (预分配由人工标记)
// 红线: 引擎为纯函数,参考时间 now 由调用方显式传入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据集
pub mod importer;

// 导出层 - CSV
pub mod exporter;

// 配置层 - 看板配置
pub mod config;

// 应用层 - 会话与视图缓存
pub mod app;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AllocationFilter, ArrivalBucket, Column, ColumnKind, ShipmentStatus, SortDirection,
};

// 领域实体
pub use domain::{
    ArrivalSummary, BoardView, DisplayRow, FilterCriteria, KpiTotals, RawShipmentRecord,
    SessionState, ShipmentRow, SortSpec, VisibleCounts, ZoneTable,
};

// 引擎
pub use engine::{
    AggregationEngine, BoardEngine, DatasetNormalizer, FilterEngine, SortEngine,
    StatusClassifier,
};

// 导入 / 导出 / 配置
pub use app::BoardSession;
pub use config::{BoardConfig, ConfigError, ReferenceClock};
pub use exporter::{CsvExporter, ExportError};
pub use importer::{load_dataset, DatasetImporter, ImportError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "到港货柜看板";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
