// ==========================================
// 到港货柜看板 - 引擎层
// ==========================================
// 职责: 规范化、状态判定、筛选、排序、汇总
// 红线: 引擎不做文件读写,不持有会话状态;now 一律显式传入
// ==========================================

pub mod aggregation;
pub mod board;
pub mod dates;
pub mod filter;
pub mod normalizer;
pub mod sort;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support;

// 重导出核心引擎
pub use aggregation::AggregationEngine;
pub use board::BoardEngine;
pub use filter::{
    apply_allocation_filter, facet_values, CompiledFilter, FilterEngine,
    DEFAULT_NEXT_ARRIVAL_DAYS, SEARCH_COLUMNS,
};
pub use normalizer::DatasetNormalizer;
pub use sort::{SortContext, SortEngine};
pub use status::StatusClassifier;
