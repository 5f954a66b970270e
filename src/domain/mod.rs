// ==========================================
// 到港货柜看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、会话状态、输出模型
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod criteria;
pub mod session;
pub mod shipment;
pub mod types;
pub mod view;
pub mod zone;

// 重导出核心类型
pub use criteria::FilterCriteria;
pub use session::{is_allocated, note_of, AllocationMap, NoteMap, SessionState, SortSpec};
pub use shipment::{RawShipmentRecord, ShipmentRow, PLACEHOLDER};
pub use types::{AllocationFilter, ArrivalBucket, Column, ColumnKind, ShipmentStatus, SortDirection};
pub use view::{
    ArrivalGroup, ArrivalSummary, ArrivalTotals, BoardView, DisplayRow, KpiTotals, VisibleCounts,
};
pub use zone::{ZoneTable, ALL_ZONES};
