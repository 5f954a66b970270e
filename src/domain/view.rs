// ==========================================
// 到港货柜看板 - 看板输出模型
// ==========================================
// 用途: 每次重算的输出,交给渲染层/导出层
// ==========================================

use crate::domain::shipment::ShipmentRow;
use crate::domain::types::{Column, ShipmentStatus};
use serde::Serialize;
use std::collections::BTreeSet;

// ==========================================
// DisplayRow - 展示行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub row: ShipmentRow,
    pub status: ShipmentStatus,
    pub days_to_arrival: Option<i64>, // None = ETA 无法解析
    pub arriving_soon: bool,          // 未来 N 天内到港
    pub arrived: bool,                // ETA 已过
    pub allocated: bool,
    pub note: String,
}

impl DisplayRow {
    pub fn key(&self) -> &str {
        &self.row.key
    }

    /// 单元格文本（渲染与导出共用）
    ///
    /// 数值按缺省十进制格式输出,不做千分位;缺失值输出 missing
    pub fn cell(&self, column: Column, missing: &str) -> String {
        let record = &self.row.record;
        match column {
            Column::DaysToArrival => self
                .days_to_arrival
                .map_or_else(|| missing.to_string(), |d| d.to_string()),
            Column::Status => self.status.label().to_string(),
            Column::BoxCount => number(record.box_count, missing),
            Column::BoxWeight => number(record.box_weight_kg, missing),
            Column::LineWeight => number(record.line_weight_kg, missing),
            Column::Allocated => (if self.allocated { "Yes" } else { "No" }).to_string(),
            Column::Note => self.note.clone(),
            other => self.row.text(other).unwrap_or(missing).to_string(),
        }
    }
}

fn number(value: Option<f64>, missing: &str) -> String {
    value.map_or_else(|| missing.to_string(), |v| v.to_string())
}

// ==========================================
// KpiTotals - 重量 KPI
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiTotals {
    pub total_kg: f64,
    pub allocated_kg: f64,
    pub unallocated_kg: f64,
    pub unallocated_kg_7d: f64, // 未分配且近期到港
    pub allocated_pct: f64,
    pub unallocated_7d_pct: f64,
}

// ==========================================
// ArrivalGroup - 到港汇总分组
// ==========================================
// 分组键: (目的港, 距到港天数)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArrivalGroup {
    pub port: String,
    pub days: i64,
    pub total_kg: f64,
    pub containers: BTreeSet<String>,
    pub shipments: BTreeSet<String>,
    pub lines: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArrivalTotals {
    pub total_kg: f64,
    pub containers: BTreeSet<String>,
    pub shipments: BTreeSet<String>,
    pub lines: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArrivalSummary {
    pub groups: Vec<ArrivalGroup>, // 天数升序,同天按港口名升序
    pub totals: ArrivalTotals,
}

// ==========================================
// VisibleCounts - 可见计数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VisibleCounts {
    pub rows: usize,
    pub containers: usize,
    pub shipments: usize,
}

// ==========================================
// BoardView - 一次重算的完整输出
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardView {
    pub rows: Vec<DisplayRow>, // 已筛选 + 已排序
    pub kpis: KpiTotals,
    pub arrival_summary: ArrivalSummary,
    pub counts: VisibleCounts,
}

impl BoardView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
