// ==========================================
// 到港货柜看板 - 排序引擎
// ==========================================
// 职责: 按任意列排序可见行
// 排序键（按列语义）:
// - 数值列: 原值,缺失按 0
// - 日期列: 时间戳毫秒;无法解析的日期不论方向恒排最后
// - 距到港天数: round((eta - now) / 1 天)
// - 状态列: 状态文本字典序（Arrived < At sea < Scheduled）
// - 预分配列: false=0 / true=1
// - 备注 / 文本 / 标识列: 大小写折叠后的字符串
// ==========================================

use crate::domain::session::{is_allocated, note_of, AllocationMap, NoteMap, SortSpec};
use crate::domain::shipment::ShipmentRow;
use crate::domain::types::{Column, ColumnKind, SortDirection};
use crate::engine::dates::days_until;
use crate::engine::status::StatusClassifier;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::{debug, instrument};

// ==========================================
// SortContext - 排序上下文
// ==========================================
// 派生列与会话列需要 now 和会话映射
pub struct SortContext<'s> {
    pub now: DateTime<Utc>,
    pub allocations: &'s AllocationMap,
    pub notes: &'s NoteMap,
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Text(String),
    Number(f64),
    Instant(i64),
    Missing,
}

impl SortKey {
    fn cmp_present(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Instant(a), SortKey::Instant(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

// ==========================================
// SortEngine - 排序引擎
// ==========================================
pub struct SortEngine;

impl SortEngine {
    pub fn new() -> Self {
        Self
    }

    /// 排序
    ///
    /// 使用稳定排序: 键相同的行保持输入（筛选后）顺序
    #[instrument(skip(self, rows, ctx), fields(count = rows.len()))]
    pub fn sort<'a>(
        &self,
        rows: Vec<&'a ShipmentRow>,
        spec: SortSpec,
        ctx: &SortContext<'_>,
    ) -> Vec<&'a ShipmentRow> {
        let mut keyed: Vec<(SortKey, &'a ShipmentRow)> = rows
            .into_iter()
            .map(|row| (Self::sort_key(row, spec.column, ctx), row))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| Self::compare_keys(a, b, spec.direction));

        debug!(column = %spec.column, direction = %spec.direction, "排序完成");
        keyed.into_iter().map(|(_, row)| row).collect()
    }

    /// 比较两行（供外部按同一语义排序）
    pub fn compare(
        a: &ShipmentRow,
        b: &ShipmentRow,
        spec: SortSpec,
        ctx: &SortContext<'_>,
    ) -> Ordering {
        Self::compare_keys(
            &Self::sort_key(a, spec.column, ctx),
            &Self::sort_key(b, spec.column, ctx),
            spec.direction,
        )
    }

    fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
        match (a, b) {
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Greater,
            (_, SortKey::Missing) => Ordering::Less,
            _ => {
                let ord = a.cmp_present(b);
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
        }
    }

    fn sort_key(row: &ShipmentRow, column: Column, ctx: &SortContext<'_>) -> SortKey {
        match column.kind() {
            ColumnKind::Numeric => SortKey::Number(match column {
                Column::BoxCount => row.box_count(),
                Column::BoxWeight => row.box_weight_kg(),
                _ => row.line_weight_kg(),
            }),
            ColumnKind::Date => {
                let date = if column == Column::Etd {
                    row.etd_date
                } else {
                    row.eta_date
                };
                date.map_or(SortKey::Missing, |d| SortKey::Instant(d.timestamp_millis()))
            }
            ColumnKind::DaysToArrival => row
                .eta_date
                .map_or(SortKey::Missing, |eta| SortKey::Instant(days_until(eta, ctx.now))),
            ColumnKind::Status => SortKey::Text(
                StatusClassifier::classify(row.etd_date, row.eta_date, ctx.now)
                    .label()
                    .to_string(),
            ),
            ColumnKind::Allocation => {
                SortKey::Number(if is_allocated(ctx.allocations, &row.key) { 1.0 } else { 0.0 })
            }
            ColumnKind::Text => {
                let text = if column == Column::Note {
                    note_of(ctx.notes, &row.key)
                } else {
                    row.text(column).unwrap_or("")
                };
                SortKey::Text(text.to_lowercase())
            }
        }
    }
}

impl Default for SortEngine {
    fn default() -> Self {
        Self::new()
    }
}
