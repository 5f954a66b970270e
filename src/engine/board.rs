// ==========================================
// 到港货柜看板 - 看板编排器
// ==========================================
// 职责: 串联一次完整重算
// 流程: 筛选 → 预分配三态 → 排序 → 状态/标记派生 → KPI/到港汇总/计数
// 红线: 纯函数;now 由调用方显式传入,整次重算只用这一个值
// ==========================================

use crate::config::BoardConfig;
use crate::domain::session::{is_allocated, note_of, SessionState};
use crate::domain::shipment::ShipmentRow;
use crate::domain::view::{BoardView, DisplayRow};
use crate::domain::zone::ZoneTable;
use crate::engine::aggregation::AggregationEngine;
use crate::engine::dates::days_until;
use crate::engine::filter::{apply_allocation_filter, FilterEngine, DEFAULT_NEXT_ARRIVAL_DAYS};
use crate::engine::sort::{SortContext, SortEngine};
use crate::engine::status::StatusClassifier;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

// ==========================================
// BoardEngine - 看板编排器
// ==========================================
pub struct BoardEngine {
    filter: FilterEngine,
    sorter: SortEngine,
    aggregation: AggregationEngine,
    classifier: StatusClassifier,
    next_arrival_days: i64,
}

impl BoardEngine {
    pub fn new(zones: ZoneTable) -> Self {
        Self::with_next_arrival_days(zones, DEFAULT_NEXT_ARRIVAL_DAYS)
    }

    pub fn with_next_arrival_days(zones: ZoneTable, days: i64) -> Self {
        Self {
            filter: FilterEngine::new(zones).with_next_arrival_days(days),
            sorter: SortEngine::new(),
            aggregation: AggregationEngine::new().with_next_arrival_days(days),
            classifier: StatusClassifier::new(),
            next_arrival_days: days,
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::with_next_arrival_days(config.zones.clone(), config.next_arrival_days)
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一次完整重算
    ///
    /// KPI 与到港汇总基于可见行（已筛选、未排序）,展示行为已排序结果
    #[instrument(skip_all, fields(dataset = rows.len()))]
    pub fn compute(&self, rows: &[ShipmentRow], state: &SessionState, now: DateTime<Utc>) -> BoardView {
        let filtered = self.filter.filter(rows, &state.criteria, now);
        let visible = apply_allocation_filter(filtered, state.allocation_filter, &state.allocations);

        let kpis = self.aggregation.kpis(&visible, &state.allocations, now);
        let arrival_summary = self.aggregation.arrival_summary(&visible, now);
        let counts = self.aggregation.visible_counts(&visible);

        let ordered = match state.sort {
            Some(spec) => {
                let ctx = SortContext {
                    now,
                    allocations: &state.allocations,
                    notes: &state.notes,
                };
                self.sorter.sort(visible, spec, &ctx)
            }
            None => visible,
        };

        let display: Vec<DisplayRow> = ordered
            .into_iter()
            .map(|row| self.display_row(row, state, now))
            .collect();

        info!(
            visible = counts.rows,
            containers = counts.containers,
            shipments = counts.shipments,
            total_kg = kpis.total_kg,
            "看板重算完成"
        );

        BoardView {
            rows: display,
            kpis,
            arrival_summary,
            counts,
        }
    }

    fn display_row(&self, row: &ShipmentRow, state: &SessionState, now: DateTime<Utc>) -> DisplayRow {
        DisplayRow {
            row: row.clone(),
            status: self.classifier.status(row, now),
            days_to_arrival: row.eta_date.map(|eta| days_until(eta, now)),
            arriving_soon: StatusClassifier::is_within_days(row.eta_date, now, self.next_arrival_days),
            arrived: StatusClassifier::has_passed(row.eta_date, now),
            allocated: is_allocated(&state.allocations, &row.key),
            note: note_of(&state.notes, &row.key).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::criteria::FilterCriteria;
    use crate::domain::session::SortSpec;
    use crate::domain::types::{AllocationFilter, Column, ShipmentStatus};
    use crate::engine::test_support::{iso, now, record, rows};
    use chrono::Duration;

    fn scenario() -> Vec<ShipmentRow> {
        let mut at_sea = record("S2", "C2", "Rotterdam", 2, 500.0);
        at_sea.etd = Some(iso(now() - Duration::days(1)));
        let mut scheduled = record("S3", "C3", "Antwerp", 10, 300.0);
        scheduled.etd = Some(iso(now() + Duration::days(1)));
        rows(vec![record("S1", "C1", "Rotterdam", -1, 1000.0), at_sea, scheduled])
    }

    #[test]
    fn test_three_row_scenario() {
        let data = scenario();
        let engine = BoardEngine::new(ZoneTable::new());
        let state = SessionState::new();

        let view = engine.compute(&data, &state, now());
        let statuses: Vec<ShipmentStatus> = view.rows.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![ShipmentStatus::Arrived, ShipmentStatus::AtSea, ShipmentStatus::Scheduled]
        );

        let groups: Vec<(i64, &str)> = view
            .arrival_summary
            .groups
            .iter()
            .map(|g| (g.days, g.port.as_str()))
            .collect();
        assert_eq!(groups, vec![(2, "Rotterdam"), (10, "Antwerp")]);

        let mut next_only = SessionState::new();
        next_only.set_criteria(FilterCriteria::new().next_arrivals_only());
        let view = engine.compute(&data, &next_only, now());
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].row.record.shipment_id.as_deref(), Some("S2"));
        assert!(view.rows[0].arriving_soon);
    }

    #[test]
    fn test_oversized_window_does_not_panic() {
        let data = scenario();
        let engine = BoardEngine::with_next_arrival_days(ZoneTable::new(), 100_000_000);
        let mut state = SessionState::new();
        state.set_criteria(FilterCriteria::new().next_arrivals_only());

        let view = engine.compute(&data, &state, now());
        // 窗口覆盖全部未来到港: S2 与 S3
        assert_eq!(view.counts.rows, 2);
        assert_eq!(view.kpis.unallocated_kg_7d, 800.0);
        assert!(view.rows.iter().all(|r| r.arriving_soon));
    }

    #[test]
    fn test_kpis_use_visible_rows_after_allocation_filter() {
        let data = scenario();
        let engine = BoardEngine::new(ZoneTable::new());
        let mut state = SessionState::new();
        state.set_allocation(&data[0].key, true);
        state.set_allocation_filter(AllocationFilter::Unallocated);

        let view = engine.compute(&data, &state, now());
        assert_eq!(view.counts.rows, 2);
        assert_eq!(view.kpis.total_kg, 800.0);
        assert_eq!(view.kpis.allocated_kg, 0.0);
        assert!(view.rows.iter().all(|r| !r.allocated));
    }

    #[test]
    fn test_sorted_display_and_derived_fields() {
        let data = scenario();
        let engine = BoardEngine::new(ZoneTable::new());
        let mut state = SessionState::new();
        state.toggle_sort(Column::Eta);
        state.toggle_sort(Column::Eta);
        state.set_note(&data[2].key, "call buyer");

        let view = engine.compute(&data, &state, now());
        let ids: Vec<&str> = view
            .rows
            .iter()
            .filter_map(|r| r.row.record.shipment_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["S3", "S2", "S1"]);
        assert_eq!(view.rows[0].note, "call buyer");
        assert_eq!(view.rows[0].days_to_arrival, Some(10));
        assert!(view.rows[2].arrived);
    }

    #[test]
    fn test_same_now_same_result() {
        let data = scenario();
        let engine = BoardEngine::new(ZoneTable::new());
        let mut state = SessionState::new();
        state.sort = Some(SortSpec::asc(Column::Status));

        let a = engine.compute(&data, &state, now());
        let b = engine.compute(&data, &state, now());
        assert_eq!(a, b);
    }
}
