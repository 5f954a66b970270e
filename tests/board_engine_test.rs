// ==========================================
// 看板引擎集成测试
// ==========================================
// 职责: 验证 筛选 → 预分配 → 排序 → 汇总 的完整数据流转
// 场景: 三行典型场景 + 多港口数据集
// ==========================================


use chrono::Duration;
use shipment_board::domain::session::{SessionState, SortSpec};
use shipment_board::engine::dates::days_until;
use shipment_board::engine::filter::FilterEngine;
use shipment_board::engine::sort::{SortContext, SortEngine};
use shipment_board::logging;
use shipment_board::{
    AllocationFilter, ArrivalBucket, BoardEngine, Column, FilterCriteria, ShipmentRow,
    ShipmentStatus, ZoneTable,
};
use std::collections::HashMap;
use test_helpers::*;

fn zones() -> ZoneTable {
    ZoneTable::new()
        .with_zone("Europe", ["Rotterdam", "Antwerp", "Le Havre"])
        .with_zone("Asia", ["Shanghai", "Busan"])
}

fn multi_port_dataset() -> Vec<ShipmentRow> {
    normalize(vec![
        create_test_record("S10", "C10", "Rotterdam", 1, 1200.0),
        create_test_record("S10", "C11", "Rotterdam", 1, 800.0),
        create_test_record("S11", "C12", "Shanghai", 4, 2000.0),
        create_test_record("S12", "C13", "Antwerp", 6, 650.0),
        create_test_record("S13", "C14", "Busan", 12, 900.0),
        create_test_record("S14", "C15", "Le Havre", -3, 400.0),
        create_test_record("S15", "C16", "Rotterdam", 7, 300.0),
    ])
}

// ==========================================
// 三行场景
// ==========================================

#[test]
fn test_three_row_scenario_end_to_end() {
    logging::init_test();

    let rows = three_row_scenario();
    let now = fixed_now();
    let engine = BoardEngine::new(zones());

    let view = engine.compute(&rows, &SessionState::new(), now);
    let statuses: Vec<ShipmentStatus> = view.rows.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![ShipmentStatus::Arrived, ShipmentStatus::AtSea, ShipmentStatus::Scheduled]
    );

    // 近期到港只保留第二行
    let mut state = SessionState::new();
    state.set_criteria(FilterCriteria::new().next_arrivals_only());
    let view = engine.compute(&rows, &state, now);
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].row.record.shipment_id.as_deref(), Some("S2"));

    // 到港汇总: 第二行 2 天,第三行 10 天,已到港行不参与
    let view = engine.compute(&rows, &SessionState::new(), now);
    let groups: Vec<(String, i64)> = view
        .arrival_summary
        .groups
        .iter()
        .map(|g| (g.port.clone(), g.days))
        .collect();
    assert_eq!(
        groups,
        vec![("Rotterdam".to_string(), 2), ("Antwerp".to_string(), 10)]
    );
    assert_eq!(view.arrival_summary.totals.total_kg, 800.0);
}

// ==========================================
// 筛选性质
// ==========================================

#[test]
fn test_next_arrival_window_bounds() {
    let rows = multi_port_dataset();
    let now = fixed_now();
    let filter = FilterEngine::new(zones());
    let criteria = FilterCriteria::new().next_arrivals_only();

    let visible = filter.filter(&rows, &criteria, now);
    assert!(!visible.is_empty());
    for row in &visible {
        let eta = row.eta_date.unwrap();
        assert!(now < eta && eta <= now + Duration::days(7));
    }
    // 第 7 天的 Rotterdam 行包含在内,第 12 天的 Busan 行不在
    assert_eq!(visible.len(), 5);
}

#[test]
fn test_filter_idempotent_and_order_preserving() {
    let rows = multi_port_dataset();
    let now = fixed_now();
    let filter = FilterEngine::new(zones());
    let criteria = FilterCriteria::new().with_zone("Europe").with_search("mscuc1");

    let once = filter.filter(&rows, &criteria, now);
    let twice = filter.filter(once.iter().copied(), &criteria, now);
    assert_eq!(once, twice);

    let indexes: Vec<usize> = once.iter().map(|r| r.index).collect();
    let mut sorted = indexes.clone();
    sorted.sort_unstable();
    assert_eq!(indexes, sorted);
}

#[test]
fn test_zone_and_bucket_combination() {
    let rows = multi_port_dataset();
    let now = fixed_now();
    let filter = FilterEngine::new(zones());

    let criteria = FilterCriteria::new()
        .with_zone("Europe")
        .with_bucket(ArrivalBucket::Within2);
    let visible = filter.filter(&rows, &criteria, now);
    // Rotterdam 1 天 ×2 与 Le Havre -3 天（<=2 含负数）
    let ports: Vec<&str> = visible.iter().map(|r| r.record.pod.as_deref().unwrap()).collect();
    assert_eq!(ports, vec!["Rotterdam", "Rotterdam", "Le Havre"]);

    // 未知区域不约束
    let unknown = FilterCriteria::new().with_zone("Atlantis");
    assert_eq!(filter.filter(&rows, &unknown, now).len(), rows.len());
}

// ==========================================
// 排序性质
// ==========================================

#[test]
fn test_sort_desc_reverses_asc() {
    let rows = multi_port_dataset();
    let now = fixed_now();
    let allocations = HashMap::new();
    let notes = HashMap::new();
    let ctx = SortContext {
        now,
        allocations: &allocations,
        notes: &notes,
    };
    let sorter = SortEngine::new();
    let refs: Vec<&ShipmentRow> = rows.iter().collect();

    let asc = sorter.sort(refs.clone(), SortSpec::asc(Column::LineWeight), &ctx);
    let desc = sorter.sort(asc.clone(), SortSpec::desc(Column::LineWeight), &ctx);

    let mut reversed = asc.clone();
    reversed.reverse();
    assert_eq!(desc, reversed);
}

#[test]
fn test_days_to_arrival_sort_uses_rounded_days() {
    let rows = multi_port_dataset();
    let now = fixed_now();
    let mut state = SessionState::new();
    state.toggle_sort(Column::DaysToArrival);

    let view = BoardEngine::new(zones()).compute(&rows, &state, now);
    let days: Vec<i64> = view.rows.iter().map(|r| r.days_to_arrival.unwrap()).collect();
    assert_eq!(days, vec![-3, 1, 1, 4, 6, 7, 12]);
    assert_eq!(days_until(rows[4].eta_date.unwrap(), now), 12);
}

// ==========================================
// KPI 性质
// ==========================================

#[test]
fn test_kpi_partition_and_allocation_filter() {
    let rows = multi_port_dataset();
    let now = fixed_now();
    let engine = BoardEngine::new(zones());

    let mut state = SessionState::new();
    state.set_allocation(&rows[0].key, true);
    state.set_allocation(&rows[2].key, true);

    let view = engine.compute(&rows, &state, now);
    let kpis = &view.kpis;
    assert_eq!(kpis.total_kg, 6250.0);
    assert_eq!(kpis.allocated_kg, 3200.0);
    assert_eq!(kpis.allocated_kg + kpis.unallocated_kg, kpis.total_kg);
    // 未分配且 7 天内: 800 + 650 + 300
    assert_eq!(kpis.unallocated_kg_7d, 1750.0);
    assert_eq!(kpis.allocated_pct, 3200.0 * 100.0 / 6250.0);

    state.set_allocation_filter(AllocationFilter::Allocated);
    let view = engine.compute(&rows, &state, now);
    assert_eq!(view.counts.rows, 2);
    assert_eq!(view.kpis.total_kg, 3200.0);
    assert_eq!(view.kpis.allocated_pct, 100.0);
    assert!(view.rows.iter().all(|r| r.allocated));
}

#[test]
fn test_empty_visible_set_yields_zero_kpis() {
    let rows = multi_port_dataset();
    let mut state = SessionState::new();
    state.set_criteria(FilterCriteria::new().with_port("Valparaiso"));

    let view = BoardEngine::new(zones()).compute(&rows, &state, fixed_now());
    assert!(view.is_empty());
    assert_eq!(view.kpis.total_kg, 0.0);
    assert_eq!(view.kpis.allocated_pct, 0.0);
    assert!(view.arrival_summary.groups.is_empty());
    assert_eq!(view.counts.containers, 0);
}

#[test]
fn test_summary_weights_match_future_rows() {
    let rows = multi_port_dataset();
    let now = fixed_now();
    let view = BoardEngine::new(zones()).compute(&rows, &SessionState::new(), now);

    let grouped: f64 = view.arrival_summary.groups.iter().map(|g| g.total_kg).sum();
    let future: f64 = view
        .rows
        .iter()
        .filter(|r| r.days_to_arrival.map_or(false, |d| d >= 1))
        .map(|r| r.row.line_weight_kg())
        .sum();
    assert_eq!(grouped, future);
    assert!(view.arrival_summary.groups.iter().all(|g| g.port != "Le Havre"));

    // 同一 (港口, 天数) 的两条明细合并为一组
    let first = &view.arrival_summary.groups[0];
    assert_eq!((first.port.as_str(), first.days), ("Rotterdam", 1));
    assert_eq!(first.lines, 2);
    assert_eq!(first.containers.len(), 2);
    assert_eq!(first.shipments.len(), 1);
}

#[test]
fn test_same_now_gives_identical_views() {
    let rows = multi_port_dataset();
    let now = fixed_now();
    let engine = BoardEngine::new(zones());
    let mut state = SessionState::new();
    state.toggle_sort(Column::Eta);
    state.toggle_sort(Column::Eta);

    let a = engine.compute(&rows, &state, now);
    let b = engine.compute(&rows, &state, now);
    assert_eq!(a, b);
}
