// ==========================================
// 到港货柜看板 - 筛选引擎
// ==========================================
// 职责: 按组合条件筛选可见行
// 输入: 明细行 + FilterCriteria + now
// 输出: 保持原相对顺序的子序列
// 红线: 单一可组合谓词,单次遍历;空条件 = 恒等
// ==========================================

use crate::domain::criteria::FilterCriteria;
use crate::domain::session::{is_allocated, AllocationMap};
use crate::domain::shipment::ShipmentRow;
use crate::domain::types::{AllocationFilter, Column};
use crate::domain::zone::ZoneTable;
use crate::engine::dates::{days_until, in_next_window, lower_bound, upper_bound};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, instrument, warn};

/// "近期到港"窗口缺省天数
pub const DEFAULT_NEXT_ARRIVAL_DAYS: i64 = 7;

/// 自由文本检索覆盖的字段（按顺序）
pub const SEARCH_COLUMNS: [Column; 5] = [
    Column::BookingRef,
    Column::ShipmentId,
    Column::ContainerCode,
    Column::Vessel,
    Column::Voyage,
];

type RowPredicate<'c> = Box<dyn Fn(&ShipmentRow) -> bool + 'c>;

// ==========================================
// CompiledFilter - 编译后的组合谓词
// ==========================================
// 每个有效条件编译为一个检查项,行需通过全部检查项
pub struct CompiledFilter<'c> {
    checks: Vec<(&'static str, RowPredicate<'c>)>,
}

impl<'c> CompiledFilter<'c> {
    fn push(&mut self, name: &'static str, check: impl Fn(&ShipmentRow) -> bool + 'c) {
        self.checks.push((name, Box::new(check)));
    }

    pub fn matches(&self, row: &ShipmentRow) -> bool {
        self.checks.iter().all(|(_, check)| check(row))
    }

    /// 生效的检查项名称
    pub fn active_checks(&self) -> Vec<&'static str> {
        self.checks.iter().map(|(name, _)| *name).collect()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.checks.is_empty()
    }
}

// ==========================================
// FilterEngine - 筛选引擎
// ==========================================
pub struct FilterEngine {
    zones: ZoneTable,
    next_arrival_days: i64,
}

impl FilterEngine {
    pub fn new(zones: ZoneTable) -> Self {
        Self {
            zones,
            next_arrival_days: DEFAULT_NEXT_ARRIVAL_DAYS,
        }
    }

    pub fn with_next_arrival_days(mut self, days: i64) -> Self {
        self.next_arrival_days = days;
        self
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 筛选
    ///
    /// 可传入原始数据集,也可传入上一次的筛选结果（幂等）
    #[instrument(skip_all)]
    pub fn filter<'a, I>(
        &self,
        rows: I,
        criteria: &FilterCriteria,
        now: DateTime<Utc>,
    ) -> Vec<&'a ShipmentRow>
    where
        I: IntoIterator<Item = &'a ShipmentRow>,
    {
        let compiled = self.compile(criteria, now);
        if compiled.is_unconstrained() {
            return rows.into_iter().collect();
        }

        let visible: Vec<&'a ShipmentRow> =
            rows.into_iter().filter(|row| compiled.matches(row)).collect();

        debug!(
            visible = visible.len(),
            checks = ?compiled.active_checks(),
            "筛选完成"
        );
        visible
    }

    /// 判断单行是否通过筛选
    pub fn matches(&self, row: &ShipmentRow, criteria: &FilterCriteria, now: DateTime<Utc>) -> bool {
        self.compile(criteria, now).matches(row)
    }

    /// 将条件编译为组合谓词
    ///
    /// 检查顺序:
    /// 1) 区域 / 目的港
    /// 2) 品种 / 规格 / 包装精确匹配
    /// 3) 到港日期区间
    /// 4) 仅看近期到港: now < eta <= now + N 天
    /// 5) 自由文本检索
    /// 6) 相对到港窗口分桶
    pub fn compile<'c>(&'c self, criteria: &'c FilterCriteria, now: DateTime<Utc>) -> CompiledFilter<'c> {
        let mut compiled = CompiledFilter { checks: Vec::new() };

        // 1) 区域: 未知区域键回退为不约束
        if let Some(zone_key) = criteria.zone.as_deref() {
            match self.zones.resolve(Some(zone_key)) {
                Some(ports) => compiled.push("zone", move |row| member(ports, row.record.pod.as_deref())),
                None => {
                    let key = zone_key.trim();
                    if !key.is_empty() && !key.eq_ignore_ascii_case(crate::domain::zone::ALL_ZONES) {
                        warn!(zone = key, "未知区域,按不约束处理");
                    }
                }
            }
        }
        if !criteria.ports.is_empty() {
            let ports = &criteria.ports;
            compiled.push("port", move |row| member(ports, row.record.pod.as_deref()));
        }

        // 2) 精确匹配
        if !criteria.varieties.is_empty() {
            let set = &criteria.varieties;
            compiled.push("variety", move |row| member(set, row.record.variety.as_deref()));
        }
        if !criteria.calibers.is_empty() {
            let set = &criteria.calibers;
            compiled.push("caliber", move |row| member(set, row.record.caliber.as_deref()));
        }
        if !criteria.pack_formats.is_empty() {
            let set = &criteria.pack_formats;
            compiled.push("pack_format", move |row| member(set, row.record.pack_format.as_deref()));
        }

        // 3) 日期区间: 无法解析的边界按不约束处理
        if let Some(from) = parse_bound(criteria.arrival_from.as_deref(), lower_bound, "arrival_from") {
            compiled.push("arrival_from", move |row| row.eta_date.map_or(false, |eta| eta >= from));
        }
        if let Some(to) = parse_bound(criteria.arrival_to.as_deref(), upper_bound, "arrival_to") {
            compiled.push("arrival_to", move |row| row.eta_date.map_or(false, |eta| eta <= to));
        }

        // 4) 近期到港
        if criteria.next_arrivals_only {
            let days = self.next_arrival_days;
            compiled.push("next_arrivals", move |row| {
                row.eta_date.map_or(false, |eta| in_next_window(eta, now, days))
            });
        }

        // 5) 自由文本
        let term = criteria.search.trim().to_lowercase();
        if !term.is_empty() {
            compiled.push("search", move |row| {
                SEARCH_COLUMNS.iter().any(|column| {
                    row.text(*column)
                        .map_or(false, |value| value.to_lowercase().contains(&term))
                })
            });
        }

        // 6) 分桶
        if !criteria.buckets.is_empty() {
            let buckets = &criteria.buckets;
            compiled.push("buckets", move |row| {
                row.eta_date.map_or(false, |eta| {
                    let days = days_until(eta, now);
                    buckets.iter().any(|bucket| bucket.contains(days))
                })
            });
        }

        compiled
    }
}

fn member(set: &BTreeSet<String>, value: Option<&str>) -> bool {
    value.map_or(false, |v| set.contains(v))
}

fn parse_bound(
    raw: Option<&str>,
    parse: fn(&str) -> Option<DateTime<Utc>>,
    field: &'static str,
) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = parse(raw);
    if parsed.is_none() {
        warn!(field, value = raw, "日期边界无法解析,按不约束处理");
    }
    parsed
}

// ==========================================
// 会话级筛选（依赖会话状态,由调用方执行）
// ==========================================

/// 按预分配三态筛选
pub fn apply_allocation_filter<'a>(
    rows: Vec<&'a ShipmentRow>,
    filter: AllocationFilter,
    allocations: &AllocationMap,
) -> Vec<&'a ShipmentRow> {
    if filter == AllocationFilter::Any {
        return rows;
    }
    rows.into_iter()
        .filter(|row| filter.matches(is_allocated(allocations, &row.key)))
        .collect()
}

// ==========================================
// 下拉选项
// ==========================================

/// 某列去重后的非空取值（升序）,用于填充筛选下拉框
pub fn facet_values<'a, I>(rows: I, column: Column) -> Vec<String>
where
    I: IntoIterator<Item = &'a ShipmentRow>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut values: Vec<String> = rows
        .into_iter()
        .filter_map(|row| row.text(column))
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect();
    values.sort();
    values
}
