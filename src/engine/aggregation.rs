// ==========================================
// 到港货柜看板 - 汇总与 KPI 引擎
// ==========================================
// 职责: 基于可见行（已筛选,未排序）计算重量 KPI、到港汇总、可见计数
// 红线: 无状态引擎,所有方法都是纯函数;缺失数值按 0
// ==========================================

use crate::domain::session::{is_allocated, AllocationMap};
use crate::domain::shipment::{ShipmentRow, PLACEHOLDER};
use crate::domain::view::{ArrivalGroup, ArrivalSummary, ArrivalTotals, KpiTotals, VisibleCounts};
use crate::engine::dates::{days_until, in_next_window};
use crate::engine::filter::DEFAULT_NEXT_ARRIVAL_DAYS;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

// ==========================================
// AggregationEngine - 汇总引擎
// ==========================================
pub struct AggregationEngine {
    next_arrival_days: i64,
}

impl AggregationEngine {
    pub fn new() -> Self {
        Self {
            next_arrival_days: DEFAULT_NEXT_ARRIVAL_DAYS,
        }
    }

    pub fn with_next_arrival_days(mut self, days: i64) -> Self {
        self.next_arrival_days = days;
        self
    }

    // ==========================================
    // 重量 KPI
    // ==========================================

    /// 计算重量 KPI
    ///
    /// - total_kg: 全部可见行
    /// - allocated_kg: 已预分配
    /// - unallocated_kg_7d: 未预分配 且 now < eta <= now + N 天
    /// - 百分比以 total_kg 为分母,total_kg 为 0 时取 0
    #[instrument(skip_all, fields(count = rows.len()))]
    pub fn kpis(
        &self,
        rows: &[&ShipmentRow],
        allocations: &AllocationMap,
        now: DateTime<Utc>,
    ) -> KpiTotals {
        let mut kpis = KpiTotals::default();

        for row in rows {
            let kg = row.line_weight_kg();
            kpis.total_kg += kg;

            if is_allocated(allocations, &row.key) {
                kpis.allocated_kg += kg;
            } else {
                kpis.unallocated_kg += kg;
                let arriving = row
                    .eta_date
                    .map_or(false, |eta| in_next_window(eta, now, self.next_arrival_days));
                if arriving {
                    kpis.unallocated_kg_7d += kg;
                }
            }
        }

        kpis.allocated_pct = percent(kpis.allocated_kg, kpis.total_kg);
        kpis.unallocated_7d_pct = percent(kpis.unallocated_kg_7d, kpis.total_kg);
        kpis
    }

    // ==========================================
    // 到港汇总
    // ==========================================

    /// 按 (目的港, 距到港天数) 分组
    ///
    /// 仅统计 round((eta - now) / 1 天) >= 1 的行;
    /// 分组按天数升序,同天按港口名升序
    #[instrument(skip_all, fields(count = rows.len()))]
    pub fn arrival_summary(&self, rows: &[&ShipmentRow], now: DateTime<Utc>) -> ArrivalSummary {
        let mut groups: BTreeMap<(i64, String), ArrivalGroup> = BTreeMap::new();

        for row in rows {
            let days = match row.eta_date {
                Some(eta) => days_until(eta, now),
                None => continue,
            };
            if days < 1 {
                continue;
            }

            let port = row.record.pod.clone().unwrap_or_else(|| PLACEHOLDER.to_string());
            let group = groups
                .entry((days, port.clone()))
                .or_insert_with(|| ArrivalGroup {
                    port,
                    days,
                    ..Default::default()
                });

            group.total_kg += row.line_weight_kg();
            group.lines += 1;
            if let Some(container) = row.container_ref() {
                group.containers.insert(container.to_string());
            }
            if let Some(shipment) = row.record.shipment_id.as_deref() {
                group.shipments.insert(shipment.to_string());
            }
        }

        let groups: Vec<ArrivalGroup> = groups.into_values().collect();

        let mut totals = ArrivalTotals::default();
        for group in &groups {
            totals.total_kg += group.total_kg;
            totals.lines += group.lines;
            totals.containers.extend(group.containers.iter().cloned());
            totals.shipments.extend(group.shipments.iter().cloned());
        }

        debug!(groups = groups.len(), lines = totals.lines, "到港汇总完成");
        ArrivalSummary { groups, totals }
    }

    // ==========================================
    // 可见计数
    // ==========================================

    pub fn visible_counts(&self, rows: &[&ShipmentRow]) -> VisibleCounts {
        let containers: HashSet<&str> = rows.iter().filter_map(|r| r.container_ref()).collect();
        let shipments: HashSet<&str> = rows
            .iter()
            .filter_map(|r| r.record.shipment_id.as_deref())
            .collect();

        VisibleCounts {
            rows: rows.len(),
            containers: containers.len(),
            shipments: shipments.len(),
        }
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn percent(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part * 100.0 / total
    }
}
