// ==========================================
// 到港货柜看板 - 会话
// ==========================================
// 职责: 持有数据集与会话状态,对外提供交互操作与看板视图
// 缓存: 视图按 (会话版本, now) 记忆;任何状态变更都会使缓存失效
// 红线: 缓存只是优化,结果与 BoardEngine::compute 直接计算一致
// ==========================================

use crate::config::BoardConfig;
use crate::domain::criteria::FilterCriteria;
use crate::domain::session::{SessionState, SortSpec};
use crate::domain::shipment::ShipmentRow;
use crate::domain::types::{AllocationFilter, Column};
use crate::domain::view::BoardView;
use crate::engine::board::BoardEngine;
use crate::engine::filter::facet_values;
use crate::exporter::csv_exporter::CsvExporter;
use crate::exporter::error::ExportResult;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ==========================================
// ViewCache - 视图缓存
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewKey {
    revision: u64,
    now: DateTime<Utc>,
}

#[derive(Default)]
struct ViewCache {
    entry: Option<(ViewKey, BoardView)>,
    computations: u64,
}

impl ViewCache {
    fn get_or_compute<F>(&mut self, key: ViewKey, compute: F) -> &BoardView
    where
        F: FnOnce() -> BoardView,
    {
        let entry = match self.entry.take() {
            Some((cached_key, view)) if cached_key == key => (cached_key, view),
            _ => {
                self.computations += 1;
                debug!(revision = key.revision, now = %key.now, "视图缓存失效,重新计算");
                (key, compute())
            }
        };
        &self.entry.insert(entry).1
    }
}

// ==========================================
// BoardSession - 看板会话
// ==========================================
pub struct BoardSession {
    rows: Vec<ShipmentRow>,
    state: SessionState,
    engine: BoardEngine,
    exporter: CsvExporter,
    config: BoardConfig,
    cache: ViewCache,
}

impl BoardSession {
    /// 创建会话
    ///
    /// # 参数
    /// - rows: 已规范化的数据集（只加载一次）
    /// - config: 看板配置
    pub fn new(rows: Vec<ShipmentRow>, config: BoardConfig) -> Self {
        info!(rows = rows.len(), zones = config.zones.len(), "看板会话已创建");
        Self {
            engine: BoardEngine::from_config(&config),
            exporter: CsvExporter::from_config(&config),
            rows,
            state: SessionState::new(),
            config,
            cache: ViewCache::default(),
        }
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn rows(&self) -> &[ShipmentRow] {
        &self.rows
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// 按配置的参考时间口径取 now
    pub fn reference_now(&self) -> DateTime<Utc> {
        self.config.reference_clock.resolve()
    }

    /// 实际重算次数（缓存命中不计）
    pub fn computations(&self) -> u64 {
        self.cache.computations
    }

    /// 某列在完整数据集上的可选值（筛选下拉框）
    pub fn facets(&self, column: Column) -> Vec<String> {
        facet_values(&self.rows, column)
    }

    // ==========================================
    // 会话操作
    // ==========================================

    /// 切换预分配,返回新状态
    pub fn toggle_allocation(&mut self, key: &str) -> bool {
        let allocated = self.state.toggle_allocation(key);
        debug!(key, allocated, "切换预分配");
        allocated
    }

    pub fn set_allocation(&mut self, key: &str, allocated: bool) {
        self.state.set_allocation(key, allocated);
    }

    pub fn set_note(&mut self, key: &str, note: impl Into<String>) {
        self.state.set_note(key, note);
    }

    /// 点击列头: 同列翻转方向,换列从升序开始
    pub fn toggle_sort(&mut self, column: Column) -> SortSpec {
        let spec = self.state.toggle_sort(column);
        debug!(column = %spec.column, direction = ?spec.direction, "排序切换");
        spec
    }

    pub fn clear_sort(&mut self) {
        self.state.clear_sort();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.state.set_criteria(criteria);
    }

    pub fn set_allocation_filter(&mut self, filter: AllocationFilter) {
        self.state.set_allocation_filter(filter);
    }

    // ==========================================
    // 视图与导出
    // ==========================================

    /// 当前看板视图
    pub fn view(&mut self, now: DateTime<Utc>) -> &BoardView {
        let key = self.view_key(now);
        self.cache
            .get_or_compute(key, || self.engine.compute(&self.rows, &self.state, now))
    }

    /// 当前可见行导出为 CSV 文本;无可见行时返回 None
    pub fn export_csv(&mut self, now: DateTime<Utc>) -> ExportResult<Option<String>> {
        let key = self.view_key(now);
        let view = self
            .cache
            .get_or_compute(key, || self.engine.compute(&self.rows, &self.state, now));
        self.exporter.export(&view.rows)
    }

    /// 当前可见行导出到目录（文件名取自配置）
    pub fn export_to_dir(&mut self, now: DateTime<Utc>, dir: &Path) -> ExportResult<Option<PathBuf>> {
        let key = self.view_key(now);
        let view = self
            .cache
            .get_or_compute(key, || self.engine.compute(&self.rows, &self.state, now));
        self.exporter.export_to_dir(&view.rows, dir)
    }

    /// 当前可见行导出到指定路径
    pub fn export_to_path(&mut self, now: DateTime<Utc>, path: &Path) -> ExportResult<Option<PathBuf>> {
        let key = self.view_key(now);
        let view = self
            .cache
            .get_or_compute(key, || self.engine.compute(&self.rows, &self.state, now));
        self.exporter.export_to_path(&view.rows, path)
    }

    fn view_key(&self, now: DateTime<Utc>) -> ViewKey {
        ViewKey {
            revision: self.state.revision(),
            now,
        }
    }
}
