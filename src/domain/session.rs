// ==========================================
// 到港货柜看板 - 会话状态
// ==========================================
// 红线: 仅由用户交互修改,引擎只读;不落盘
// 关联键: ShipmentRow.key（稳定键）
// ==========================================

use crate::domain::criteria::FilterCriteria;
use crate::domain::types::{AllocationFilter, Column, SortDirection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 预分配标记: 稳定键 → 是否已分配（缺省 false）
pub type AllocationMap = HashMap<String, bool>;

/// 备注: 稳定键 → 备注文本（缺省空）
pub type NoteMap = HashMap<String, String>;

/// 查询预分配标记
pub fn is_allocated(allocations: &AllocationMap, key: &str) -> bool {
    allocations.get(key).copied().unwrap_or(false)
}

/// 查询备注
pub fn note_of<'a>(notes: &'a NoteMap, key: &str) -> &'a str {
    notes.get(key).map(String::as_str).unwrap_or("")
}

// ==========================================
// SortSpec - 排序设置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }

    /// 点击列头后的排序设置
    ///
    /// - 当前已按该列排序 → 翻转方向
    /// - 切换到新列 → 重置为升序
    pub fn toggle(current: Option<SortSpec>, column: Column) -> SortSpec {
        match current {
            Some(spec) if spec.column == column => SortSpec {
                column,
                direction: spec.direction.flipped(),
            },
            _ => SortSpec::asc(column),
        }
    }
}

// ==========================================
// SessionState - 会话状态
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub allocations: AllocationMap,
    pub notes: NoteMap,
    pub sort: Option<SortSpec>,
    pub criteria: FilterCriteria,
    pub allocation_filter: AllocationFilter,
    revision: u64, // 每次修改递增,用于缓存失效
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// 翻转预分配标记,返回新值
    pub fn toggle_allocation(&mut self, key: &str) -> bool {
        let next = !is_allocated(&self.allocations, key);
        self.set_allocation(key, next);
        next
    }

    pub fn set_allocation(&mut self, key: &str, allocated: bool) {
        if allocated {
            self.allocations.insert(key.to_string(), true);
        } else {
            self.allocations.remove(key);
        }
        self.touch();
    }

    /// 设置备注;空白文本视为清除
    pub fn set_note(&mut self, key: &str, note: impl Into<String>) {
        let note = note.into();
        if note.trim().is_empty() {
            self.notes.remove(key);
        } else {
            self.notes.insert(key.to_string(), note);
        }
        self.touch();
    }

    /// 点击列头,返回新的排序设置
    pub fn toggle_sort(&mut self, column: Column) -> SortSpec {
        let next = SortSpec::toggle(self.sort, column);
        self.sort = Some(next);
        self.touch();
        next
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.touch();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.touch();
    }

    pub fn set_allocation_filter(&mut self, filter: AllocationFilter) {
        self.allocation_filter = filter;
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_sort_same_column_flips() {
        let first = SortSpec::toggle(None, Column::Eta);
        assert_eq!(first, SortSpec::asc(Column::Eta));

        let second = SortSpec::toggle(Some(first), Column::Eta);
        assert_eq!(second, SortSpec::desc(Column::Eta));

        let third = SortSpec::toggle(Some(second), Column::Eta);
        assert_eq!(third, SortSpec::asc(Column::Eta));
    }

    #[test]
    fn test_toggle_sort_new_column_resets_to_asc() {
        let current = SortSpec::desc(Column::Eta);
        assert_eq!(
            SortSpec::toggle(Some(current), Column::Vessel),
            SortSpec::asc(Column::Vessel)
        );
    }

    #[test]
    fn test_allocation_and_notes_defaults() {
        let mut state = SessionState::new();
        assert!(!is_allocated(&state.allocations, "k1"));
        assert_eq!(note_of(&state.notes, "k1"), "");

        assert!(state.toggle_allocation("k1"));
        assert!(is_allocated(&state.allocations, "k1"));
        assert!(!state.toggle_allocation("k1"));
        assert!(!is_allocated(&state.allocations, "k1"));

        state.set_note("k1", "hold for buyer A");
        assert_eq!(note_of(&state.notes, "k1"), "hold for buyer A");
        state.set_note("k1", "  ");
        assert_eq!(note_of(&state.notes, "k1"), "");
    }

    #[test]
    fn test_revision_increments_on_mutation() {
        let mut state = SessionState::new();
        let start = state.revision();
        state.toggle_sort(Column::Status);
        state.set_allocation_filter(AllocationFilter::Allocated);
        assert_eq!(state.revision(), start + 2);
    }
}
