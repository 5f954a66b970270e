// ==========================================
// 到港货柜看板 - 区域（目的港分组）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 表示"不限区域"的保留键
pub const ALL_ZONES: &str = "All";

/// 区域表: 区域名 → 目的港集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneTable {
    zones: BTreeMap<String, BTreeSet<String>>,
}

impl ZoneTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone<I, S>(mut self, name: impl Into<String>, ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zones
            .insert(name.into(), ports.into_iter().map(Into::into).collect());
        self
    }

    /// 解析区域键
    ///
    /// None / 空白 / "All" / 未知键 → None（不约束）
    pub fn resolve(&self, key: Option<&str>) -> Option<&BTreeSet<String>> {
        let key = key.map(str::trim).filter(|k| !k.is_empty())?;
        if key.eq_ignore_ascii_case(ALL_ZONES) {
            return None;
        }
        self.zones.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.zones.contains_key(key)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
