// ==========================================
// 到港货柜看板 - 筛选条件
// ==========================================
// 红线: 各维度独立可选,空值 = 不约束,所有有效条件按 AND 组合
// ==========================================

use crate::domain::types::ArrivalBucket;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

// ==========================================
// FilterCriteria - 筛选条件
// ==========================================
// 精确匹配字段统一为集合: 单值 = 单元素集合,空集合 = 不约束
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// 目的港
    #[serde(alias = "port", deserialize_with = "one_or_many")]
    pub ports: BTreeSet<String>,

    /// 品种
    #[serde(alias = "variety", deserialize_with = "one_or_many")]
    pub varieties: BTreeSet<String>,

    /// 原始规格
    #[serde(alias = "caliber", deserialize_with = "one_or_many")]
    pub calibers: BTreeSet<String>,

    /// 原始包装规格
    #[serde(alias = "pack_format", alias = "packFormat", deserialize_with = "one_or_many")]
    pub pack_formats: BTreeSet<String>,

    /// 到港日期下界（含）,纯日期按 UTC 00:00:00.000
    #[serde(alias = "from")]
    pub arrival_from: Option<String>,

    /// 到港日期上界（含）,纯日期按 UTC 23:59:59.999
    #[serde(alias = "to")]
    pub arrival_to: Option<String>,

    /// 自由文本检索（去首尾空白,不区分大小写）
    pub search: String,

    /// 区域键; None / "All" / 未知键 = 不约束
    pub zone: Option<String>,

    /// 仅看近期到港
    #[serde(alias = "nextArrivalsOnly")]
    pub next_arrivals_only: bool,

    /// 相对到港窗口分桶,命中任一即通过
    pub buckets: BTreeSet<ArrivalBucket>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否完全不约束
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
            && self.varieties.is_empty()
            && self.calibers.is_empty()
            && self.pack_formats.is_empty()
            && blank(&self.arrival_from)
            && blank(&self.arrival_to)
            && self.search.trim().is_empty()
            && blank(&self.zone)
            && !self.next_arrivals_only
            && self.buckets.is_empty()
    }

    // ===== 构造辅助 =====

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.ports.insert(port.into());
        self
    }

    pub fn with_variety(mut self, variety: impl Into<String>) -> Self {
        self.varieties.insert(variety.into());
        self
    }

    pub fn with_caliber(mut self, caliber: impl Into<String>) -> Self {
        self.calibers.insert(caliber.into());
        self
    }

    pub fn with_pack_format(mut self, pack_format: impl Into<String>) -> Self {
        self.pack_formats.insert(pack_format.into());
        self
    }

    pub fn with_arrival_range(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.arrival_from = from.map(str::to_string);
        self.arrival_to = to.map(str::to_string);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn next_arrivals_only(mut self) -> Self {
        self.next_arrivals_only = true;
        self
    }

    pub fn with_bucket(mut self, bucket: ArrivalBucket) -> Self {
        self.buckets.insert(bucket);
        self
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// 兼容单值与多值两种写法: "Rotterdam" / ["Rotterdam", "Antwerp"]
fn one_or_many<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeSet<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(()),
    }

    let values = match OneOrMany::deserialize(d)? {
        OneOrMany::One(v) => vec![v],
        OneOrMany::Many(vs) => vs,
        OneOrMany::Null(()) => Vec::new(),
    };

    Ok(values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect())
}
