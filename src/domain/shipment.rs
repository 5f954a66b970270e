// ==========================================
// 到港货柜看板 - 货运明细领域模型
// ==========================================
// 用途: 导入层写入,引擎层只读
// 红线: 原始记录加载后不可修改
// ==========================================

use crate::domain::types::Column;
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 缺失字段的显示占位符
pub const PLACEHOLDER: &str = "—";

// ==========================================
// RawShipmentRecord - 原始货运明细
// ==========================================
// 一行 = 一个柜内某产品/品种/规格的一条明细
// 字段名兼容 snake_case 与 camelCase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawShipmentRecord {
    // ===== 标识 =====
    #[serde(alias = "bookingRef", alias = "booking", deserialize_with = "lenient_string")]
    pub booking_ref: Option<String>,
    #[serde(alias = "shipmentId", deserialize_with = "lenient_string")]
    pub shipment_id: Option<String>,
    #[serde(alias = "containerId", deserialize_with = "lenient_string")]
    pub container_id: Option<String>,
    #[serde(alias = "containerCode", alias = "container", deserialize_with = "lenient_string")]
    pub container_code: Option<String>,
    #[serde(alias = "lineId", deserialize_with = "lenient_string")]
    pub line_id: Option<String>,

    // ===== 航线 =====
    #[serde(deserialize_with = "lenient_string")]
    pub carrier: Option<String>,
    #[serde(alias = "portOfLoading", deserialize_with = "lenient_string")]
    pub pol: Option<String>,
    #[serde(alias = "portOfDestination", alias = "port", deserialize_with = "lenient_string")]
    pub pod: Option<String>,
    #[serde(alias = "vesselName", deserialize_with = "lenient_string")]
    pub vessel: Option<String>,
    #[serde(alias = "voyageNumber", deserialize_with = "lenient_string")]
    pub voyage: Option<String>,

    // ===== 时间（ISO-8601 原文）=====
    #[serde(deserialize_with = "lenient_string")]
    pub etd: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub eta: Option<String>,

    // ===== 产品 =====
    #[serde(deserialize_with = "lenient_string")]
    pub product: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub variety: Option<String>,
    #[serde(alias = "caliberRaw", deserialize_with = "lenient_string")]
    pub caliber: Option<String>,
    #[serde(alias = "packFormat", alias = "pack_format_raw", deserialize_with = "lenient_string")]
    pub pack_format: Option<String>,

    // ===== 数量（非负,缺失按 0 参与计算）=====
    #[serde(alias = "boxCount", alias = "boxes", deserialize_with = "lenient_f64")]
    pub box_count: Option<f64>,
    #[serde(alias = "boxWeightKg", alias = "box_weight", deserialize_with = "lenient_f64")]
    pub box_weight_kg: Option<f64>,
    #[serde(alias = "lineWeightKg", alias = "line_weight", deserialize_with = "lenient_f64")]
    pub line_weight_kg: Option<f64>,

    // ===== 可选补充字段 =====
    #[serde(deserialize_with = "lenient_string")]
    pub brand: Option<String>,
    #[serde(alias = "caliberCode", deserialize_with = "lenient_string")]
    pub caliber_code: Option<String>,
    #[serde(alias = "packFormatCode", deserialize_with = "lenient_string")]
    pub pack_format_code: Option<String>,
    #[serde(alias = "palletId", deserialize_with = "lenient_string")]
    pub pallet_id: Option<String>,
    #[serde(alias = "packingListId", deserialize_with = "lenient_string")]
    pub packing_list_id: Option<String>,
}

// ==========================================
// ShipmentRow - 派生明细行
// ==========================================
// 每条原始记录对应一行,顺序与数据集一致
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentRow {
    pub record: RawShipmentRecord,
    pub index: usize,                     // 数据集中的位置
    pub key: String,                      // 稳定键（会话状态的关联键）
    pub etd_date: Option<DateTime<Utc>>,  // None = 无法解析
    pub eta_date: Option<DateTime<Utc>>,  // None = 无法解析
}

impl ShipmentRow {
    /// 柜号口径: container_id 缺失时回退 container_code
    pub fn container_ref(&self) -> Option<&str> {
        self.record
            .container_id
            .as_deref()
            .or(self.record.container_code.as_deref())
    }

    pub fn box_count(&self) -> f64 {
        self.record.box_count.unwrap_or(0.0)
    }

    pub fn box_weight_kg(&self) -> f64 {
        self.record.box_weight_kg.unwrap_or(0.0)
    }

    pub fn line_weight_kg(&self) -> f64 {
        self.record.line_weight_kg.unwrap_or(0.0)
    }

    /// 取文本列的原始值
    ///
    /// 非文本列（数值/日期/派生列/会话列）返回 None
    pub fn text(&self, column: Column) -> Option<&str> {
        let r = &self.record;
        let value = match column {
            Column::BookingRef => &r.booking_ref,
            Column::ShipmentId => &r.shipment_id,
            Column::ContainerId => &r.container_id,
            Column::ContainerCode => &r.container_code,
            Column::Carrier => &r.carrier,
            Column::Pol => &r.pol,
            Column::Pod => &r.pod,
            Column::Vessel => &r.vessel,
            Column::Voyage => &r.voyage,
            Column::Etd => &r.etd,
            Column::Eta => &r.eta,
            Column::Product => &r.product,
            Column::Variety => &r.variety,
            Column::Caliber => &r.caliber,
            Column::PackFormat => &r.pack_format,
            Column::Brand => &r.brand,
            Column::CaliberCode => &r.caliber_code,
            Column::PackFormatCode => &r.pack_format_code,
            Column::PalletId => &r.pallet_id,
            Column::PackingListId => &r.packing_list_id,
            _ => return None,
        };
        value.as_deref()
    }

    /// 渲染用文本,缺失时返回占位符
    pub fn display_text(&self, column: Column) -> &str {
        self.text(column).unwrap_or(PLACEHOLDER)
    }
}

// ==========================================
// 宽松反序列化
// ==========================================
// 数据文件来源不一: 数字可能写成字符串,标识可能写成数字
// 无法识别的值一律视为缺失,不中断加载

struct LenientF64;

impl<'de> Visitor<'de> for LenientF64 {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(if v.is_finite() { Some(v) } else { None })
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.trim().parse::<f64>().ok().filter(|n| n.is_finite()))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(LenientF64)
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    d.deserialize_any(LenientF64)
}

struct LenientString;

impl<'de> Visitor<'de> for LenientString {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, a number or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        Ok(if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        })
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(LenientString)
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    d.deserialize_any(LenientString)
}
