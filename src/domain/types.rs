// ==========================================
// 到港货柜看板 - 领域类型定义
// ==========================================
// 职责: 状态枚举、列定义、排序方向、到港窗口分桶、分配筛选
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 货运状态 (Shipment Status)
// ==========================================
// 注意: 排序时按显示文本做字典序比较
// ("Arrived" < "At sea" < "Scheduled"),不是按紧急程度排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    #[serde(rename = "Arrived")]
    Arrived, // 已到港
    #[serde(rename = "At sea")]
    AtSea, // 海上运输中
    #[serde(rename = "Scheduled")]
    Scheduled, // 待发运
}

impl ShipmentStatus {
    /// 显示文本（同时作为排序键）
    pub fn label(&self) -> &'static str {
        match self {
            ShipmentStatus::Arrived => "Arrived",
            ShipmentStatus::AtSea => "At sea",
            ShipmentStatus::Scheduled => "Scheduled",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// 排序方向 (Sort Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// 方向翻转
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("未知排序方向: {}", other)),
        }
    }
}

// ==========================================
// 列比较语义 (Column Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,          // 大小写折叠后的字符串比较
    Numeric,       // 数值,缺失按 0
    Date,          // 时间戳毫秒,无法解析的日期恒排最后
    DaysToArrival, // round((eta - now) / 1 天)
    Status,        // 状态文本字典序
    Allocation,    // bool → 0/1
}

// ==========================================
// 看板列 (Column)
// ==========================================
// 排序与导出共用同一套列定义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    BookingRef,
    ShipmentId,
    ContainerId,
    ContainerCode,
    Carrier,
    Pol,
    Pod,
    Vessel,
    Voyage,
    Etd,
    Eta,
    DaysToArrival,
    Status,
    Product,
    Variety,
    Caliber,
    PackFormat,
    Brand,
    CaliberCode,
    PackFormatCode,
    PalletId,
    PackingListId,
    BoxCount,
    BoxWeight,
    LineWeight,
    Allocated,
    Note,
}

impl Column {
    pub const ALL: [Column; 27] = [
        Column::BookingRef,
        Column::ShipmentId,
        Column::ContainerId,
        Column::ContainerCode,
        Column::Carrier,
        Column::Pol,
        Column::Pod,
        Column::Vessel,
        Column::Voyage,
        Column::Etd,
        Column::Eta,
        Column::DaysToArrival,
        Column::Status,
        Column::Product,
        Column::Variety,
        Column::Caliber,
        Column::PackFormat,
        Column::Brand,
        Column::CaliberCode,
        Column::PackFormatCode,
        Column::PalletId,
        Column::PackingListId,
        Column::BoxCount,
        Column::BoxWeight,
        Column::LineWeight,
        Column::Allocated,
        Column::Note,
    ];

    /// 列的比较语义
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::BoxCount | Column::BoxWeight | Column::LineWeight => ColumnKind::Numeric,
            Column::Etd | Column::Eta => ColumnKind::Date,
            Column::DaysToArrival => ColumnKind::DaysToArrival,
            Column::Status => ColumnKind::Status,
            Column::Allocated => ColumnKind::Allocation,
            _ => ColumnKind::Text,
        }
    }

    /// 序列化名（snake_case,与 serde 一致）
    pub fn key(&self) -> &'static str {
        match self {
            Column::BookingRef => "booking_ref",
            Column::ShipmentId => "shipment_id",
            Column::ContainerId => "container_id",
            Column::ContainerCode => "container_code",
            Column::Carrier => "carrier",
            Column::Pol => "pol",
            Column::Pod => "pod",
            Column::Vessel => "vessel",
            Column::Voyage => "voyage",
            Column::Etd => "etd",
            Column::Eta => "eta",
            Column::DaysToArrival => "days_to_arrival",
            Column::Status => "status",
            Column::Product => "product",
            Column::Variety => "variety",
            Column::Caliber => "caliber",
            Column::PackFormat => "pack_format",
            Column::Brand => "brand",
            Column::CaliberCode => "caliber_code",
            Column::PackFormatCode => "pack_format_code",
            Column::PalletId => "pallet_id",
            Column::PackingListId => "packing_list_id",
            Column::BoxCount => "box_count",
            Column::BoxWeight => "box_weight",
            Column::LineWeight => "line_weight",
            Column::Allocated => "allocated",
            Column::Note => "note",
        }
    }

    /// 导出表头
    pub fn header(&self) -> &'static str {
        match self {
            Column::BookingRef => "Booking",
            Column::ShipmentId => "Shipment",
            Column::ContainerId => "Container ID",
            Column::ContainerCode => "Container",
            Column::Carrier => "Carrier",
            Column::Pol => "POL",
            Column::Pod => "POD",
            Column::Vessel => "Vessel",
            Column::Voyage => "Voyage",
            Column::Etd => "ETD",
            Column::Eta => "ETA",
            Column::DaysToArrival => "Days to arrival",
            Column::Status => "Status",
            Column::Product => "Product",
            Column::Variety => "Variety",
            Column::Caliber => "Caliber",
            Column::PackFormat => "Pack format",
            Column::Brand => "Brand",
            Column::CaliberCode => "Caliber code",
            Column::PackFormatCode => "Pack format code",
            Column::PalletId => "Pallet",
            Column::PackingListId => "Packing list",
            Column::BoxCount => "Boxes",
            Column::BoxWeight => "Box kg",
            Column::LineWeight => "Line kg",
            Column::Allocated => "Pre-allocated",
            Column::Note => "Notes",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| format!("未知列: {}", s))
    }
}

// ==========================================
// 到港窗口分桶 (Arrival Bucket)
// ==========================================
// 天数口径: round((eta - now) / 1 天)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArrivalBucket {
    #[serde(rename = ">=7")]
    AtLeast7,
    #[serde(rename = "<=7")]
    Within7,
    #[serde(rename = "<=2")]
    Within2,
    #[serde(rename = "<=1")]
    Within1,
}

impl ArrivalBucket {
    pub fn contains(&self, days: i64) -> bool {
        match self {
            ArrivalBucket::AtLeast7 => days >= 7,
            ArrivalBucket::Within7 => days <= 7,
            ArrivalBucket::Within2 => days <= 2,
            ArrivalBucket::Within1 => days <= 1,
        }
    }
}

// ==========================================
// 预分配筛选 (Allocation Filter)
// ==========================================
// 三态: 全部 / 仅已分配 / 仅未分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationFilter {
    #[default]
    Any,
    Allocated,
    Unallocated,
}

impl AllocationFilter {
    pub fn matches(&self, allocated: bool) -> bool {
        match self {
            AllocationFilter::Any => true,
            AllocationFilter::Allocated => allocated,
            AllocationFilter::Unallocated => !allocated,
        }
    }
}
