// ==========================================
// 到港货柜看板 - 看板配置
// ==========================================
// 存储: JSON 文件
// 查找顺序: 显式路径 → 环境变量 SHIPMENT_BOARD_CONFIG → 用户配置目录 → 内置缺省
// 覆写: 环境变量 SHIPMENT_BOARD_NOW（固定参考时间,RFC 3339）
// ==========================================

use crate::config::reference_clock::ReferenceClock;
use crate::domain::shipment::PLACEHOLDER;
use crate::domain::types::Column;
use crate::domain::zone::ZoneTable;
use crate::engine::dates::parse_timestamp;
use crate::engine::filter::DEFAULT_NEXT_ARRIVAL_DAYS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const ZONES: &str = "zones";
    pub const NEXT_ARRIVAL_DAYS: &str = "next_arrival_days";
    pub const EXPORT_FILE_NAME: &str = "export_file_name";
    pub const PLACEHOLDER: &str = "placeholder";
    pub const REFERENCE_CLOCK: &str = "reference_clock";
    pub const EXPORT_COLUMNS: &str = "export_columns";

    /// 环境变量: 配置文件路径
    pub const ENV_CONFIG_PATH: &str = "SHIPMENT_BOARD_CONFIG";
    /// 环境变量: 固定参考时间
    pub const ENV_NOW: &str = "SHIPMENT_BOARD_NOW";
}

/// 缺省导出文件名
pub const DEFAULT_EXPORT_FILE_NAME: &str = "shipments_export.csv";

/// "近期到港"窗口上限（天）
pub const MAX_NEXT_ARRIVAL_DAYS: i64 = 3650;

/// 用户配置目录下的子目录名
const CONFIG_DIR_NAME: &str = "shipment-board";
const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// ConfigError - 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    FileNotFound(String),

    #[error("配置文件读取失败: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// BoardConfig - 看板配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// 区域 → 目的港
    pub zones: ZoneTable,

    /// "近期到港"窗口（天）
    pub next_arrival_days: i64,

    /// 导出文件名
    pub export_file_name: String,

    /// 缺失字段占位符
    pub placeholder: String,

    /// 参考时间口径
    pub reference_clock: ReferenceClock,

    /// 导出列（有序）
    pub export_columns: Vec<Column>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            zones: ZoneTable::new(),
            next_arrival_days: DEFAULT_NEXT_ARRIVAL_DAYS,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            placeholder: PLACEHOLDER.to_string(),
            reference_clock: ReferenceClock::WallClock,
            export_columns: default_export_columns(),
        }
    }
}

/// 缺省导出列
pub fn default_export_columns() -> Vec<Column> {
    vec![
        Column::BookingRef,
        Column::ShipmentId,
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
        Column::BoxCount,
        Column::BoxWeight,
        Column::LineWeight,
        Column::Allocated,
        Column::Note,
    ]
}

impl BoardConfig {
    /// 从 JSON 文件读取配置
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// 从 JSON 文本读取配置（缺失键取缺省值）
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let config: BoardConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 按查找顺序加载配置,并应用环境变量覆写
    ///
    /// # 参数
    /// - explicit: 显式指定的配置文件（存在时必须可读）
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match Self::locate(explicit) {
            Some(path) => {
                info!(path = %path.display(), "加载看板配置");
                Self::from_file(&path)?
            }
            None => {
                debug!("未找到配置文件,使用内置缺省配置");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(config_keys::ENV_CONFIG_PATH) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }

        default_config_path().filter(|p| p.exists())
    }

    /// 应用覆写（lookup 通常为环境变量读取）
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(config_keys::ENV_NOW) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                let at = parse_timestamp(trimmed).ok_or_else(|| ConfigError::InvalidValue {
                    key: config_keys::ENV_NOW.to_string(),
                    value: raw.clone(),
                    message: "期望 RFC 3339 时间".to_string(),
                })?;
                info!(now = %at, "参考时间固定为环境变量指定值");
                self.reference_clock = ReferenceClock::fixed(at);
            }
        }
        Ok(())
    }

    /// 校验配置值
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=MAX_NEXT_ARRIVAL_DAYS).contains(&self.next_arrival_days) {
            return Err(ConfigError::InvalidValue {
                key: config_keys::NEXT_ARRIVAL_DAYS.to_string(),
                value: self.next_arrival_days.to_string(),
                message: format!("必须在 1..={} 之间", MAX_NEXT_ARRIVAL_DAYS),
            });
        }
        if self.export_file_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: config_keys::EXPORT_FILE_NAME.to_string(),
                value: self.export_file_name.clone(),
                message: "不能为空".to_string(),
            });
        }
        if self.export_columns.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: config_keys::EXPORT_COLUMNS.to_string(),
                value: "[]".to_string(),
                message: "至少需要一列".to_string(),
            });
        }
        Ok(())
    }
}

/// 用户配置目录下的缺省配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
