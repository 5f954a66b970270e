// ==========================================
// 到港货柜看板 - 配置层
// ==========================================
// 职责: 看板配置加载、校验、环境变量覆写
// 存储: JSON 文件
// ==========================================

pub mod board_config;
pub mod reference_clock;

// 重导出核心配置
pub use board_config::{
    config_keys, default_config_path, default_export_columns, BoardConfig, ConfigError,
    ConfigResult, DEFAULT_EXPORT_FILE_NAME, MAX_NEXT_ARRIVAL_DAYS,
};
pub use reference_clock::ReferenceClock;
