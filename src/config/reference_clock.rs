// ==========================================
// 到港货柜看板 - 参考时间
// ==========================================
// 两种口径: 固定时刻 / 当前系统时间
// 红线: 每次重算只解析一次,整次重算共用同一个 now
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReferenceClock {
    /// 固定时刻（演示数据、回放、测试）
    Fixed { at: DateTime<Utc> },
    /// 当前系统时间
    #[default]
    WallClock,
}

impl ReferenceClock {
    pub fn fixed(at: DateTime<Utc>) -> Self {
        ReferenceClock::Fixed { at }
    }

    /// 解析本次重算使用的 now
    pub fn resolve(&self) -> DateTime<Utc> {
        match self {
            ReferenceClock::Fixed { at } => *at,
            ReferenceClock::WallClock => Utc::now(),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, ReferenceClock::Fixed { .. })
    }
}
