// ==========================================
// 到港货柜看板 - 应用层
// ==========================================
// 职责: 会话级交互（预分配/备注/排序/筛选）与视图缓存
// ==========================================

pub mod session;

pub use session::BoardSession;
