//! 规则模块：负责规则表的内置数据与加载
pub mod builtin;
pub mod loader;

// 导出核心接口
pub use self::builtin::{EMBEDDED_RULES_JSON, embedded_rule_table};
pub use self::loader::RuleLoader;
