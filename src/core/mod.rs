//! 核心公共结构体+枚举
//! 仅存储数据，无匹配逻辑，支持序列化/反序列化
mod enums;
mod submission;
mod rule;

// 导出常用项
pub use enums::{AdLevel, Operator, TargetField};
pub use submission::SubmissionData;
pub use rule::{RuleSpec, RuleTable, SelectorNode};
