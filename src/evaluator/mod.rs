//! 评估模块：评分、分级、诊断轨迹与画廊处理结果
pub mod evaluator;
pub mod trace;
pub mod report;
pub mod global;

// 导出核心接口
pub use self::evaluator::{AdEvaluator, EvaluationResult};
pub use self::trace::{EvaluationTrace, RuleTrace, SelectorTrace};
pub use self::report::{BatchSummary, GalleryDecision, Highlight, SelectionAction};
pub use self::global::{
    classify, explain, init_global_evaluator, init_global_evaluator_with_config,
};
