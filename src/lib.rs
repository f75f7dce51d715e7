//! adsift - 基于加权规则树的画廊广告投稿识别引擎

// 导出全局错误类型
pub use self::error::{AdResult, AdSiftError};

// 导出配置模块
pub use self::config::{
    ConfigManager, CustomConfigBuilder, GlobalConfig, RuleOrigin, Thresholds,
    DEFAULT_AMBIGUOUS_THRESHOLD, DEFAULT_DEFINITE_THRESHOLD,
};

// 导出核心数据结构
pub use self::core::{AdLevel, Operator, RuleSpec, RuleTable, SelectorNode, SubmissionData, TargetField};

// 导出规则模块核心接口
pub use self::rule::{RuleLoader, embedded_rule_table};

// 导出编译模块核心接口
pub use self::compiler::{
    CompileOptions, CompiledNode, CompiledRule, CompiledRuleSet, CompiledSelector, RuleCompiler,
};

// 导出评估模块核心接口（含全局单例的简化接口）
pub use self::evaluator::{
    AdEvaluator, BatchSummary, EvaluationResult, EvaluationTrace, GalleryDecision, Highlight,
    RuleTrace, SelectionAction, SelectorTrace, classify, explain, init_global_evaluator,
    init_global_evaluator_with_config,
};

// 导出提取模块核心接口
pub use self::extractor::{GalleryEntry, GalleryExtractor};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod core;
pub mod rule;
pub mod compiler;
pub mod evaluator;
pub mod extractor;
