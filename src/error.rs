//! 全局错误类型定义
//! 除 JSON / URL 外，绝大多数错误都发生在启动期的规则加载与校验阶段，评估阶段本身不会失败

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum AdSiftError {
    // ===================== 规则相关错误 =====================
    /// 规则加载失败（文件不存在/来源不可用）
    #[error("Rule load failed: {0}")]
    RuleLoadError(String),

    /// 单条规则定义不合法（空名称、空模式等）
    #[error("Invalid rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    /// 组合节点没有任何操作数（默认视为配置错误）
    #[error("Rule '{rule}' has an empty '{operator}' combiner at {path}")]
    EmptyCombiner {
        rule: String,
        operator: String,
        path: String,
    },

    // ===================== 编译相关错误 =====================
    /// 正则表达式编译失败
    #[error("Regex compilation failed in rule '{rule}' (pattern `{pattern}`): {source}")]
    RegexCompileError {
        rule: String,
        pattern: String,
        #[source]
        source: RegexError,
    },

    // ===================== 配置相关错误 =====================
    /// 阈值配置不合法（definite 必须严格大于 ambiguous）
    #[error("Invalid thresholds: definite ({definite}) must be greater than ambiguous ({ambiguous})")]
    InvalidThresholds { ambiguous: i64, definite: i64 },

    // ===================== 评估器相关错误 =====================
    #[error("Evaluator not initialized: {0}")]
    EvaluatorNotInitialized(String),

    // ===================== 基础错误 =====================
    #[error("JSON parse failed: {0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("URL parse failed: {0}")]
    UrlError(#[from] UrlParseError),
}

// 全局Result类型
pub type AdResult<T> = Result<T, AdSiftError>;
