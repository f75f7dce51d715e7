//! 编译模块：将声明式规则表校验并编译为可执行的选择器树
pub mod pattern;
pub mod compiler;

pub use self::pattern::{CompiledNode, CompiledRule, CompiledRuleSet, CompiledSelector};
pub use self::compiler::{CompileOptions, CompileStats, RuleCompiler};
