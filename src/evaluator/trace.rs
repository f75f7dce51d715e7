//! 诊断轨迹模型
//! explain 的返回值：每条规则、每个被访问的选择器都有对应节点，渲染方式由调用方决定

use serde::Serialize;
use std::fmt::{self, Display, Formatter};

use crate::core::{AdLevel, Operator, TargetField};

/// 选择器树的遍历轨迹
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SelectorTrace {
    Selector {
        target: TargetField,
        pattern: String,
        case_insensitive: bool,
        matched: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        matched_text: Option<String>,
        field_value: String,
    },
    Combiner {
        operator: Operator,
        matched: bool,
        /// 按短路顺序实际访问过的操作数
        operands: Vec<SelectorTrace>,
        /// 因短路未访问的操作数个数
        skipped: usize,
    },
}

impl SelectorTrace {
    #[inline]
    pub fn matched(&self) -> bool {
        match self {
            SelectorTrace::Selector { matched, .. } | SelectorTrace::Combiner { matched, .. } => *matched,
        }
    }

    fn write_tree(&self, f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            SelectorTrace::Selector {
                target,
                pattern,
                case_insensitive,
                matched,
                matched_text,
                field_value,
            } => {
                let flags = if *case_insensitive { "i" } else { "" };
                write!(f, "{}{} {} =~ /{}/{}", indent, mark(*matched), target, pattern, flags)?;
                match matched_text {
                    Some(text) => writeln!(f, " matched {:?}", text),
                    None => writeln!(f, " in {:?}", field_value),
                }
            }
            SelectorTrace::Combiner { operator, matched, operands, skipped } => {
                write!(f, "{}{} {}", indent, mark(*matched), operator)?;
                if *skipped > 0 {
                    write!(f, " ({} skipped)", skipped)?;
                }
                writeln!(f)?;
                for operand in operands {
                    operand.write_tree(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

fn mark(matched: bool) -> &'static str {
    if matched { "✓" } else { "✗" }
}

/// 单条规则的轨迹
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTrace {
    pub name: String,
    pub weight: i32,
    pub matched: bool,
    /// 命中时等于权重，未命中为 None
    pub contribution: Option<i64>,
    pub selector: SelectorTrace,
}

impl Display for RuleTrace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.contribution {
            Some(value) => writeln!(f, "[{:+}] {}", value, self.name)?,
            None => writeln!(f, "[ -- ] {} ({:+})", self.name, self.weight)?,
        }
        self.selector.write_tree(f, 1)
    }
}

/// 整个规则集的评估轨迹（规则按声明顺序排列）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationTrace {
    pub rating: i64,
    pub level: Option<AdLevel>,
    pub rules: Vec<RuleTrace>,
}

impl EvaluationTrace {
    /// 命中的规则
    pub fn matched_rules(&self) -> impl Iterator<Item = &RuleTrace> {
        self.rules.iter().filter(|rule| rule.matched)
    }
}

impl Display for EvaluationTrace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let level = self.level.map_or_else(|| "none".to_string(), |level| level.to_string());
        writeln!(
            f,
            "rating {} => {} ({} of {} rules matched)",
            self.rating,
            level,
            self.matched_rules().count(),
            self.rules.len()
        )?;
        for rule in &self.rules {
            write!(f, "{}", rule)?;
        }
        Ok(())
    }
}
