use serde::{Deserialize, Serialize};

use super::enums::{Operator, TargetField};
use crate::error::AdResult;

fn default_case_insensitive() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// 选择器树节点（声明式）
/// `kind` 作为显式判别字段：selector 为叶子，and / or 为组合节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SelectorNode {
    Selector {
        target: TargetField,
        pattern: String,
        #[serde(default = "default_case_insensitive", skip_serializing_if = "is_true")]
        case_insensitive: bool,
    },
    And {
        #[serde(default)]
        operands: Vec<SelectorNode>,
    },
    Or {
        #[serde(default)]
        operands: Vec<SelectorNode>,
    },
}

impl SelectorNode {
    /// 忽略大小写的叶子选择器
    pub fn selector(target: TargetField, pattern: impl Into<String>) -> Self {
        SelectorNode::Selector {
            target,
            pattern: pattern.into(),
            case_insensitive: true,
        }
    }

    pub fn name(pattern: impl Into<String>) -> Self {
        Self::selector(TargetField::Name, pattern)
    }

    pub fn tags(pattern: impl Into<String>) -> Self {
        Self::selector(TargetField::Tags, pattern)
    }

    pub fn description(pattern: impl Into<String>) -> Self {
        Self::selector(TargetField::Description, pattern)
    }

    pub fn and(operands: Vec<SelectorNode>) -> Self {
        SelectorNode::And { operands }
    }

    pub fn or(operands: Vec<SelectorNode>) -> Self {
        SelectorNode::Or { operands }
    }

    /// 关闭叶子选择器的忽略大小写（组合节点原样返回）
    pub fn case_sensitive(self) -> Self {
        match self {
            SelectorNode::Selector { target, pattern, .. } => SelectorNode::Selector {
                target,
                pattern,
                case_insensitive: false,
            },
            other => other,
        }
    }

    /// 组合节点的运算符与操作数，叶子返回 None
    pub fn as_combiner(&self) -> Option<(Operator, &[SelectorNode])> {
        match self {
            SelectorNode::Selector { .. } => None,
            SelectorNode::And { operands } => Some((Operator::And, operands)),
            SelectorNode::Or { operands } => Some((Operator::Or, operands)),
        }
    }

    /// 子树中叶子选择器的数量
    pub fn selector_count(&self) -> usize {
        match self.as_combiner() {
            None => 1,
            Some((_, operands)) => operands.iter().map(SelectorNode::selector_count).sum(),
        }
    }
}

/// 单条规则定义：选择器树 + 有符号整数权重 + 诊断用名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub weight: i32,
    pub selector: SelectorNode,
}

impl RuleSpec {
    pub fn new(name: impl Into<String>, weight: i32, selector: SelectorNode) -> Self {
        Self {
            name: name.into(),
            weight,
            selector,
        }
    }
}

/// 完整规则表（有序）
/// 顺序只影响 explain 输出顺序，不影响评分
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    pub rules: Vec<RuleSpec>,
}

impl RuleTable {
    pub fn new(rules: Vec<RuleSpec>) -> Self {
        Self { rules }
    }

    /// 从 JSON 文本解析规则表
    /// 未知 target、非整数权重等在此阶段即报错
    pub fn from_json_str(json: &str) -> AdResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_pretty_json(&self) -> AdResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
