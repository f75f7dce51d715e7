use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// 匹配目标字段，对应投稿的三段文本
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetField {
    Name,
    Tags,
    Description,
}

impl Display for TargetField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetField::Name => write!(f, "name"),
            TargetField::Tags => write!(f, "tags"),
            TargetField::Description => write!(f, "description"),
        }
    }
}

/// 组合节点运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    And,
    Or,
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::And => write!(f, "and"),
            Operator::Or => write!(f, "or"),
        }
    }
}

/// 广告等级（"非广告"用 Option::None 表示）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdLevel {
    Ambiguous,
    Advertisement,
}

impl Display for AdLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AdLevel::Ambiguous => write!(f, "ambiguous"),
            AdLevel::Advertisement => write!(f, "advertisement"),
        }
    }
}
