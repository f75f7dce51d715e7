//! 编译后模式模型
//! 选择器树的解释执行（test）与诊断遍历（explain）都在这里

use regex::Regex;

use crate::core::{Operator, SubmissionData, TargetField};
use crate::evaluator::trace::{RuleTrace, SelectorTrace};

/// 编译后的叶子选择器：目标字段 + 正则
#[derive(Debug, Clone)]
pub struct CompiledSelector {
    pub target: TargetField,
    pub regex: Regex,
    pub case_insensitive: bool,
}

impl CompiledSelector {
    /// 简单匹配判断，空字符串输入同样安全
    #[inline(always)]
    pub fn test(&self, data: &SubmissionData) -> bool {
        self.regex.is_match(data.field(self.target))
    }

    /// 与 test 结果一致，额外记录命中片段与字段原文
    pub fn explain(&self, data: &SubmissionData) -> SelectorTrace {
        let field_value = data.field(self.target);
        let found = self.regex.find(field_value);

        SelectorTrace::Selector {
            target: self.target,
            pattern: self.regex.as_str().to_string(),
            case_insensitive: self.case_insensitive,
            matched: found.is_some(),
            matched_text: found.map(|m| m.as_str().to_string()),
            field_value: field_value.to_string(),
        }
    }
}

/// 编译后的选择器树节点
#[derive(Debug, Clone)]
pub enum CompiledNode {
    Selector(CompiledSelector),
    Combiner {
        operator: Operator,
        operands: Vec<CompiledNode>,
    },
}

impl CompiledNode {
    /// 递归求值，and / or 均短路
    /// 空操作数时 all() 为真、any() 为假（仅在允许空组合节点时可能出现）
    pub fn test(&self, data: &SubmissionData) -> bool {
        match self {
            CompiledNode::Selector(selector) => selector.test(data),
            CompiledNode::Combiner { operator: Operator::And, operands } => {
                operands.iter().all(|operand| operand.test(data))
            }
            CompiledNode::Combiner { operator: Operator::Or, operands } => {
                operands.iter().any(|operand| operand.test(data))
            }
        }
    }

    /// 诊断遍历：按短路顺序记录实际访问过的操作数
    /// and 在第一个失败处停止，or 在第一个命中处停止，其余计入 skipped
    pub fn explain(&self, data: &SubmissionData) -> SelectorTrace {
        let (operator, operands) = match self {
            CompiledNode::Selector(selector) => return selector.explain(data),
            CompiledNode::Combiner { operator, operands } => (*operator, operands),
        };

        let mut matched = operator == Operator::And;
        let mut visited = Vec::with_capacity(operands.len());

        for operand in operands {
            let trace = operand.explain(data);
            let operand_matched = trace.matched();
            visited.push(trace);

            match operator {
                Operator::And if !operand_matched => {
                    matched = false;
                    break;
                }
                Operator::Or if operand_matched => {
                    matched = true;
                    break;
                }
                _ => {}
            }
        }

        SelectorTrace::Combiner {
            operator,
            matched,
            skipped: operands.len() - visited.len(),
            operands: visited,
        }
    }
}

/// 编译后的单条规则
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub name: String,
    pub weight: i32,
    pub node: CompiledNode,
}

impl CompiledRule {
    /// 命中返回权重，未命中返回 None（权重为 0 的命中是 Some(0)）
    #[inline]
    pub fn test(&self, data: &SubmissionData) -> Option<i64> {
        self.node.test(data).then_some(i64::from(self.weight))
    }

    pub fn explain(&self, data: &SubmissionData) -> RuleTrace {
        let selector = self.node.explain(data);
        let matched = selector.matched();

        RuleTrace {
            name: self.name.clone(),
            weight: self.weight,
            matched,
            contribution: matched.then_some(i64::from(self.weight)),
            selector,
        }
    }
}

/// 编译后的规则集（保持声明顺序）
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleSet {
    pub rules: Vec<CompiledRule>,
}

impl CompiledRuleSet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRule> {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    fn leaf(target: TargetField, pattern: &str) -> CompiledNode {
        CompiledNode::Selector(CompiledSelector {
            target,
            regex: RegexBuilder::new(pattern).case_insensitive(true).build().unwrap(),
            case_insensitive: true,
        })
    }

    fn combiner(operator: Operator, operands: Vec<CompiledNode>) -> CompiledNode {
        CompiledNode::Combiner { operator, operands }
    }

    #[test]
    fn test_and_or_semantics() {
        let data = SubmissionData::new("YCH open", "ych", "");
        let a = || leaf(TargetField::Name, r"\bych\b");
        let b = || leaf(TargetField::Tags, r"\bauction\b");

        assert!(!combiner(Operator::And, vec![a(), b()]).test(&data));
        assert!(combiner(Operator::Or, vec![a(), b()]).test(&data));
        assert!(combiner(Operator::And, vec![a(), leaf(TargetField::Tags, "ych")]).test(&data));
        assert!(!combiner(Operator::Or, vec![b(), leaf(TargetField::Description, ".")]).test(&data));
    }

    #[test]
    fn test_empty_combiner_identity() {
        let data = SubmissionData::default();

        assert!(combiner(Operator::And, vec![]).test(&data));
        assert!(!combiner(Operator::Or, vec![]).test(&data));
        assert!(combiner(Operator::And, vec![]).explain(&data).matched());
        assert!(!combiner(Operator::Or, vec![]).explain(&data).matched());
    }

    #[test]
    fn test_or_trace_stops_at_first_match() {
        let data = SubmissionData::new("stream tonight", "", "");
        let node = combiner(
            Operator::Or,
            vec![
                leaf(TargetField::Name, r"\braffle\b"),
                leaf(TargetField::Name, r"\bstream\b"),
                leaf(TargetField::Name, r"\btonight\b"),
            ],
        );

        let SelectorTrace::Combiner { matched, operands, skipped, .. } = node.explain(&data) else {
            panic!("expected a combiner trace");
        };
        assert!(matched);
        assert_eq!(operands.len(), 2);
        assert_eq!(skipped, 1);
        assert!(!operands[0].matched());
        assert!(operands[1].matched());
    }

    #[test]
    fn test_and_trace_stops_at_first_failure() {
        let data = SubmissionData::new("price list", "", "");
        let node = combiner(
            Operator::And,
            vec![
                leaf(TargetField::Name, r"\bprice\b"),
                leaf(TargetField::Name, r"\bsheet\b"),
                leaf(TargetField::Name, r"\blist\b"),
            ],
        );

        let SelectorTrace::Combiner { matched, operands, skipped, .. } = node.explain(&data) else {
            panic!("expected a combiner trace");
        };
        assert!(!matched);
        assert_eq!(operands.len(), 2);
        assert_eq!(skipped, 1);
        assert!(!operands[1].matched());
    }

    #[test]
    fn test_selector_trace_records_match() {
        let data = SubmissionData::new("Commission sheet OPEN", "", "");
        let trace = leaf(TargetField::Name, r"\bopen\b").explain(&data);

        let SelectorTrace::Selector { matched, matched_text, field_value, .. } = trace else {
            panic!("expected a selector trace");
        };
        assert!(matched);
        assert_eq!(matched_text.as_deref(), Some("OPEN"));
        assert_eq!(field_value, "Commission sheet OPEN");
    }

    #[test]
    fn test_zero_weight_is_distinguishable_from_no_match() {
        let rule = CompiledRule {
            name: "neutral".to_string(),
            weight: 0,
            node: leaf(TargetField::Name, "sketch"),
        };

        assert_eq!(rule.test(&SubmissionData::new("sketch", "", "")), Some(0));
        assert_eq!(rule.test(&SubmissionData::new("painting", "", "")), None);
    }
}
