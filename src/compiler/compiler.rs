//! 规则编译器核心
//! 负责校验声明式规则表并编译正则，所有配置错误都在这里一次性暴露

use std::collections::HashSet;
use std::time::Instant;
use regex::RegexBuilder;
use tracing::{debug, warn};

use super::pattern::{CompiledNode, CompiledRule, CompiledRuleSet, CompiledSelector};
use crate::config::GlobalConfig;
use crate::core::{Operator, RuleSpec, RuleTable, SelectorNode};
use crate::error::{AdResult, AdSiftError};

/// 编译选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// 允许空组合节点（空 and 恒真，空 or 恒假），默认视为配置错误
    pub allow_empty_combiners: bool,
}

impl From<&GlobalConfig> for CompileOptions {
    fn from(config: &GlobalConfig) -> Self {
        Self {
            allow_empty_combiners: config.allow_empty_combiners,
        }
    }
}

/// 编译统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompileStats {
    pub rule_count: usize,
    pub selector_count: usize,
    pub combiner_count: usize,
    pub negative_rule_count: usize,
    pub empty_combiner_count: usize,
}

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译规则表
    pub fn compile(table: &RuleTable, options: &CompileOptions) -> AdResult<CompiledRuleSet> {
        Self::compile_with_stats(table, options).map(|(rule_set, _)| rule_set)
    }

    /// 编译规则表并返回统计信息
    pub fn compile_with_stats(
        table: &RuleTable,
        options: &CompileOptions,
    ) -> AdResult<(CompiledRuleSet, CompileStats)> {
        let start = Instant::now();
        let mut stats = CompileStats::default();
        let mut seen_names = HashSet::new();
        let mut rules = Vec::with_capacity(table.len());

        for rule_spec in &table.rules {
            if !seen_names.insert(rule_spec.name.as_str()) {
                warn!("Duplicate rule name '{}', traces will be ambiguous", rule_spec.name);
            }
            rules.push(Self::compile_rule(rule_spec, options, &mut stats)?);
        }

        debug!("✅ Rule compilation finished in {:?}", start.elapsed());
        debug!(
            "📊 Compile stats: rules={}, selectors={}, combiners={}, negative rules={}, empty combiners={}",
            stats.rule_count,
            stats.selector_count,
            stats.combiner_count,
            stats.negative_rule_count,
            stats.empty_combiner_count
        );

        Ok((CompiledRuleSet { rules }, stats))
    }

    /// 编译单条规则
    fn compile_rule(
        rule_spec: &RuleSpec,
        options: &CompileOptions,
        stats: &mut CompileStats,
    ) -> AdResult<CompiledRule> {
        if rule_spec.name.trim().is_empty() {
            return Err(AdSiftError::InvalidRule {
                rule: rule_spec.name.clone(),
                reason: "rule name must not be empty".to_string(),
            });
        }

        let node = Self::compile_node(&rule_spec.name, &rule_spec.selector, "selector", options, stats)?;

        stats.rule_count += 1;
        if rule_spec.weight < 0 {
            stats.negative_rule_count += 1;
        }

        Ok(CompiledRule {
            name: rule_spec.name.clone(),
            weight: rule_spec.weight,
            node,
        })
    }

    /// 递归编译选择器树，path 仅用于错误定位
    fn compile_node(
        rule_name: &str,
        node: &SelectorNode,
        path: &str,
        options: &CompileOptions,
        stats: &mut CompileStats,
    ) -> AdResult<CompiledNode> {
        let (operator, operands) = match node {
            SelectorNode::Selector { target, pattern, case_insensitive } => {
                if pattern.is_empty() {
                    return Err(AdSiftError::InvalidRule {
                        rule: rule_name.to_string(),
                        reason: format!("empty pattern at {}", path),
                    });
                }

                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(*case_insensitive)
                    .build()
                    .map_err(|source| AdSiftError::RegexCompileError {
                        rule: rule_name.to_string(),
                        pattern: pattern.clone(),
                        source,
                    })?;

                stats.selector_count += 1;
                return Ok(CompiledNode::Selector(CompiledSelector {
                    target: *target,
                    regex,
                    case_insensitive: *case_insensitive,
                }));
            }
            SelectorNode::And { operands } => (Operator::And, operands),
            SelectorNode::Or { operands } => (Operator::Or, operands),
        };

        if operands.is_empty() {
            if !options.allow_empty_combiners {
                return Err(AdSiftError::EmptyCombiner {
                    rule: rule_name.to_string(),
                    operator: operator.to_string(),
                    path: path.to_string(),
                });
            }
            warn!(
                "Rule '{}' has an empty '{}' combiner at {}, it is always {}",
                rule_name,
                operator,
                path,
                operator == Operator::And
            );
            stats.empty_combiner_count += 1;
        }

        let compiled_operands = operands
            .iter()
            .enumerate()
            .map(|(index, operand)| {
                let operand_path = format!("{}.operands[{}]", path, index);
                Self::compile_node(rule_name, operand, &operand_path, options, stats)
            })
            .collect::<AdResult<Vec<_>>>()?;

        stats.combiner_count += 1;
        Ok(CompiledNode::Combiner {
            operator,
            operands: compiled_operands,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SubmissionData;

    fn table(selector: SelectorNode) -> RuleTable {
        RuleTable::new(vec![RuleSpec::new("under test", 25, selector)])
    }

    #[test]
    fn test_empty_combiner_is_rejected_by_default() {
        let nested = table(SelectorNode::and(vec![
            SelectorNode::name("ych"),
            SelectorNode::or(vec![]),
        ]));

        let err = RuleCompiler::compile(&nested, &CompileOptions::default()).unwrap_err();
        match err {
            AdSiftError::EmptyCombiner { rule, operator, path } => {
                assert_eq!(rule, "under test");
                assert_eq!(operator, "or");
                assert_eq!(path, "selector.operands[1]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_combiner_allowed_uses_identity() {
        let options = CompileOptions { allow_empty_combiners: true };
        let data = SubmissionData::new("anything", "", "");

        let never = RuleCompiler::compile(&table(SelectorNode::or(vec![])), &options).unwrap();
        assert_eq!(never.rules[0].test(&data), None);

        let always = RuleCompiler::compile(&table(SelectorNode::and(vec![])), &options).unwrap();
        assert_eq!(always.rules[0].test(&data), Some(25));
    }

    #[test]
    fn test_invalid_regex_reports_rule_and_pattern() {
        let broken = table(SelectorNode::name("(unclosed"));

        let err = RuleCompiler::compile(&broken, &CompileOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            AdSiftError::RegexCompileError { ref rule, ref pattern, .. }
                if rule == "under test" && pattern == "(unclosed"
        ));
    }

    #[test]
    fn test_empty_pattern_and_name_are_rejected() {
        let empty_pattern = table(SelectorNode::tags(""));
        assert!(matches!(
            RuleCompiler::compile(&empty_pattern, &CompileOptions::default()),
            Err(AdSiftError::InvalidRule { .. })
        ));

        let unnamed = RuleTable::new(vec![RuleSpec::new("  ", 10, SelectorNode::name("x"))]);
        assert!(matches!(
            RuleCompiler::compile(&unnamed, &CompileOptions::default()),
            Err(AdSiftError::InvalidRule { .. })
        ));
    }

    #[test]
    fn test_case_sensitive_selector() {
        let rules = RuleCompiler::compile(
            &table(SelectorNode::name("^REM$").case_sensitive()),
            &CompileOptions::default(),
        )
        .unwrap();

        assert_eq!(rules.rules[0].test(&SubmissionData::new("REM", "", "")), Some(25));
        assert_eq!(rules.rules[0].test(&SubmissionData::new("rem", "", "")), None);
    }

    #[test]
    fn test_compile_stats() {
        let specs = RuleTable::new(vec![
            RuleSpec::new(
                "ych offer",
                25,
                SelectorNode::and(vec![
                    SelectorNode::name("ych"),
                    SelectorNode::or(vec![SelectorNode::name("open"), SelectorNode::name("auction")]),
                ]),
            ),
            RuleSpec::new("comic pages", -200, SelectorNode::name(r"\bpage\s*\d+")),
        ]);

        let (rule_set, stats) = RuleCompiler::compile_with_stats(&specs, &CompileOptions::default()).unwrap();
        assert_eq!(rule_set.len(), 2);
        assert_eq!(stats.rule_count, 2);
        assert_eq!(stats.selector_count, 4);
        assert_eq!(stats.combiner_count, 2);
        assert_eq!(stats.negative_rule_count, 1);
    }
}
