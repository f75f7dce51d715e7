//! 评估器核心：遍历规则集，累加命中权重并按阈值分级
use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::trace::EvaluationTrace;
use crate::compiler::{CompileOptions, CompiledRuleSet, RuleCompiler};
use crate::config::{GlobalConfig, Thresholds};
use crate::core::{AdLevel, RuleTable, SubmissionData};
use crate::error::AdResult;
use crate::rule::RuleLoader;

/// 单次评估结果
/// level 为 None 表示"非广告"，序列化为 null
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub rating: i64,
    pub level: Option<AdLevel>,
}

impl EvaluationResult {
    pub fn is_advertisement(&self) -> bool {
        self.level == Some(AdLevel::Advertisement)
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Some(level) => write!(f, "{} ({})", level, self.rating),
            None => write!(f, "none ({})", self.rating),
        }
    }
}

/// 广告评估器
/// 规则集编译后只读，克隆仅增加引用计数，可跨线程共享
#[derive(Debug, Clone)]
pub struct AdEvaluator {
    rules: Arc<CompiledRuleSet>,
    thresholds: Thresholds,
}

impl AdEvaluator {
    /// 按配置创建评估器：加载规则表 → 校验编译 → 绑定阈值
    pub fn new(config: &GlobalConfig) -> AdResult<Self> {
        config.thresholds.validate()?;
        let table = RuleLoader::load(config)?;
        let rules = RuleCompiler::compile(&table, &CompileOptions::from(config))?;
        Self::from_compiled(rules, config.thresholds)
    }

    /// 内置规则 + 默认阈值
    pub fn embedded() -> AdResult<Self> {
        Self::new(&GlobalConfig::default())
    }

    /// 从规则表直接创建（默认编译选项）
    pub fn from_table(table: &RuleTable, thresholds: Thresholds) -> AdResult<Self> {
        let rules = RuleCompiler::compile(table, &CompileOptions::default())?;
        Self::from_compiled(rules, thresholds)
    }

    pub fn from_compiled(rules: CompiledRuleSet, thresholds: Thresholds) -> AdResult<Self> {
        thresholds.validate()?;
        Ok(Self {
            rules: Arc::new(rules),
            thresholds,
        })
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn rules(&self) -> &CompiledRuleSet {
        &self.rules
    }

    /// 命中规则权重之和
    pub fn rating(&self, data: &SubmissionData) -> i64 {
        self.rules
            .iter()
            .filter_map(|rule| {
                let contribution = rule.test(data)?;
                trace!("Rule matched: rule={}, contribution={}", rule.name, contribution);
                Some(contribution)
            })
            .sum()
    }

    /// 核心评估接口
    pub fn test(&self, data: &SubmissionData) -> EvaluationResult {
        let rating = self.rating(data);
        EvaluationResult {
            rating,
            level: self.thresholds.classify(rating),
        }
    }

    /// 批量评估，各条投稿相互独立
    pub fn test_batch(&self, submissions: &[SubmissionData]) -> Vec<EvaluationResult> {
        submissions.iter().map(|data| self.test(data)).collect()
    }

    /// 命中规则的名称（声明顺序）
    pub fn matched_rules(&self, data: &SubmissionData) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.test(data).is_some())
            .map(|rule| rule.name.as_str())
            .collect()
    }

    /// 诊断接口：逐条规则给出命中情况与选择器轨迹，结果与 test 一致
    pub fn explain(&self, data: &SubmissionData) -> EvaluationTrace {
        let rules: Vec<_> = self.rules.iter().map(|rule| rule.explain(data)).collect();
        let rating: i64 = rules.iter().filter_map(|rule| rule.contribution).sum();

        EvaluationTrace {
            rating,
            level: self.thresholds.classify(rating),
            rules,
        }
    }
}
