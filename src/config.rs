//! 全局配置管理，存储所有可配置项
//! 规则来源与两档阈值在启动时确定，运行期不可修改

use std::path::PathBuf;

use crate::core::AdLevel;
use crate::error::{AdResult, AdSiftError};

/// 默认"疑似广告"阈值
pub const DEFAULT_AMBIGUOUS_THRESHOLD: i64 = 25;
/// 默认"确定广告"阈值
pub const DEFAULT_DEFINITE_THRESHOLD: i64 = 50;

/// 规则来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOrigin {
    Embedded,           // 内置规则（编译期 include）
    LocalFile(PathBuf), // 本地 JSON 规则文件（运行时读取）
}

/// 评分阈值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub ambiguous: i64,
    pub definite: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ambiguous: DEFAULT_AMBIGUOUS_THRESHOLD,
            definite: DEFAULT_DEFINITE_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// 构建并校验阈值
    pub fn new(ambiguous: i64, definite: i64) -> AdResult<Self> {
        let thresholds = Self { ambiguous, definite };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> AdResult<()> {
        if self.definite <= self.ambiguous {
            return Err(AdSiftError::InvalidThresholds {
                ambiguous: self.ambiguous,
                definite: self.definite,
            });
        }
        Ok(())
    }

    /// 将评分映射为广告等级，低于 ambiguous 返回 None
    pub fn classify(&self, rating: i64) -> Option<AdLevel> {
        if rating >= self.definite {
            Some(AdLevel::Advertisement)
        } else if rating >= self.ambiguous {
            Some(AdLevel::Ambiguous)
        } else {
            None
        }
    }
}

/// 全局配置
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 规则来源
    pub rule_origin: RuleOrigin,
    // 评分阈值
    pub thresholds: Thresholds,
    // 是否允许空组合节点（允许时：空 and 恒真，空 or 恒假）
    pub allow_empty_combiners: bool,
    // 是否启用详细日志
    pub verbose: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            rule_origin: RuleOrigin::Embedded,
            thresholds: Thresholds::default(),
            allow_empty_combiners: false,
            verbose: false,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.rule_origin = RuleOrigin::LocalFile(path.into());
        self
    }

    pub fn ambiguous_threshold(mut self, threshold: i64) -> Self {
        self.config.thresholds.ambiguous = threshold;
        self
    }

    pub fn definite_threshold(mut self, threshold: i64) -> Self {
        self.config.thresholds.definite = threshold;
        self
    }

    pub fn allow_empty_combiners(mut self, allow: bool) -> Self {
        self.config.allow_empty_combiners = allow;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// 构建配置，阈值不合法时返回错误
    pub fn build(self) -> AdResult<GlobalConfig> {
        self.config.thresholds.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        let thresholds = Thresholds::default();

        assert_eq!(thresholds.classify(50), Some(AdLevel::Advertisement));
        assert_eq!(thresholds.classify(49), Some(AdLevel::Ambiguous));
        assert_eq!(thresholds.classify(25), Some(AdLevel::Ambiguous));
        assert_eq!(thresholds.classify(24), None);
        assert_eq!(thresholds.classify(0), None);
        assert_eq!(thresholds.classify(-150), None);
    }

    #[test]
    fn test_builder_rejects_inverted_thresholds() {
        let result = ConfigManager::custom()
            .ambiguous_threshold(60)
            .definite_threshold(60)
            .build();

        assert!(matches!(
            result,
            Err(AdSiftError::InvalidThresholds { ambiguous: 60, definite: 60 })
        ));
    }

    #[test]
    fn test_builder_sets_rule_file() {
        let config = ConfigManager::custom()
            .rule_file("rules/custom.json")
            .allow_empty_combiners(true)
            .build()
            .unwrap();

        assert_eq!(
            config.rule_origin,
            RuleOrigin::LocalFile(PathBuf::from("rules/custom.json"))
        );
        assert!(config.allow_empty_combiners);
        assert_eq!(config.thresholds, Thresholds::default());
    }
}
