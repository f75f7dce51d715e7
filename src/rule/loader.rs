//! 规则加载管理器
//! 负责从内置数据或本地 JSON 文件读取规则表

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::builtin::embedded_rule_table;
use crate::config::{GlobalConfig, RuleOrigin};
use crate::core::RuleTable;
use crate::error::{AdResult, AdSiftError};

/// 规则加载管理器
pub struct RuleLoader;

impl RuleLoader {
    /// 按配置的规则来源加载规则表
    pub fn load(config: &GlobalConfig) -> AdResult<RuleTable> {
        let table = match &config.rule_origin {
            RuleOrigin::Embedded => {
                debug!("Loading embedded rule table");
                embedded_rule_table()?
            }
            RuleOrigin::LocalFile(path) => Self::load_file(path)?,
        };

        if table.is_empty() {
            warn!("Rule table is empty, every submission will rate 0");
        }
        if config.verbose {
            Self::debug_summary(&table);
        }

        Ok(table)
    }

    /// 读取本地 JSON 规则文件
    pub fn load_file(path: &Path) -> AdResult<RuleTable> {
        let content = fs::read_to_string(path).map_err(|e| {
            AdSiftError::RuleLoadError(format!("cannot read {}: {}", path.display(), e))
        })?;

        let table = RuleTable::from_json_str(&content)?;
        debug!("Loaded {} rules from {}", table.len(), path.display());
        Ok(table)
    }

    // ===== 规则表概况 =====
    fn debug_summary(table: &RuleTable) {
        let negative = table.rules.iter().filter(|rule| rule.weight < 0).count();
        let selectors: usize = table.rules.iter().map(|rule| rule.selector.selector_count()).sum();

        debug!("===== Rule table summary =====");
        debug!("  rules: {}", table.len());
        debug!("  negative-evidence rules: {}", negative);
        debug!("  leaf selectors: {}", selectors);
    }
}
