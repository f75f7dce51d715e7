//! 内置广告规则表
//! 规则数据以 JSON 形式随 crate 一起编译进二进制，修改规则无需改动评估逻辑

use crate::core::RuleTable;
use crate::error::AdResult;

/// 内置规则表原文（data/ad_rules.json）
pub static EMBEDDED_RULES_JSON: &str = include_str!("../../data/ad_rules.json");

/// 解析内置规则表
pub fn embedded_rule_table() -> AdResult<RuleTable> {
    RuleTable::from_json_str(EMBEDDED_RULES_JSON)
}
