//! 全局评估器单例管理
use once_cell::sync::OnceCell;

use super::evaluator::{AdEvaluator, EvaluationResult};
use super::trace::EvaluationTrace;
use crate::config::{ConfigManager, GlobalConfig};
use crate::core::SubmissionData;
use crate::error::{AdResult, AdSiftError};

/// 全局评估器实例
static GLOBAL_EVALUATOR: OnceCell<AdEvaluator> = OnceCell::new();

/// 初始化全局评估器（默认配置）
pub fn init_global_evaluator() -> AdResult<()> {
    init_global_evaluator_with_config(&ConfigManager::get_default())
}

/// 带自定义配置初始化全局评估器，重复初始化时保留第一次的实例
pub fn init_global_evaluator_with_config(config: &GlobalConfig) -> AdResult<()> {
    GLOBAL_EVALUATOR.get_or_try_init(|| AdEvaluator::new(config))?;
    Ok(())
}

/// 获取全局评估器
pub(crate) fn get_global_evaluator() -> AdResult<&'static AdEvaluator> {
    initialized(&GLOBAL_EVALUATOR)
}

fn initialized(cell: &OnceCell<AdEvaluator>) -> AdResult<&AdEvaluator> {
    cell.get().ok_or_else(|| {
        AdSiftError::EvaluatorNotInitialized("call init_global_evaluator() first".to_string())
    })
}

/// 使用全局评估器分类
pub fn classify(data: &SubmissionData) -> AdResult<EvaluationResult> {
    Ok(get_global_evaluator()?.test(data))
}

/// 使用全局评估器生成诊断轨迹
pub fn explain(data: &SubmissionData) -> AdResult<EvaluationTrace> {
    Ok(get_global_evaluator()?.explain(data))
}
