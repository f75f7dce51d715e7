//! 画廊处理结果：把评估结果映射为界面动作，并汇总批量统计
//! 这里只产出纯数据，勾选/高亮由调用方执行

use serde::Serialize;
use std::fmt;

use super::evaluator::{AdEvaluator, EvaluationResult};
use crate::core::AdLevel;
use crate::extractor::GalleryEntry;

/// 高亮样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    None,
    MaybeAdvertisement,
    Advertisement,
}

impl Highlight {
    /// 对应的 CSS 类名
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            Highlight::None => None,
            Highlight::MaybeAdvertisement => Some("maybe-advertisement"),
            Highlight::Advertisement => Some("advertisement"),
        }
    }
}

/// 单条投稿的界面动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionAction {
    /// 是否勾选（仅确定广告）
    pub select: bool,
    pub highlight: Highlight,
    /// 是否标记为未打标签
    pub untagged: bool,
}

impl SelectionAction {
    pub fn for_result(result: &EvaluationResult, untagged: bool) -> Self {
        let (select, highlight) = match result.level {
            Some(AdLevel::Advertisement) => (true, Highlight::Advertisement),
            Some(AdLevel::Ambiguous) => (false, Highlight::MaybeAdvertisement),
            None => (false, Highlight::None),
        };

        Self {
            select,
            highlight,
            untagged,
        }
    }
}

/// 单条投稿的处理结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryDecision {
    pub submission_id: String,
    pub name: String,
    pub result: EvaluationResult,
    pub action: SelectionAction,
}

/// 批量统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub advertisements: usize,
    pub ambiguous: usize,
    pub untagged: usize,
}

impl BatchSummary {
    pub fn record(&mut self, decision: &GalleryDecision) {
        match decision.result.level {
            Some(AdLevel::Advertisement) => self.advertisements += 1,
            Some(AdLevel::Ambiguous) => self.ambiguous += 1,
            None => {}
        }
        if decision.action.untagged {
            self.untagged += 1;
        }
    }
}

impl<'a> FromIterator<&'a GalleryDecision> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = &'a GalleryDecision>>(iter: I) -> Self {
        let mut summary = BatchSummary::default();
        for decision in iter {
            summary.record(decision);
        }
        summary
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Selected {} advertisement and {} ambiguous submissions. {} submissions were not tagged.",
            self.advertisements, self.ambiguous, self.untagged
        )
    }
}

impl AdEvaluator {
    /// 评估单条画廊条目
    pub fn decide(&self, entry: &GalleryEntry) -> GalleryDecision {
        let result = self.test(&entry.data);

        GalleryDecision {
            submission_id: entry.submission_id.clone(),
            name: entry.data.name.clone(),
            result,
            action: SelectionAction::for_result(&result, entry.data.is_untagged()),
        }
    }

    /// 批量评估画廊条目并汇总
    pub fn decide_all(&self, entries: &[GalleryEntry]) -> (Vec<GalleryDecision>, BatchSummary) {
        let decisions: Vec<_> = entries.iter().map(|entry| self.decide(entry)).collect();
        let summary = decisions.iter().collect();
        (decisions, summary)
    }
}
