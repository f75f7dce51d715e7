use serde::{Deserialize, Serialize};

use super::enums::TargetField;

/// 单条投稿的待检测文本
/// 缺失字段统一归一化为空字符串，空 tags 表示"未打标签"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub description: String,
}

impl SubmissionData {
    pub fn new(
        name: impl Into<String>,
        tags: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tags: tags.into(),
            description: description.into(),
        }
    }

    /// 按目标字段取文本
    #[inline(always)]
    pub fn field(&self, target: TargetField) -> &str {
        match target {
            TargetField::Name => &self.name,
            TargetField::Tags => &self.tags,
            TargetField::Description => &self.description,
        }
    }

    /// 是否未打标签
    pub fn is_untagged(&self) -> bool {
        self.tags.trim().is_empty()
    }
}
