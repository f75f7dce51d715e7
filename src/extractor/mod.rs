//! 提取模块：从已获取的页面中提取投稿文本（网络请求不在本 crate 范围内）
pub mod gallery_extractor;

pub use self::gallery_extractor::{GalleryEntry, GalleryExtractor, parse_descriptions};
