//! 画廊页面提取器
//! 从已获取的投稿通知页 HTML 中提取每条投稿的名称、标签与简介

use std::cell::RefCell;
use std::collections::HashMap;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts
};
use markup5ever::interface::Attribute;
use serde::Deserialize;
use tendril::StrTendril;
use tracing::{debug, warn};
use url::Url;

use crate::core::SubmissionData;
use crate::error::AdResult;

/// 页面内嵌简介对象的变量名
const DESCRIPTIONS_MARKER: &str = "var descriptions";

/// 提取出的画廊条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    pub submission_id: String,
    pub link: Option<Url>,
    pub data: SubmissionData,
}

/// 画廊页面提取器
#[derive(Debug, Clone, Default)]
pub struct GalleryExtractor {
    base_url: Option<Url>,
}

impl GalleryExtractor {
    /// 创建新的提取器（相对链接不解析）
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定页面地址，用于解析投稿的相对链接
    pub fn with_base_url(base_url: &str) -> AdResult<Self> {
        Ok(Self {
            base_url: Some(Url::parse(base_url)?),
        })
    }

    /// 从HTML字符串提取所有画廊条目（文档顺序）
    pub fn extract(&self, html: &str) -> Vec<GalleryEntry> {
        let descriptions = parse_descriptions(html);
        let figures = GallerySink::collect(html);
        debug!(
            "Extracted {} gallery figures, {} descriptions",
            figures.len(),
            descriptions.len()
        );

        figures
            .into_iter()
            .map(|figure| self.to_entry(figure, &descriptions))
            .collect()
    }

    /// 缺失的标签与简介统一归一化为空字符串
    fn to_entry(&self, figure: RawFigure, descriptions: &HashMap<String, String>) -> GalleryEntry {
        let submission_id = figure
            .checkbox_value
            .or_else(|| figure.figure_id.map(|id| id.trim_start_matches("sid-").to_string()))
            .unwrap_or_default();

        let link = figure.href.and_then(|href| match &self.base_url {
            Some(base) => base.join(&href).ok(),
            None => Url::parse(&href).ok(),
        });

        let description = descriptions.get(&submission_id).cloned().unwrap_or_default();

        GalleryEntry {
            data: SubmissionData::new(figure.name.trim(), figure.tags.unwrap_or_default(), description),
            submission_id,
            link,
        }
    }
}

/// 页面内嵌简介对象的单项
#[derive(Debug, Deserialize)]
struct DescriptionEntry {
    #[serde(default)]
    description: String,
}

/// 解析页面脚本中的 `var descriptions = {...};` 对象（投稿ID -> 简介）
pub fn parse_descriptions(html: &str) -> HashMap<String, String> {
    let Some(start) = html.find(DESCRIPTIONS_MARKER) else {
        return HashMap::new();
    };
    let rest = &html[start + DESCRIPTIONS_MARKER.len()..];
    let Some(assign) = rest.find('=') else {
        return HashMap::new();
    };

    // 只读取第一个 JSON 值，后续的分号与脚本内容忽略
    let json = rest[assign + 1..].trim_start();
    let mut stream = serde_json::Deserializer::from_str(json)
        .into_iter::<HashMap<String, DescriptionEntry>>();

    match stream.next() {
        Some(Ok(entries)) => entries
            .into_iter()
            .map(|(id, entry)| (id, entry.description))
            .collect(),
        Some(Err(e)) => {
            warn!("Embedded descriptions object is malformed: {}", e);
            HashMap::new()
        }
        None => HashMap::new(),
    }
}

/// 单个 figure 的原始提取结果
#[derive(Debug, Default)]
struct RawFigure {
    figure_id: Option<String>,
    checkbox_value: Option<String>,
    href: Option<String>,
    tags: Option<String>,
    name: String,
    in_figcaption: bool,
    in_name_anchor: bool,
    name_done: bool,
}

/// 词法级提取状态机
#[derive(Debug, Default)]
struct GallerySink {
    // 当前打开的 section 是否为画廊
    sections: RefCell<Vec<bool>>,
    current: RefCell<Option<RawFigure>>,
    figures: RefCell<Vec<RawFigure>>,
}

impl TokenSink for GallerySink {
    type Handle = ();

    fn process_token(&self, token: Token, _line: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(Tag { kind: TagKind::StartTag, name, attrs, .. }) => {
                self.start_tag(name.as_ref(), &attrs)
            }
            Token::TagToken(Tag { kind: TagKind::EndTag, name, .. }) => self.end_tag(name.as_ref()),
            Token::CharacterTokens(text) => {
                if let Some(figure) = self.current.borrow_mut().as_mut() {
                    if figure.in_name_anchor {
                        figure.name.push_str(&text);
                    }
                }
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

impl GallerySink {
    fn collect(html: &str) -> Vec<RawFigure> {
        let tokenizer = Tokenizer::new(GallerySink::default(), TokenizerOpts::default());
        let queue = BufferQueue::default();
        queue.push_back(StrTendril::from(html));

        let _ = tokenizer.feed(&queue);
        tokenizer.end();

        let mut figures = tokenizer.sink.figures.take();
        figures.extend(tokenizer.sink.current.take());
        figures
    }

    fn in_gallery(&self) -> bool {
        self.sections.borrow().iter().any(|is_gallery| *is_gallery)
    }

    fn start_tag(&self, tag: &str, attrs: &[Attribute]) {
        if tag == "section" {
            let is_gallery = attr(attrs, "class")
                .is_some_and(|class| class.split_whitespace().any(|c| c == "gallery"));
            self.sections.borrow_mut().push(is_gallery);
            return;
        }

        if tag == "figure" && self.in_gallery() {
            let next = RawFigure {
                figure_id: attr(attrs, "id"),
                ..RawFigure::default()
            };
            // 上一个 figure 未闭合时先收下
            if let Some(pending) = self.current.borrow_mut().replace(next) {
                self.figures.borrow_mut().push(pending);
            }
            return;
        }

        let mut current = self.current.borrow_mut();
        let Some(figure) = current.as_mut() else {
            return;
        };

        match tag {
            "figcaption" => figure.in_figcaption = true,
            "a" => {
                if figure.href.is_none() {
                    figure.href = attr(attrs, "href");
                }
                // 名称取 figcaption 中第一个链接的文本
                if figure.in_figcaption && !figure.name_done {
                    figure.in_name_anchor = true;
                }
            }
            "img" => {
                if figure.tags.is_none() {
                    figure.tags = attr(attrs, "data-tags");
                }
            }
            "input" => {
                let is_checkbox = attr(attrs, "type").is_none_or(|t| t.eq_ignore_ascii_case("checkbox"));
                if is_checkbox && figure.checkbox_value.is_none() {
                    figure.checkbox_value = attr(attrs, "value");
                }
            }
            _ => {}
        }
    }

    fn end_tag(&self, tag: &str) {
        match tag {
            "section" => {
                self.sections.borrow_mut().pop();
            }
            "figure" => {
                if let Some(figure) = self.current.borrow_mut().take() {
                    self.figures.borrow_mut().push(figure);
                }
            }
            "figcaption" | "a" => {
                if let Some(figure) = self.current.borrow_mut().as_mut() {
                    if tag == "figcaption" {
                        figure.in_figcaption = false;
                    } else if figure.in_name_anchor {
                        figure.in_name_anchor = false;
                        figure.name_done = true;
                    }
                }
            }
            _ => {}
        }
    }
}

/// 读取属性值
fn attr(attrs: &[Attribute], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|attr| attr.name.local.as_ref() == name)
        .map(|attr| attr.value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <script>
            var descriptions = {"101":{"title":"YCH","description":"Auction ends Friday","username":"foo"},"102":{"title":"Dragon","description":"A commission piece I finished."}};
        </script>
        <section class="gallery messagecenter s-250">
            <figure id="sid-101" class="r-general t-image">
                <b><u><a href="/view/101/"><img alt="" src="//t.example/101.jpg" data-tags="ych auction"></a></u>
                <input type="checkbox" name="submissions[]" value="101"></b>
                <figcaption><label><p><a href="/view/101/" title="YCH">YCH auction open! $20 starting bid</a></p>
                <p><i>by</i> <a href="/user/foo/">Foo</a></p></label></figcaption>
            </figure>
            <figure id="sid-102">
                <b><u><a href="/view/102/"><img alt="" src="//t.example/102.jpg" data-tags="dragon fantasy"></a></u></b>
                <figcaption><p><a href="/view/102/">Just a cute dragon &amp; friends</a></p></figcaption>
            </figure>
            <figure id="sid-103">
                <b><u><a href="/view/103/"><img alt="" src="//t.example/103.jpg"></a></u>
                <input type="checkbox" value="103"></b>
                <figcaption><p><a href="/view/103/">Commission for FooBar</a></p></figcaption>
            </figure>
        </section>
        <section class="sidebar"><figure><figcaption><a href="/x/">Not a submission</a></figcaption></figure></section>
        </body></html>
    "#;

    #[test]
    fn test_extract_gallery_entries() {
        let extractor = GalleryExtractor::with_base_url("https://www.furaffinity.net/msg/submissions/").unwrap();
        let entries = extractor.extract(PAGE);

        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].submission_id, "101");
        assert_eq!(
            entries[0].data,
            SubmissionData::new("YCH auction open! $20 starting bid", "ych auction", "Auction ends Friday")
        );
        assert_eq!(
            entries[0].link.as_ref().map(Url::as_str),
            Some("https://www.furaffinity.net/view/101/")
        );

        // 没有复选框时回退到 figure id
        assert_eq!(entries[1].submission_id, "102");
        assert_eq!(entries[1].data.name, "Just a cute dragon & friends");
        assert_eq!(entries[1].data.description, "A commission piece I finished.");

        // 缺失标签与简介归一化为空字符串
        assert_eq!(entries[2].data, SubmissionData::new("Commission for FooBar", "", ""));
        assert!(entries[2].data.is_untagged());
    }

    #[test]
    fn test_relative_links_without_base_url() {
        let entries = GalleryExtractor::new().extract(PAGE);
        assert!(entries.iter().all(|entry| entry.link.is_none()));
    }

    #[test]
    fn test_unclosed_figure_is_kept() {
        let page = r#"
            <section class="gallery">
                <figure id="sid-201"><img data-tags="ych"><figcaption><a href="/view/201/">YCH open</a></figcaption>
                <figure id="sid-202"><img data-tags="dragon"><figcaption><a href="/view/202/">Dragon</a></figcaption></figure>
            </section>
        "#;
        let entries = GalleryExtractor::new().extract(page);

        let ids: Vec<_> = entries.iter().map(|entry| entry.submission_id.as_str()).collect();
        assert_eq!(ids, vec!["201", "202"]);
        assert_eq!(entries[0].data, SubmissionData::new("YCH open", "ych", ""));
        assert_eq!(entries[1].data.name, "Dragon");
    }

    #[test]
    fn test_parse_descriptions() {
        let descriptions = parse_descriptions(PAGE);
        assert_eq!(descriptions.len(), 2);
        assert_eq!(descriptions["101"], "Auction ends Friday");

        assert!(parse_descriptions("<p>no script here</p>").is_empty());
        assert!(parse_descriptions("var descriptions = {broken").is_empty());
    }
}
