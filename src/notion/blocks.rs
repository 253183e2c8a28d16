//! Notion block model and the builders for daily-page content.
//!
//! Blocks serialize to Notion's wire shape directly, e.g.
//!
//! ```json
//! {"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": [...]}}
//! ```

use crate::models::{CategoryBatch, NormalizedItem};
use crate::utils::truncate_chars;
use serde::{Deserialize, Serialize};

/// Maximum length of a single rich-text run accepted by Notion.
pub const RICH_TEXT_LIMIT: usize = 2000;

pub const DAILY_PAGE_INTRO: &str =
    "Resumo das notícias de Inteligência Artificial encontradas nas últimas 24 horas.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub italic: bool,
}

/// One run of rich text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichText {
    Text {
        text: TextContent,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
    },
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        RichText::Text {
            text: TextContent {
                content: truncate_chars(&content.into(), RICH_TEXT_LIMIT),
                link: None,
            },
            annotations: None,
        }
    }

    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        RichText::Text {
            text: TextContent {
                content: truncate_chars(&content.into(), RICH_TEXT_LIMIT),
                link: Some(Link { url: url.into() }),
            },
            annotations: None,
        }
    }

    pub fn italic(content: impl Into<String>) -> Self {
        RichText::Text {
            text: TextContent {
                content: truncate_chars(&content.into(), RICH_TEXT_LIMIT),
                link: None,
            },
            annotations: Some(Annotations { italic: true }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBody {
    pub rich_text: Vec<RichText>,
}

impl TextBody {
    fn plain(content: impl Into<String>) -> Self {
        Self {
            rich_text: vec![RichText::plain(content)],
        }
    }
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "heading_1")]
    Heading1 { heading_1: TextBody },
    #[serde(rename = "heading_2")]
    Heading2 { heading_2: TextBody },
    #[serde(rename = "paragraph")]
    Paragraph { paragraph: TextBody },
    #[serde(rename = "divider")]
    Divider { divider: Empty },
    #[serde(rename = "bulleted_list_item")]
    BulletedListItem { bulleted_list_item: TextBody },
}

impl Block {
    pub fn heading_1(content: impl Into<String>) -> Self {
        Block::Heading1 {
            heading_1: TextBody::plain(content),
        }
    }

    pub fn heading_2(content: impl Into<String>) -> Self {
        Block::Heading2 {
            heading_2: TextBody::plain(content),
        }
    }

    pub fn paragraph(content: impl Into<String>) -> Self {
        Block::Paragraph {
            paragraph: TextBody::plain(content),
        }
    }

    pub fn divider() -> Self {
        Block::Divider { divider: Empty {} }
    }

    pub fn bulleted(rich_text: Vec<RichText>) -> Self {
        Block::BulletedListItem {
            bulleted_list_item: TextBody { rich_text },
        }
    }

    /// Notion's `type` discriminant.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading1 { .. } => "heading_1",
            Block::Heading2 { .. } => "heading_2",
            Block::Paragraph { .. } => "paragraph",
            Block::Divider { .. } => "divider",
            Block::BulletedListItem { .. } => "bulleted_list_item",
        }
    }
}

/// Bullet for one item: linked title, source suffix, italic summary.
pub fn news_item_block(item: &NormalizedItem) -> Block {
    Block::bulleted(vec![
        RichText::link(&item.title, &item.link),
        RichText::plain(format!(" – {}", item.source_label)),
        RichText::italic(format!("\n{}", item.summary)),
    ])
}

/// Heading, one bullet per item, divider. Nothing for an empty batch.
pub fn category_blocks(batch: &CategoryBatch) -> Vec<Block> {
    if batch.items.is_empty() {
        return Vec::new();
    }
    let mut blocks = Vec::with_capacity(batch.items.len() + 2);
    blocks.push(Block::heading_2(&batch.category));
    blocks.extend(batch.items.iter().map(news_item_block));
    blocks.push(Block::divider());
    blocks
}

/// All category sections in batch order.
pub fn build_page_blocks(batches: &[CategoryBatch]) -> Vec<Block> {
    batches.iter().flat_map(category_blocks).collect()
}

/// Initial content of a freshly created daily page.
pub fn daily_page_intro(title: &str) -> Vec<Block> {
    vec![
        Block::heading_1(title),
        Block::paragraph(DAILY_PAGE_INTRO),
        Block::divider(),
    ]
}
