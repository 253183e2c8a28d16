//! Page property payloads: the daily page title and the news database row.

use super::blocks::RichText;
use crate::models::NormalizedItem;
use crate::utils::iso_timestamp;
use serde::{Deserialize, Serialize};

/// Properties of a page created under another page: only a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTitleProperties {
    pub title: Vec<RichText>,
}

impl PageTitleProperties {
    pub fn new(title: &str) -> Self {
        Self {
            title: vec![RichText::plain(title)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleProperty {
    pub title: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextProperty {
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlProperty {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectProperty {
    pub select: SelectOption,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateProperty {
    pub date: DateValue,
}

/// One row of the news database. Column names are fixed by the database schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowProperties {
    #[serde(rename = "Título")]
    pub title: TitleProperty,
    #[serde(rename = "Resumo")]
    pub summary: RichTextProperty,
    #[serde(rename = "Link")]
    pub link: UrlProperty,
    #[serde(rename = "Categoria")]
    pub category: SelectProperty,
    #[serde(rename = "Fonte")]
    pub source: SelectProperty,
    #[serde(rename = "Data da Publicação")]
    pub published: DateProperty,
}

/// Notion rejects select option names containing commas.
fn select_name(value: &str) -> String {
    value.replace(',', " ")
}

impl From<&NormalizedItem> for RowProperties {
    fn from(item: &NormalizedItem) -> Self {
        Self {
            title: TitleProperty {
                title: vec![RichText::plain(&item.title)],
            },
            summary: RichTextProperty {
                rich_text: vec![RichText::plain(&item.summary)],
            },
            link: UrlProperty {
                url: item.link.clone(),
            },
            category: SelectProperty {
                select: SelectOption {
                    name: select_name(&item.category),
                },
            },
            source: SelectProperty {
                select: SelectOption {
                    name: select_name(&item.source_label),
                },
            },
            published: DateProperty {
                date: DateValue {
                    start: iso_timestamp(item.publication_date),
                },
            },
        }
    }
}
