//! Values crossing the render boundary.
//!
//! [`LayoutInput`] is what the article layer hands in; [`RenderedThumbnail`]
//! is what it gets back. Both serialize to JSON for the `batch` command and
//! `--json` output.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use time::OffsetDateTime;
use time::macros::format_description;

/// Everything the compositor needs about one article.
///
/// Tag order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInput {
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl LayoutInput {
    pub fn author_label(&self) -> String {
        format!("Author: {}", self.author)
    }

    pub fn category_label(&self) -> String {
        format!("Category: {}", self.category)
    }

    /// `YYYY-MM-DD` in the timestamp's own offset.
    pub fn date_label(&self) -> String {
        // formatting only fails for components the value lacks
        self.created_at
            .date()
            .format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_default()
    }
}

/// Where a finished thumbnail lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedThumbnail {
    /// Public URL (`base_url` + `public_path` + file name).
    pub image_url: String,
    pub file_path: PathBuf,
    pub file_name: String,
}
