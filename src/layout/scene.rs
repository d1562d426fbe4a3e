//! Draw list produced by the compositor.
//!
//! A [`Scene`] describes *what* goes on the canvas, in paint order, with all
//! geometry resolved. The [`painter`](crate::imaging::painter) turns it into
//! pixels. Nothing here touches a font file or a pixel buffer.

use super::budget::VerticalBudget;
use super::measure::{Face, FontRole};
use serde::Serialize;
use std::fmt;

/// One paint instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A single line of text, left edge at `x`, baseline at `baseline`.
    Text {
        face: Face,
        x: f32,
        baseline: f32,
        text: String,
    },
    /// A filled rounded rectangle (tag chip background).
    Chip {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
    },
}

/// Semantic region of the thumbnail, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Title,
    Author,
    Category,
    Tags,
    Date,
}

impl BlockKind {
    /// Fixed draw order. Layout never revisits an earlier block.
    pub const ORDER: [BlockKind; 5] = [
        BlockKind::Title,
        BlockKind::Author,
        BlockKind::Category,
        BlockKind::Tags,
        BlockKind::Date,
    ];

    pub fn role(self) -> FontRole {
        match self {
            BlockKind::Title => FontRole::Title,
            _ => FontRole::Body,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Title => "Title",
            BlockKind::Author => "Author",
            BlockKind::Category => "Category",
            BlockKind::Tags => "Tags",
            BlockKind::Date => "Date",
        };
        f.write_str(name)
    }
}

/// What a block ended up as: chosen size, how many lines/chips, and the
/// vertical range it occupies (top of first line to bottom of last).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockReport {
    pub kind: BlockKind,
    pub font_size: f32,
    /// Wrapped lines, or chips for the tags block.
    pub items: usize,
    pub top: f32,
    pub bottom: f32,
}

/// A fully laid-out thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
    pub blocks: Vec<BlockReport>,
    /// Raw allocation the layout started from.
    pub budget: VerticalBudget,
    /// Pixels clamped away from negative budgets.
    pub overflow: f32,
    /// How far the last tag chip reaches below the top of the date line.
    pub spill: f32,
}

impl Scene {
    pub fn block(&self, kind: BlockKind) -> Option<&BlockReport> {
        self.blocks.iter().find(|b| b.kind == kind)
    }

    /// All text lines in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Chip { .. } => None,
        })
    }

    pub fn chip_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Chip { .. }))
            .count()
    }
}
