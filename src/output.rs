//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! Thumbnail
//!     File: uploads/images/6f1c…_thumb.png
//!     URL: http://localhost:8080/uploads/images/6f1c…_thumb.png
//! Layout 300x300
//!     Title: 30px, 1 line, y 47.0..83.0
//!     Author: 17px, 1 line, y 93.8..114.2
//!     Category: 15px, 1 line, y 123.8..141.8
//!     Tags: 14px, 2 chips, y 146.8..201.8
//!     Date: 14px, 1 line, y 266.0..282.8
//!     Budget: title 110.0, author 48.0, category -105.0, tags 120.0, date 0.0
//!     Overflow: 105.0px clamped
//! ```
//!
//! ## Batch
//!
//! ```text
//! 001 Hello World → 6f1c…_thumb.png
//! 002 Broken post ✗ Cannot create upload directory …
//! Rendered 1 of 2 thumbnails (1 failed)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::batch::{BatchEvent, BatchReport};
use crate::layout::{BlockKind, BlockReport, Scene, VerticalBudget};
use crate::types::RenderedThumbnail;
use serde::Serialize;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn block_line(block: &BlockReport) -> String {
    if block.items == 0 {
        return format!("    {}: empty", block.kind);
    }
    let count = match block.kind {
        BlockKind::Tags => plural(block.items, "chip", "chips"),
        _ => plural(block.items, "line", "lines"),
    };
    format!(
        "    {}: {}px, {}, y {:.1}..{:.1}",
        block.kind, block.font_size, count, block.top, block.bottom
    )
}

// ============================================================================
// Layout
// ============================================================================

/// Serializable view of a [`Scene`] without its draw ops.
#[derive(Debug, Serialize)]
pub struct LayoutSummary<'a> {
    pub width: u32,
    pub height: u32,
    pub budget: &'a VerticalBudget,
    pub overflow: f32,
    pub spill: f32,
    pub blocks: &'a [BlockReport],
}

impl<'a> From<&'a Scene> for LayoutSummary<'a> {
    fn from(scene: &'a Scene) -> Self {
        Self {
            width: scene.width,
            height: scene.height,
            budget: &scene.budget,
            overflow: scene.overflow,
            spill: scene.spill,
            blocks: &scene.blocks,
        }
    }
}

pub fn format_layout_output(scene: &Scene) -> Vec<String> {
    let mut lines = vec![format!("Layout {}x{}", scene.width, scene.height)];
    lines.extend(scene.blocks.iter().map(block_line));
    let b = &scene.budget;
    lines.push(format!(
        "    Budget: title {:.1}, author {:.1}, category {:.1}, tags {:.1}, date {:.1}",
        b.title, b.author, b.category, b.tags, b.date
    ));
    if scene.overflow > 0.0 {
        lines.push(format!("    Overflow: {:.1}px clamped", scene.overflow));
    }
    if scene.spill > 0.0 {
        lines.push(format!("    Spill: tags run {:.1}px into the date", scene.spill));
    }
    lines
}

pub fn print_layout_output(scene: &Scene) {
    for line in format_layout_output(scene) {
        println!("{}", line);
    }
}

// ============================================================================
// Render
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RenderSummary<'a> {
    #[serde(flatten)]
    pub thumbnail: &'a RenderedThumbnail,
    pub layout: LayoutSummary<'a>,
}

pub fn format_render_output(thumbnail: &RenderedThumbnail, scene: &Scene) -> Vec<String> {
    let mut lines = vec![
        "Thumbnail".to_string(),
        format!("    File: {}", thumbnail.file_path.display()),
        format!("    URL: {}", thumbnail.image_url),
    ];
    lines.extend(format_layout_output(scene));
    lines
}

pub fn print_render_output(thumbnail: &RenderedThumbnail, scene: &Scene) {
    for line in format_render_output(thumbnail, scene) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch
// ============================================================================

/// One progress event. Indices are shown 1-based.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Rendered {
            index,
            title,
            thumbnail,
        } => vec![format!(
            "{} {} → {}",
            format_index(index + 1),
            title,
            thumbnail.file_name
        )],
        BatchEvent::Failed {
            index,
            title,
            error,
        } => vec![format!("{} {} ✗ {}", format_index(index + 1), title, error)],
    }
}

pub fn format_batch_summary(report: &BatchReport) -> Vec<String> {
    let mut line = format!(
        "Rendered {} of {}",
        report.rendered.len(),
        plural(report.total(), "thumbnail", "thumbnails")
    );
    if !report.failed.is_empty() {
        line.push_str(&format!(" ({} failed)", report.failed.len()));
    }
    vec![line]
}

pub fn print_batch_summary(report: &BatchReport) {
    for line in format_batch_summary(report) {
        println!("{}", line);
    }
}
