//! The compositor: turns a [`LayoutInput`] into a [`Scene`].
//!
//! Blocks are laid out in the fixed order of [`BlockKind::ORDER`]. Each block
//! step is a pure function of the incoming vertical cursor that returns its
//! draw ops, a [`BlockReport`], and the outgoing cursor; the compositor just
//! threads the cursor through the steps.
//!
//! ```text
//! y=40  ┌──────────────────────────────┐  title    (bold, ≤30px, centered in 110px)
//!       │                              │  author   (≤17px, centered in 48px)
//!       │                              │  category (≤ author−2px)
//!       │  ┌────────┐                  │  tags     (chips, shared size ≤14px)
//!       │  └────────┘                  │
//! y=280 │  2024-05-01                  │  date     (pinned baseline)
//!       └──────────────────────────────┘
//! ```
//!
//! Text is positioned by baseline. Centering applies to title, author and
//! category only; tags flow from the cursor and the date is pinned to the
//! bottom margin.

use super::budget::{CanvasSpec, VerticalBudget};
use super::chips::place_chips;
use super::fit::{FitBounds, fit_block};
use super::measure::{LINE_HEIGHT, TextMeasurer};
use super::scene::{BlockKind, BlockReport, DrawOp, Scene};
use super::wrap::WrappedBlock;
use crate::types::LayoutInput;

pub const TITLE_MAX_FONT_SIZE: f32 = 30.0;
pub const AUTHOR_MAX_FONT_SIZE: f32 = 17.0;
pub const CATEGORY_MAX_FONT_SIZE: f32 = 17.0;
pub const DATE_MAX_FONT_SIZE: f32 = 14.0;

/// The category block never gets more than this much height to fit into.
pub const CATEGORY_HEIGHT_CAP: f32 = 100.0;

/// Output of a single block step.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockOutput {
    pub ops: Vec<DrawOp>,
    pub report: BlockReport,
    /// Cursor handed to the next block.
    pub cursor: f32,
}

/// Lay out `input` on the canvas described by `spec`.
pub fn compose<M: TextMeasurer + ?Sized>(
    input: &LayoutInput,
    spec: &CanvasSpec,
    measurer: &M,
) -> Scene {
    Compositor::new(spec, input.tags.len(), measurer).compose(input)
}

/// Holds what every block step needs: geometry, measurer, and the budgets.
pub struct Compositor<'a, M: ?Sized> {
    spec: &'a CanvasSpec,
    measurer: &'a M,
    raw: VerticalBudget,
    budget: VerticalBudget,
    overflow: f32,
}

impl<'a, M: TextMeasurer + ?Sized> Compositor<'a, M> {
    pub fn new(spec: &'a CanvasSpec, tag_count: usize, measurer: &'a M) -> Self {
        let raw = VerticalBudget::allocate(spec, tag_count);
        let (budget, overflow) = raw.clamp_to_floor();
        log::debug!("budget for {tag_count} tag(s): {raw:?}");
        if overflow > 0.0 {
            log::debug!("budget overdrawn by {overflow}px, clamped to zero");
        }
        Self {
            spec,
            measurer,
            raw,
            budget,
            overflow,
        }
    }

    pub fn compose(&self, input: &LayoutInput) -> Scene {
        let mut ops = Vec::new();
        let mut blocks = Vec::with_capacity(BlockKind::ORDER.len());
        let mut cursor = self.spec.margin_top;
        let mut author_size = AUTHOR_MAX_FONT_SIZE;
        let mut chips_bottom = None;

        for kind in BlockKind::ORDER {
            let out = match kind {
                BlockKind::Title => self.title(&input.title, cursor),
                BlockKind::Author => self.author(&input.author_label(), cursor),
                BlockKind::Category => {
                    self.category(&input.category_label(), author_size, cursor)
                }
                BlockKind::Tags => self.tags(&input.tags, cursor),
                BlockKind::Date => self.date(&input.date_label()),
            };
            match kind {
                BlockKind::Author => author_size = out.report.font_size,
                BlockKind::Tags if out.report.items > 0 => chips_bottom = Some(out.report.bottom),
                _ => {}
            }
            log::debug!(
                "{kind}: {}px, {} item(s), y {:.1}..{:.1}",
                out.report.font_size,
                out.report.items,
                out.report.top,
                out.report.bottom
            );
            cursor = out.cursor;
            ops.extend(out.ops);
            blocks.push(out.report);
        }

        // Every tag gets a chip; once the floor size is reached the stack may
        // run into the date line.
        let date_top = blocks
            .iter()
            .find(|b| b.kind == BlockKind::Date)
            .map_or(self.date_baseline(), |b| b.top);
        let spill = chips_bottom.map_or(0.0, |bottom| (bottom - date_top).max(0.0));
        if spill > 0.0 {
            log::debug!("tag chips run {spill:.1}px past the date line");
        }

        Scene {
            width: self.spec.width,
            height: self.spec.height,
            ops,
            blocks,
            budget: self.raw,
            overflow: self.overflow,
            spill,
        }
    }

    /// Baseline of the date line.
    pub fn date_baseline(&self) -> f32 {
        self.spec.content_bottom() - self.budget.date
    }

    pub fn title(&self, text: &str, cursor: f32) -> BlockOutput {
        let bounds = FitBounds::new(
            self.spec.available_width(),
            self.spec.available_height().min(self.budget.title),
            TITLE_MAX_FONT_SIZE,
        );
        let block = fit_block(text, BlockKind::Title.role(), &bounds, self.measurer);
        self.flow(
            BlockKind::Title,
            &block,
            Some(self.budget.title),
            cursor,
            self.spec.block_spacing,
        )
    }

    pub fn author(&self, text: &str, cursor: f32) -> BlockOutput {
        let bounds = FitBounds::new(
            self.spec.available_width(),
            self.spec.remaining(cursor).min(self.budget.author),
            AUTHOR_MAX_FONT_SIZE,
        );
        let block = fit_block(text, BlockKind::Author.role(), &bounds, self.measurer);
        self.flow(
            BlockKind::Author,
            &block,
            Some(self.budget.author),
            cursor,
            self.spec.block_spacing * 1.5,
        )
    }

    /// Category never renders larger than two pixels under the author.
    pub fn category(&self, text: &str, author_size: f32, cursor: f32) -> BlockOutput {
        let bounds = FitBounds::new(
            self.spec.available_width(),
            self.spec.remaining(cursor).min(CATEGORY_HEIGHT_CAP),
            CATEGORY_MAX_FONT_SIZE.min(author_size - 2.0),
        );
        let block = fit_block(text, BlockKind::Category.role(), &bounds, self.measurer);
        self.flow(
            BlockKind::Category,
            &block,
            Some(self.budget.category),
            cursor,
            self.spec.block_spacing,
        )
    }

    pub fn tags(&self, tags: &[String], cursor: f32) -> BlockOutput {
        if tags.is_empty() {
            return BlockOutput {
                ops: Vec::new(),
                report: BlockReport {
                    kind: BlockKind::Tags,
                    font_size: 0.0,
                    items: 0,
                    top: cursor,
                    bottom: cursor,
                },
                cursor,
            };
        }

        let max_height = self
            .spec
            .remaining(cursor)
            .min(self.budget.tags)
            .min(self.date_baseline() - cursor);
        let stack = place_chips(
            tags,
            self.spec.available_width(),
            max_height,
            cursor,
            self.spec,
            self.measurer,
        );
        let bottom = stack.chips.last().map_or(cursor, |c| c.bottom());

        BlockOutput {
            ops: stack.draw_ops(self.spec),
            report: BlockReport {
                kind: BlockKind::Tags,
                font_size: stack.face.size,
                items: stack.chips.len(),
                top: cursor,
                bottom,
            },
            cursor: stack.end_y,
        }
    }

    /// The date ignores the incoming cursor: its baseline is pinned. It fits
    /// against a single line at its ceiling, so it only shrinks to avoid
    /// wrapping.
    pub fn date(&self, text: &str) -> BlockOutput {
        let bounds = FitBounds::new(
            self.spec.available_width(),
            DATE_MAX_FONT_SIZE * LINE_HEIGHT,
            DATE_MAX_FONT_SIZE,
        );
        let block = fit_block(text, BlockKind::Date.role(), &bounds, self.measurer);
        self.flow(BlockKind::Date, &block, None, self.date_baseline(), 0.0)
    }

    /// Draw `block` line by line from `cursor`, optionally centered within
    /// `center_in`, and hand back `last_baseline + gap` as the next cursor.
    fn flow(
        &self,
        kind: BlockKind,
        block: &WrappedBlock,
        center_in: Option<f32>,
        cursor: f32,
        gap: f32,
    ) -> BlockOutput {
        let face = block.face;
        let advance = face.line_advance();

        if block.is_empty() {
            return BlockOutput {
                ops: Vec::new(),
                report: BlockReport {
                    kind,
                    font_size: face.size,
                    items: 0,
                    top: cursor,
                    bottom: cursor,
                },
                cursor: cursor + gap,
            };
        }

        let mut baseline = cursor;
        if let Some(budget) = center_in {
            let height = block.height();
            if height < budget {
                baseline += (budget - height) / 2.0;
            }
        }

        let first = baseline;
        let mut ops = Vec::with_capacity(block.lines.len());
        for line in &block.lines {
            ops.push(DrawOp::Text {
                face,
                x: self.spec.margin_left,
                baseline,
                text: line.clone(),
            });
            baseline += advance;
        }
        let last = baseline - advance;

        BlockOutput {
            ops,
            report: BlockReport {
                kind,
                font_size: face.size,
                items: block.lines.len(),
                top: first - face.size,
                bottom: last + (advance - face.size),
            },
            cursor: last + gap,
        }
    }
}
