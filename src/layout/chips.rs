//! Tag chips: one rounded rectangle per tag, stacked top to bottom.
//!
//! All chips share one font size. It is fitted once against a short probe
//! string so a single long tag name cannot shrink every other chip.

use super::budget::CanvasSpec;
use super::fit::{FitBounds, auto_fit};
use super::measure::{Face, FontRole, TextMeasurer};
use super::scene::DrawOp;

/// Three full-width glyphs: a worst-case stand-in for a short tag.
pub const CHIP_PROBE: &str = "あああ";

/// Font size ceiling for chip labels.
pub const CHIP_MAX_FONT_SIZE: f32 = 14.0;

/// One positioned chip.
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    /// Display label, `#` + tag name.
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text_width: f32,
}

impl Chip {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// The chips of one render plus where the cursor ends up.
#[derive(Debug, Clone, PartialEq)]
pub struct ChipStack {
    pub face: Face,
    pub chips: Vec<Chip>,
    pub end_y: f32,
}

impl ChipStack {
    /// Background then label for each chip, in stacking order.
    pub fn draw_ops(&self, spec: &CanvasSpec) -> Vec<DrawOp> {
        let mut ops = Vec::with_capacity(self.chips.len() * 2);
        for chip in &self.chips {
            ops.push(DrawOp::Chip {
                x: chip.x,
                y: chip.y,
                width: chip.width,
                height: chip.height,
                radius: spec.chip_radius,
            });
            ops.push(DrawOp::Text {
                face: self.face,
                x: chip.x + spec.chip_padding,
                baseline: chip.y + self.face.size,
                text: chip.label.clone(),
            });
        }
        ops
    }
}

/// Height available to a single chip's label:
/// `(max_height − spacing − (n − 1)(chip_spacing + padding)) / n`.
pub fn per_chip_height(spec: &CanvasSpec, tag_count: usize, max_height: f32) -> f32 {
    if tag_count == 0 {
        return max_height;
    }
    let gaps = (tag_count - 1) as f32 * (spec.chip_spacing + spec.chip_padding);
    (max_height - spec.block_spacing - gaps) / tag_count as f32
}

/// Lay out `tags` as chips starting at `start_y`, within `max_height`.
///
/// Labels are single-line: a chip is `text_width + 2 × padding` wide and
/// `font_size + padding` tall. Empty tag names still produce a chip.
pub fn place_chips<M: TextMeasurer + ?Sized>(
    tags: &[String],
    available_width: f32,
    max_height: f32,
    start_y: f32,
    spec: &CanvasSpec,
    measurer: &M,
) -> ChipStack {
    let bounds = FitBounds::new(
        available_width - 2.0 * spec.chip_padding,
        per_chip_height(spec, tags.len(), max_height),
        CHIP_MAX_FONT_SIZE,
    );
    let size = auto_fit(CHIP_PROBE, FontRole::Body, &bounds, measurer);
    let face = Face::new(FontRole::Body, size);

    let mut cursor = start_y;
    let mut chips = Vec::with_capacity(tags.len());
    for tag in tags {
        let label = format!("#{tag}");
        let text_width = measurer.width(face, &label);
        let chip = Chip {
            x: spec.margin_left,
            y: cursor,
            width: text_width + 2.0 * spec.chip_padding,
            height: size + spec.chip_padding,
            text_width,
            label,
        };
        cursor = chip.bottom() + spec.chip_spacing;
        chips.push(chip);
    }

    ChipStack {
        face,
        chips,
        end_y: cursor,
    }
}
