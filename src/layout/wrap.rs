//! Per-character line wrapping.
//!
//! Breaks are chosen character by character rather than at whitespace, so
//! scripts without word separators (Japanese, Chinese) wrap at the pixel
//! limit instead of overflowing as one giant "word".

use super::measure::{Face, TextMeasurer};

/// Wrap `text` into display lines no wider than `max_width` at `face`.
///
/// - Empty text yields no lines.
/// - A character that is wider than `max_width` on its own still becomes a
///   one-character line; content is never dropped.
/// - Concatenating the returned lines reproduces `text` exactly.
pub fn wrap<M: TextMeasurer + ?Sized>(
    text: &str,
    max_width: f32,
    face: Face,
    measurer: &M,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        let was_empty = current.is_empty();
        current.push(ch);
        if measurer.width(face, &current) <= max_width {
            continue;
        }
        if was_empty {
            lines.push(std::mem::take(&mut current));
        } else {
            current.pop();
            lines.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// One text wrapped at one size. Produced fresh per render, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedBlock {
    pub face: Face,
    pub lines: Vec<String>,
}

impl WrappedBlock {
    pub fn new<M: TextMeasurer + ?Sized>(
        text: &str,
        max_width: f32,
        face: Face,
        measurer: &M,
    ) -> Self {
        Self {
            face,
            lines: wrap(text, max_width, face, measurer),
        }
    }

    /// `lines × size × 1.2`
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.face.line_advance()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
