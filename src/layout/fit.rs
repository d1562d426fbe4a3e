//! Auto-fit: the largest font size whose wrapped text fits a height budget.

use super::measure::{Face, FontRole, TextMeasurer};
use super::wrap::WrappedBlock;

/// Smallest size any block is allowed to shrink to.
pub const MIN_FONT_SIZE: f32 = 6.0;

/// Box and size range for one auto-fit search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBounds {
    pub max_width: f32,
    pub max_height: f32,
    pub max_size: f32,
    pub min_size: f32,
}

impl FitBounds {
    pub fn new(max_width: f32, max_height: f32, max_size: f32) -> Self {
        Self {
            max_width,
            max_height,
            max_size,
            min_size: MIN_FONT_SIZE,
        }
    }

    /// Ceiling actually searched from; never below the floor.
    fn ceiling(&self) -> f32 {
        self.max_size.max(self.min_size)
    }
}

/// Scan sizes from the ceiling down in 1px steps and return the first whose
/// wrapped height is within `max_height`.
///
/// When nothing in range fits, the minimum size is returned and the caller
/// lives with the overflow. That is policy, not an error.
pub fn auto_fit<M: TextMeasurer + ?Sized>(
    text: &str,
    role: FontRole,
    bounds: &FitBounds,
    measurer: &M,
) -> f32 {
    let ceiling = bounds.ceiling();
    let steps = (ceiling - bounds.min_size).floor() as usize;

    for step in 0..=steps {
        let size = ceiling - step as f32;
        let block = WrappedBlock::new(text, bounds.max_width, Face::new(role, size), measurer);
        if block.height() <= bounds.max_height {
            return size;
        }
    }
    bounds.min_size
}

/// Auto-fit, then wrap at the chosen size.
pub fn fit_block<M: TextMeasurer + ?Sized>(
    text: &str,
    role: FontRole,
    bounds: &FitBounds,
    measurer: &M,
) -> WrappedBlock {
    let size = auto_fit(text, role, bounds, measurer);
    WrappedBlock::new(text, bounds.max_width, Face::new(role, size), measurer)
}
