//! Canvas geometry and vertical space allocation.
//!
//! The allocation is open-loop: it is computed once from the canvas and the
//! tag count, before any text is measured. The category block receives
//! whatever the other blocks and the spacing leave over, which can be negative.
//!
//! ```text
//! available = height − margin_top − margin_bottom          (240)
//! title     = 110
//! author    = available / 5                                (48)
//! tags      = available / 2                                (120)
//! date      = 0                                            (pinned to the bottom margin)
//! category  = available − title − author − tags − date
//!             − 3 × spacing − max(n − 1, 0) × chip_spacing
//! ```

/// Fixed canvas geometry. There is exactly one template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    pub margin_top: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    /// Space between consecutive blocks.
    pub block_spacing: f32,
    /// Space between consecutive tag chips.
    pub chip_spacing: f32,
    /// Padding inside a tag chip.
    pub chip_padding: f32,
    pub chip_radius: f32,
}

/// Vertical budget reserved for the title block.
pub const TITLE_BUDGET: f32 = 110.0;

impl CanvasSpec {
    pub const STANDARD: CanvasSpec = CanvasSpec {
        width: 300,
        height: 300,
        margin_top: 40.0,
        margin_left: 20.0,
        margin_right: 20.0,
        margin_bottom: 20.0,
        block_spacing: 20.0,
        chip_spacing: 7.0,
        chip_padding: 10.0,
        chip_radius: 5.0,
    };

    pub fn available_width(&self) -> f32 {
        self.width as f32 - self.margin_left - self.margin_right
    }

    pub fn available_height(&self) -> f32 {
        self.height as f32 - self.margin_top - self.margin_bottom
    }

    /// Lowest y a block may reach (top of the bottom margin).
    pub fn content_bottom(&self) -> f32 {
        self.height as f32 - self.margin_bottom
    }

    /// Space left between `cursor` and the bottom margin.
    pub fn remaining(&self, cursor: f32) -> f32 {
        self.content_bottom() - cursor
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Per-block vertical budgets in pixels.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct VerticalBudget {
    pub title: f32,
    pub author: f32,
    pub tags: f32,
    pub category: f32,
    pub date: f32,
}

impl VerticalBudget {
    /// Raw allocation. `category` is the signed remainder.
    pub fn allocate(spec: &CanvasSpec, tag_count: usize) -> Self {
        let available = spec.available_height();
        let title = TITLE_BUDGET;
        let author = available / 5.0;
        let tags = available / 2.0;
        let date = 0.0;
        let category = available
            - title
            - author
            - tags
            - date
            - fixed_spacing(spec, tag_count);

        Self {
            title,
            author,
            tags,
            category,
            date,
        }
    }

    /// Sum of all budgets plus the spacing the allocator accounted for.
    /// Equals `spec.available_height()` for any raw allocation.
    pub fn accounted(&self, spec: &CanvasSpec, tag_count: usize) -> f32 {
        self.title
            + self.author
            + self.tags
            + self.category
            + self.date
            + fixed_spacing(spec, tag_count)
    }

    /// Floor every budget at zero. Returns the floored budgets and the total
    /// deficit that was clamped away.
    pub fn clamp_to_floor(self) -> (Self, f32) {
        let mut overflow = 0.0;
        let mut floor = |v: f32| {
            if v < 0.0 {
                overflow -= v;
                0.0
            } else {
                v
            }
        };
        let clamped = Self {
            title: floor(self.title),
            author: floor(self.author),
            tags: floor(self.tags),
            category: floor(self.category),
            date: floor(self.date),
        };
        (clamped, overflow)
    }
}

/// `3 × spacing + max(n − 1, 0) × chip_spacing`
fn fixed_spacing(spec: &CanvasSpec, tag_count: usize) -> f32 {
    3.0 * spec.block_spacing + tag_count.saturating_sub(1) as f32 * spec.chip_spacing
}
