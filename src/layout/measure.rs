//! Text measurement seam.
//!
//! The [`TextMeasurer`] trait is the only thing the layout code knows about
//! fonts: give it a [`Face`] (role + pixel size) and a string, get back the
//! rendered [`Extent`]. The production implementation is
//! [`FontCache`](crate::imaging::FontCache), backed by `ab_glyph`.
//!
//! Keeping measurement behind a trait lets every layout rule be tested with a
//! fixed-advance mock instead of a real TrueType file.

use serde::Serialize;
use std::fmt;

/// Line-height factor applied to every wrapped block.
pub const LINE_HEIGHT: f32 = 1.2;

/// Semantic font role. Each role maps to one physical font asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontRole {
    /// Bold face used for the article title.
    Title,
    /// Regular face used for author, category, tags and date.
    Body,
}

impl fmt::Display for FontRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontRole::Title => write!(f, "title"),
            FontRole::Body => write!(f, "body"),
        }
    }
}

/// A font role at a concrete pixel size (pixels per em).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub role: FontRole,
    pub size: f32,
}

impl Face {
    pub fn new(role: FontRole, size: f32) -> Self {
        Self { role, size }
    }

    /// Vertical advance of one wrapped line at this size.
    pub fn line_advance(self) -> f32 {
        self.size * LINE_HEIGHT
    }
}

/// Pixel extent of a measured string.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

/// Measures rendered text. Implementations must be deterministic: the same
/// face and text always produce the same extent.
pub trait TextMeasurer {
    fn measure(&self, face: Face, text: &str) -> Extent;

    /// Width-only shorthand used by the wrapper.
    fn width(&self, face: Face, text: &str) -> f32 {
        self.measure(face, text).width
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn measure(&self, face: Face, text: &str) -> Extent {
        (**self).measure(face, text)
    }
}
