//! Parsed font assets.
//!
//! A [`FontCache`] holds the two faces the thumbnail uses (bold title,
//! regular body), parsed once with `ab_glyph`. It is immutable after
//! construction, so one instance can sit behind an `Arc` and serve any number
//! of concurrent renders without locking.
//!
//! Sizes are pixels per em: a 30px face has a 30px em square, the same as a
//! 30pt size at 72 DPI.

use crate::layout::{Extent, Face, FontRole, TextMeasurer};
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Failed to read font {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Not a usable TrueType/OpenType font: {}", path.display())]
    Invalid { path: PathBuf },
}

/// Bold + regular faces, parsed and ready for measuring and drawing.
pub struct FontCache {
    title: FontVec,
    body: FontVec,
}

impl fmt::Debug for FontCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontCache")
            .field("title_glyphs", &self.title.glyph_count())
            .field("body_glyphs", &self.body.glyph_count())
            .finish()
    }
}

impl FontCache {
    /// Read and parse both font files.
    pub fn load(title: &Path, body: &Path) -> Result<Self, FontError> {
        Ok(Self {
            title: load_font(title)?,
            body: load_font(body)?,
        })
    }

    /// Parse fonts already in memory (embedded assets, tests).
    pub fn from_bytes(title: Vec<u8>, body: Vec<u8>) -> Result<Self, FontError> {
        let parse = |data: Vec<u8>, label: &str| {
            FontVec::try_from_vec(data).map_err(|_| FontError::Invalid {
                path: PathBuf::from(label),
            })
        };
        Ok(Self {
            title: parse(title, "<title font bytes>")?,
            body: parse(body, "<body font bytes>")?,
        })
    }

    pub fn font(&self, role: FontRole) -> &FontVec {
        match role {
            FontRole::Title => &self.title,
            FontRole::Body => &self.body,
        }
    }

    /// `ab_glyph` scale for an em size.
    pub fn scale(&self, face: Face) -> PxScale {
        em_scale(self.font(face.role), face.size)
    }

    /// Distance from the top of the line box to the baseline.
    pub fn ascent(&self, face: Face) -> f32 {
        self.font(face.role).as_scaled(self.scale(face)).ascent()
    }
}

fn load_font(path: &Path) -> Result<FontVec, FontError> {
    let data = std::fs::read(path).map_err(|source| FontError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FontVec::try_from_vec(data).map_err(|_| FontError::Invalid {
        path: path.to_path_buf(),
    })
}

/// `PxScale` is the ascent-to-descent height; convert from an em size.
fn em_scale(font: &impl Font, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units) if units > 0.0 => PxScale::from(size * font.height_unscaled() / units),
        _ => PxScale::from(size),
    }
}

impl TextMeasurer for FontCache {
    /// Sum of advances plus pair kerning. Height is the ascent-to-descent
    /// line box at this size.
    fn measure(&self, face: Face, text: &str) -> Extent {
        let scaled = self.font(face.role).as_scaled(self.scale(face));
        let mut width = 0.0f32;
        let mut prev = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }

        Extent {
            width,
            height: scaled.height(),
        }
    }
}
