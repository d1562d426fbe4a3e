//! Shared test utilities for the simple-card test suite.
//!
//! Raster tests need a real TrueType font. None ships with the crate, so
//! [`system_fonts`] looks for a common system face and returns `None` when
//! there is nothing installed. Callers print a skip notice and return early:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let Some(fonts) = system_fonts() else {
//!     eprintln!("skipping: no TrueType font installed");
//!     return;
//! };
//! let scene = compose(&sample_input(), &CanvasSpec::STANDARD, &*fonts);
//! ```
//!
//! On machines that are expected to have fonts (CI), set `CARD_REQUIRE_FONTS=1`
//! and a missing font fails the test instead of skipping it.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use time::macros::datetime;

use crate::imaging::FontCache;
use crate::types::LayoutInput;

// =========================================================================
// Fonts
// =========================================================================

/// (bold, regular) pairs, most CJK-capable first.
const CANDIDATES: &[(&str, &str)] = &[
    (
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ),
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ),
    (
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    ),
    (
        "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
        "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    ),
    (
        "/Library/Fonts/Arial Bold.ttf",
        "/Library/Fonts/Arial.ttf",
    ),
];

/// First installed (bold, regular) pair.
pub fn system_font_paths() -> Option<(PathBuf, PathBuf)> {
    CANDIDATES
        .iter()
        .map(|(bold, regular)| (PathBuf::from(bold), PathBuf::from(regular)))
        .find(|(bold, regular)| bold.is_file() && regular.is_file())
}

/// Turns a missing font from a skip into a panic.
pub const REQUIRE_FONTS_ENV: &str = "CARD_REQUIRE_FONTS";

/// Parsed system fonts, loaded once per test binary.
///
/// Panics instead of returning `None` when [`REQUIRE_FONTS_ENV`] is set.
pub fn system_fonts() -> Option<Arc<FontCache>> {
    static FONTS: OnceLock<Option<Arc<FontCache>>> = OnceLock::new();
    let fonts = FONTS
        .get_or_init(|| {
            let (bold, regular) = system_font_paths()?;
            FontCache::load(&bold, &regular).ok().map(Arc::new)
        })
        .clone();
    require_fonts(fonts, fonts_required(std::env::var_os(REQUIRE_FONTS_ENV)))
}

/// Empty and `0` count as unset.
fn fonts_required(value: Option<OsString>) -> bool {
    value.is_some_and(|v| !v.is_empty() && v != "0")
}

fn require_fonts(fonts: Option<Arc<FontCache>>, required: bool) -> Option<Arc<FontCache>> {
    if fonts.is_none() && required {
        let tried: Vec<&str> = CANDIDATES.iter().map(|(bold, _)| *bold).collect();
        panic!(
            "{REQUIRE_FONTS_ENV} is set but no usable font pair was found (tried {})",
            tried.join(", ")
        );
    }
    fonts
}

// =========================================================================
// Inputs
// =========================================================================

/// A typical article: short title, two tags.
pub fn sample_input() -> LayoutInput {
    LayoutInput {
        title: "Hello World".to_string(),
        author: "Alice".to_string(),
        category: "News".to_string(),
        tags: vec!["rust".to_string(), "imaging".to_string()],
        created_at: datetime!(2024-05-01 09:30 UTC),
    }
}

/// `sample_input` with a different title.
pub fn input_titled(title: &str) -> LayoutInput {
    LayoutInput {
        title: title.to_string(),
        ..sample_input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_flag_values() {
        assert!(!fonts_required(None));
        assert!(!fonts_required(Some(OsString::new())));
        assert!(!fonts_required(Some(OsString::from("0"))));
        assert!(fonts_required(Some(OsString::from("1"))));
        assert!(fonts_required(Some(OsString::from("yes"))));
    }

    #[test]
    fn missing_fonts_skip_when_not_required() {
        assert!(require_fonts(None, false).is_none());
    }

    #[test]
    #[should_panic(expected = "CARD_REQUIRE_FONTS is set")]
    fn missing_fonts_fail_when_required() {
        require_fonts(None, true);
    }
}
