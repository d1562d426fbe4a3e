//! Pixels: fonts in, PNG out.
//!
//! | Stage | Crate / function |
//! |---|---|
//! | **Fonts** | `ab_glyph::FontVec`, shared via [`FontCache`] |
//! | **Paint** | `imageproc::drawing` text, rects and circles |
//! | **Persist** | `image` PNG encoder + `tempfile` atomic rename |
//!
//! The module is split into:
//! - **Fonts**: parsing and the production [`TextMeasurer`](crate::layout::TextMeasurer)
//! - **Painter**: [`paint`] walks a [`Scene`](crate::layout::Scene)'s draw ops
//! - **Persist**: unique file names and PNG output

pub mod fonts;
pub mod painter;
pub mod persist;

pub use fonts::{FontCache, FontError};
pub use painter::{Palette, paint};
pub use persist::{EncodeError, save_png, unique_file_name};
