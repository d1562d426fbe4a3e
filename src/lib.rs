//! # Simple Card
//!
//! Renders the 300×300 PNG thumbnail a blog shows next to each article: the
//! title, author, category, tag chips and creation date, auto-sized to fit.
//!
//! # Architecture: Layout, Then Pixels
//!
//! A render is two independent stages:
//!
//! ```text
//! 1. Layout    LayoutInput  →  Scene       (pure geometry, any TextMeasurer)
//! 2. Raster    Scene        →  PNG file    (ab_glyph + imageproc, atomic write)
//! ```
//!
//! The split keeps every sizing and positioning rule testable with a mock
//! measurer and no font files. The raster stage only executes draw ops.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`layout`] | Measuring, wrapping, auto-fit, vertical budget, chips, the compositor |
//! | [`imaging`] | Font loading, painting a scene, PNG output |
//! | [`render`] | [`render::Thumbnailer`]: article in, stored file + public URL out |
//! | [`upload`] | Fire-and-forget mirroring of finished files to a [`upload::RemoteStore`] |
//! | [`batch`] | Parallel rendering of a JSON array of articles |
//! | [`config`] | `card.toml` loading, validation, merging with CLI overrides |
//! | [`types`] | [`types::LayoutInput`] and [`types::RenderedThumbnail`] |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Per-Character Wrapping
//!
//! Titles are frequently Japanese, which has no spaces to break on. Lines are
//! broken at any character boundary, so a wrapped Latin title may split
//! inside a word. Concatenating the lines always gives back the input.
//!
//! ## Fixed Block Order, Single Pass
//!
//! Blocks are laid out top to bottom and never revisited. Each block's budget
//! is decided up front from the canvas size and tag count; the date is pinned
//! to the bottom margin regardless of what is above it. When the budgets add
//! up to more than the canvas, negative shares are clamped to zero and the
//! deficit is reported as `overflow`. Every tag still gets a chip; chips at
//! the floor size can run into the date line, and the scene reports that
//! distance as `spill`.
//!
//! ## Shared, Immutable Fonts
//!
//! Fonts are parsed once into a [`imaging::FontCache`] and shared through an
//! `Arc`. Nothing in a render mutates shared state, so the batch command can
//! run renders on every core without locks.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod output;
pub mod render;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;
