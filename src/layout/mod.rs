//! Layout engine: pure geometry, no pixels.
//!
//! | Step | Module |
//! |---|---|
//! | **Measure** | [`measure`]: [`TextMeasurer`] trait, font roles and faces |
//! | **Wrap** | [`wrap`]: per-character line breaking |
//! | **Fit** | [`fit`]: largest size that fits a height budget |
//! | **Allocate** | [`budget`]: canvas constants and per-block budgets |
//! | **Chips** | [`chips`]: tag chip stacking |
//! | **Compose** | [`compose`]: fixed block pipeline producing a [`Scene`] |
//!
//! Everything here is deterministic and testable with a mock measurer.

pub mod budget;
pub mod chips;
pub mod compose;
pub mod fit;
pub mod measure;
pub mod scene;
pub mod wrap;

pub use budget::{CanvasSpec, VerticalBudget};
pub use compose::compose;
pub use measure::{Extent, Face, FontRole, LINE_HEIGHT, TextMeasurer};
pub use scene::{BlockKind, BlockReport, DrawOp, Scene};
pub use wrap::{WrappedBlock, wrap};
