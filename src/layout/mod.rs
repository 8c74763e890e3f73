//! Vertical layout engine.
//!
//! - [`LineHeightsManager`]: per-line heights with custom overrides.
//! - [`LinesLayout`]: lines plus whitespace zones, viewport queries.

pub mod identifiers;
pub mod line_heights;
pub mod lines_layout;
pub mod types;
pub mod viewport;
pub mod whitespace;

pub use identifiers::{DecorationId, InvalidDecorationId, WhitespaceId};
pub use line_heights::{
    CustomLineHeightData, CustomLineHeightEntry, LineHeightsManager, MIN_LINE_HEIGHT,
};
pub use lines_layout::{LinesLayout, BIG_NUMBERS_STEP};
pub use types::{DirtyFrom, LineNumber, Pixels};
pub use viewport::{LinesViewportData, WhitespaceViewportData};
pub use whitespace::{LineHeightAccessor, Whitespace, WhitespaceAccessor};
