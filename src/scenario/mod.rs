//! Scenario harness: build a layout from JSON, replay edits, report a viewport.
//!
//! A scenario describes a document (line count, line heights, whitespace
//! zones), an ordered list of edits and one viewport to query. Running it
//! against a [`ResolvedConfig`] produces a serializable [`ScenarioReport`].
//!
//! ```json
//! {
//!   "line_count": 100,
//!   "custom_line_heights": [
//!     { "decoration_id": "heading", "start_line_number": 1, "end_line_number": 1, "line_height": 40 }
//!   ],
//!   "whitespaces": [{ "after_line_number": 5, "height": 30 }],
//!   "edits": [{ "op": "insert_lines", "from": 3, "to": 4 }],
//!   "viewport": { "top": 0, "bottom": 200 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::config::ResolvedConfig;
use crate::layout::{
    CustomLineHeightData, DecorationId, LineHeightAccessor, LineNumber, LinesLayout,
    LinesViewportData, Pixels, WhitespaceId, WhitespaceViewportData,
};

/// Errors raised while loading a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Scenario file could not be read.
    #[error("Failed to read scenario at {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Scenario is not valid JSON or does not match the schema.
    #[error("Invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A whitespace zone to insert before edits are replayed.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioWhitespace {
    pub after_line_number: LineNumber,
    #[serde(default)]
    pub ordinal: i32,
    pub height: Pixels,
    #[serde(default)]
    pub min_width: Pixels,
}

/// One step replayed against the layout, in order.
///
/// Whitespace edits address zones by their position in
/// [`Scenario::whitespaces`]; out-of-range positions are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Edit {
    InsertLines {
        from: LineNumber,
        to: LineNumber,
    },
    DeleteLines {
        from: LineNumber,
        to: LineNumber,
    },
    SetLineHeight {
        decoration_id: DecorationId,
        start_line_number: LineNumber,
        end_line_number: LineNumber,
        line_height: Pixels,
    },
    RemoveLineHeight {
        decoration_id: DecorationId,
    },
    ChangeWhitespace {
        index: usize,
        after_line_number: LineNumber,
        height: Pixels,
    },
    RemoveWhitespace {
        index: usize,
    },
    Flush {
        line_count: LineNumber,
        #[serde(default)]
        custom_line_heights: Vec<CustomLineHeightData>,
    },
}

impl Edit {
    fn is_line_height_edit(&self) -> bool {
        matches!(self, Edit::SetLineHeight { .. } | Edit::RemoveLineHeight { .. })
    }
}

/// Vertical range to report on.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ViewportRange {
    pub top: Pixels,
    pub bottom: Pixels,
}

/// A complete layout scenario.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub line_count: LineNumber,
    /// Falls back to the configured default line height.
    #[serde(default)]
    pub line_height: Option<Pixels>,
    #[serde(default)]
    pub padding_top: Option<Pixels>,
    #[serde(default)]
    pub padding_bottom: Option<Pixels>,
    #[serde(default)]
    pub custom_line_heights: Vec<CustomLineHeightData>,
    #[serde(default)]
    pub whitespaces: Vec<ScenarioWhitespace>,
    #[serde(default)]
    pub edits: Vec<Edit>,
    pub viewport: ViewportRange,
}

/// Everything a renderer needs after the scenario ran.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScenarioReport {
    pub line_count: LineNumber,
    pub default_line_height: Pixels,
    pub lines_total_height: Pixels,
    pub whitespaces_total_height: Pixels,
    pub whitespace_min_width: Pixels,
    pub viewport: ViewportRange,
    pub lines: LinesViewportData,
    pub whitespaces: Vec<WhitespaceViewportData>,
}

impl Scenario {
    /// Parse a scenario from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a scenario file.
    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Build the layout this scenario describes and replay its edits.
    pub fn build(&self, config: &ResolvedConfig) -> LinesLayout {
        let mut layout = LinesLayout::new(
            self.line_count,
            self.line_height.unwrap_or(config.default_line_height),
            self.padding_top.unwrap_or(config.padding_top),
            self.padding_bottom.unwrap_or(config.padding_bottom),
            &self.custom_line_heights,
        );

        let mut whitespace_ids: Vec<WhitespaceId> = Vec::with_capacity(self.whitespaces.len());
        layout.change_whitespace(|accessor| {
            whitespace_ids.extend(self.whitespaces.iter().map(|zone| {
                accessor.insert_whitespace(zone.after_line_number, zone.ordinal, zone.height, zone.min_width)
            }));
        });

        let mut edits = self.edits.iter().peekable();
        while let Some(edit) = edits.next() {
            match edit {
                Edit::InsertLines { from, to } => layout.on_lines_inserted(*from, *to),
                Edit::DeleteLines { from, to } => layout.on_lines_deleted(*from, *to),
                Edit::SetLineHeight { .. } | Edit::RemoveLineHeight { .. } => {
                    // Consecutive line height edits share one commit.
                    layout.change_line_heights(|accessor| {
                        apply_line_height_edit(accessor, edit);
                        while let Some(next) = edits.next_if(|next| next.is_line_height_edit()) {
                            apply_line_height_edit(accessor, next);
                        }
                    });
                }
                Edit::ChangeWhitespace {
                    index,
                    after_line_number,
                    height,
                } => {
                    if let Some(&id) = whitespace_ids.get(*index) {
                        layout.change_whitespace(|accessor| {
                            accessor.change_one_whitespace(id, *after_line_number, *height);
                        });
                    }
                }
                Edit::RemoveWhitespace { index } => {
                    if let Some(&id) = whitespace_ids.get(*index) {
                        layout.change_whitespace(|accessor| accessor.remove_whitespace(id));
                    }
                }
                Edit::Flush {
                    line_count,
                    custom_line_heights,
                } => layout.on_flushed(*line_count, custom_line_heights),
            }
        }
        debug!(
            line_count = layout.line_count(),
            edits = self.edits.len(),
            "scenario layout built"
        );
        layout
    }

    /// Build the layout and query the viewport.
    pub fn run(&self, config: &ResolvedConfig) -> ScenarioReport {
        let mut layout = self.build(config);
        let ViewportRange { top, bottom } = self.viewport;
        ScenarioReport {
            line_count: layout.line_count(),
            default_line_height: layout.default_line_height(),
            lines_total_height: layout.lines_total_height(),
            whitespaces_total_height: layout.whitespaces_total_height(),
            whitespace_min_width: layout.whitespace_min_width(),
            viewport: self.viewport,
            lines: layout.lines_viewport_data(top, bottom),
            whitespaces: layout.whitespace_viewport_data(top, bottom),
        }
    }
}

fn apply_line_height_edit(accessor: &mut dyn LineHeightAccessor, edit: &Edit) {
    match edit {
        Edit::SetLineHeight {
            decoration_id,
            start_line_number,
            end_line_number,
            line_height,
        } => accessor.insert_or_change_custom_line_height(
            decoration_id,
            *start_line_number,
            *end_line_number,
            *line_height,
        ),
        Edit::RemoveLineHeight { decoration_id } => accessor.remove_custom_line_height(decoration_id),
        _ => {}
    }
}
