//! Viewport query results

use serde::Serialize;

use super::identifiers::WhitespaceId;
use super::types::{LineNumber, Pixels};

/// Lines visible between two vertical offsets.
///
/// Computed by `LinesLayout::lines_viewport_data`.
///
/// # Invariants
/// - `start_line_number <= end_line_number`
/// - `relative_vertical_offset.len() == end_line_number - start_line_number + 1`
///   (empty for an empty document)
/// - `relative_vertical_offset` is strictly increasing (every line is at
///   least `MIN_LINE_HEIGHT` tall)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinesViewportData {
    /// Amount subtracted from every relative offset to keep numbers small.
    pub big_numbers_delta: Pixels,
    /// First line (partially) visible.
    pub start_line_number: LineNumber,
    /// Last line (partially) visible.
    pub end_line_number: LineNumber,
    /// Top of each visible line, minus `big_numbers_delta`.
    pub relative_vertical_offset: Vec<Pixels>,
    /// Line closest to the vertical centre of the viewport.
    pub centered_line_number: LineNumber,
    /// First line not clipped at the top.
    pub completely_visible_start_line_number: LineNumber,
    /// Last line not clipped at the bottom.
    pub completely_visible_end_line_number: LineNumber,
    /// Default line height at the time of the query.
    pub line_height: Pixels,
}

impl LinesViewportData {
    /// Number of visible lines.
    pub fn len(&self) -> usize {
        self.relative_vertical_offset.len()
    }

    /// Check if no line is visible.
    pub fn is_empty(&self) -> bool {
        self.relative_vertical_offset.is_empty()
    }

    /// Check if `line_number` is (at least partially) visible.
    pub fn contains(&self, line_number: LineNumber) -> bool {
        !self.is_empty()
            && self.start_line_number <= line_number
            && line_number <= self.end_line_number
    }

    /// Relative top offset of a visible line.
    pub fn relative_offset_for_line(&self, line_number: LineNumber) -> Option<Pixels> {
        if !self.contains(line_number) {
            return None;
        }
        let index = (line_number - self.start_line_number) as usize;
        self.relative_vertical_offset.get(index).copied()
    }

    /// Iterate over visible line numbers.
    pub fn line_numbers(&self) -> impl Iterator<Item = LineNumber> {
        let end = if self.is_empty() {
            self.start_line_number
        } else {
            self.end_line_number + 1
        };
        self.start_line_number..end
    }
}

/// A whitespace zone positioned in absolute vertical offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WhitespaceViewportData {
    pub id: WhitespaceId,
    pub after_line_number: LineNumber,
    /// Absolute top of the zone, padding included.
    pub vertical_offset: Pixels,
    pub height: Pixels,
}
