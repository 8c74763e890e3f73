//! LinesLayout - vertical metrics of lines interleaved with whitespace zones
//!
//! Single source of truth for where every line and every whitespace zone
//! sits vertically, and the viewport query surface consumed by a renderer.
//!
//! # Composition
//!
//! - Line heights come from a [`LineHeightsManager`] (default height plus
//!   custom overrides).
//! - Whitespace zones live in a vector sorted by `(after_line_number, ordinal)`
//!   with a lazily extended prefix sum over their heights, invalidated by a
//!   [`DirtyFrom`] watermark.
//!
//! # Mutation
//!
//! Line heights and whitespaces change only inside
//! [`change_line_heights`](LinesLayout::change_line_heights) and
//! [`change_whitespace`](LinesLayout::change_whitespace). Both hand the
//! callback a batch accessor whose `Drop` commits exactly once, including
//! when the callback unwinds.
//!
//! # Totality
//!
//! No query fails: out-of-range line numbers clamp, unknown ids are ignored
//! and index accessors return `None`.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
use tracing::{debug, trace};

use super::identifiers::{DecorationId, WhitespaceId};
use super::line_heights::{CustomLineHeightData, LineHeightsManager};
use super::types::{DirtyFrom, LineNumber, Pixels};
use super::viewport::{LinesViewportData, WhitespaceViewportData};
use super::whitespace::{
    LineHeightAccessor, PendingChange, PendingChanges, StagedChanges, Whitespace,
    WhitespaceAccessor,
};

static INSTANCE_COUNT: AtomicU32 = AtomicU32::new(0);

/// Relative offsets are rebased every this many pixels.
pub const BIG_NUMBERS_STEP: Pixels = 500_000;

/// Vertical layout of a document's lines and whitespace zones.
#[derive(Debug, Clone)]
pub struct LinesLayout {
    instance_id: u32,
    pending_changes: PendingChanges,
    last_whitespace_id: u32,
    /// Sorted by `(after_line_number, ordinal)`.
    whitespaces: Vec<Whitespace>,
    prefix_sum_dirty: DirtyFrom,
    /// `None` until computed after the last insert/remove.
    min_width: Option<Pixels>,
    line_count: LineNumber,
    padding_top: Pixels,
    padding_bottom: Pixels,
    line_heights: LineHeightsManager,
}

impl LinesLayout {
    /// Create a layout for `line_count` lines with no whitespace.
    pub fn new(
        line_count: LineNumber,
        default_line_height: Pixels,
        padding_top: Pixels,
        padding_bottom: Pixels,
        custom_line_heights: &[CustomLineHeightData],
    ) -> Self {
        let instance_id = INSTANCE_COUNT.fetch_add(1, AtomicOrdering::Relaxed) + 1;
        Self {
            instance_id,
            pending_changes: PendingChanges::default(),
            last_whitespace_id: 0,
            whitespaces: Vec::new(),
            prefix_sum_dirty: DirtyFrom::Clean,
            min_width: None,
            line_count,
            padding_top,
            padding_bottom,
            line_heights: LineHeightsManager::new(default_line_height, custom_line_heights),
        }
    }

    /// Index at which a whitespace with the given key keeps `whitespaces`
    /// sorted. Equal keys insert after existing ones.
    pub fn find_insertion_index(
        whitespaces: &[Whitespace],
        after_line_number: LineNumber,
        ordinal: i32,
    ) -> usize {
        whitespaces.partition_point(|whitespace| whitespace.sort_key() <= (after_line_number, ordinal))
    }

    // === Configuration ===

    pub fn line_count(&self) -> LineNumber {
        self.line_count
    }

    pub fn padding_top(&self) -> Pixels {
        self.padding_top
    }

    pub fn padding_bottom(&self) -> Pixels {
        self.padding_bottom
    }

    pub fn default_line_height(&self) -> Pixels {
        self.line_heights.default_line_height()
    }

    pub fn set_default_line_height(&mut self, default_line_height: Pixels) {
        self.line_heights.set_default_line_height(default_line_height);
    }

    pub fn set_padding(&mut self, padding_top: Pixels, padding_bottom: Pixels) {
        self.padding_top = padding_top;
        self.padding_bottom = padding_bottom;
    }

    /// Reset after the document content was replaced wholesale.
    ///
    /// Rebuilds the custom line heights; whitespace zones are kept.
    pub fn on_flushed(&mut self, line_count: LineNumber, custom_line_heights: &[CustomLineHeightData]) {
        self.check_pending_changes();
        self.line_count = line_count;
        self.line_heights =
            LineHeightsManager::new(self.line_heights.default_line_height(), custom_line_heights);
        debug!(
            line_count,
            custom_line_heights = custom_line_heights.len(),
            "lines layout flushed"
        );
    }

    // === Batched mutation ===

    /// Run `callback` against a line height accessor and commit once.
    ///
    /// Returns whether the callback issued any change.
    pub fn change_line_heights<F>(&mut self, callback: F) -> bool
    where
        F: FnOnce(&mut dyn LineHeightAccessor),
    {
        let mut batch = LineHeightBatch {
            manager: &mut self.line_heights,
            had_change: false,
        };
        callback(&mut batch);
        batch.had_change
    }

    /// Run `callback` against a whitespace accessor and commit once.
    ///
    /// Returns whether the callback issued any change.
    pub fn change_whitespace<F>(&mut self, callback: F) -> bool
    where
        F: FnOnce(&mut dyn WhitespaceAccessor),
    {
        let mut batch = WhitespaceBatch {
            layout: self,
            had_change: false,
        };
        callback(&mut batch);
        batch.had_change
    }

    fn commit_pending_whitespace(&mut self) {
        let Some(staged) = self.pending_changes.take() else {
            return;
        };
        let single_primitive = staged.len() <= 1;
        let StagedChanges {
            inserts,
            changes,
            removes,
        } = staged;

        if !inserts.is_empty() || !removes.is_empty() {
            self.min_width = None;
        }

        if single_primitive {
            for whitespace in inserts {
                self.insert_whitespace(whitespace);
            }
            for change in changes {
                self.change_one_whitespace(change);
            }
            for id in removes {
                if let Some(index) = self.find_whitespace_index(id) {
                    self.remove_whitespace(index);
                }
            }
            return;
        }

        let to_remove: HashSet<WhitespaceId> = removes.into_iter().collect();
        let to_change: HashMap<WhitespaceId, PendingChange> =
            changes.into_iter().map(|change| (change.id, change)).collect();

        let existing = std::mem::take(&mut self.whitespaces);
        let mut rebuilt: Vec<Whitespace> = existing
            .into_iter()
            .chain(inserts)
            .filter(|whitespace| !to_remove.contains(&whitespace.id()))
            .map(|mut whitespace| {
                if let Some(change) = to_change.get(&whitespace.id()) {
                    whitespace.set_after_line_number(change.new_after_line_number);
                    whitespace.set_height(change.new_height);
                }
                whitespace
            })
            .collect();
        rebuilt.sort_by_key(Whitespace::sort_key);

        self.whitespaces = rebuilt;
        self.prefix_sum_dirty = DirtyFrom::Clean;
        if !self.whitespaces.is_empty() {
            self.prefix_sum_dirty.lower_to(0);
        }
        debug!(
            whitespaces = self.whitespaces.len(),
            removed = to_remove.len(),
            changed = to_change.len(),
            "rebuilt whitespace layout"
        );
    }

    fn check_pending_changes(&mut self) {
        if self.pending_changes.must_commit() {
            self.commit_pending_whitespace();
        }
    }

    fn insert_whitespace(&mut self, whitespace: Whitespace) {
        let index = Self::find_insertion_index(
            &self.whitespaces,
            whitespace.after_line_number(),
            whitespace.ordinal(),
        );
        self.whitespaces.insert(index, whitespace);
        self.prefix_sum_dirty.lower_to(index);
    }

    fn find_whitespace_index(&self, id: WhitespaceId) -> Option<usize> {
        self.whitespaces
            .iter()
            .position(|whitespace| whitespace.id() == id)
    }

    fn change_one_whitespace(&mut self, change: PendingChange) {
        let Some(index) = self.find_whitespace_index(change.id) else {
            return;
        };
        if self.whitespaces[index].height() != change.new_height {
            self.whitespaces[index].set_height(change.new_height);
            self.prefix_sum_dirty.lower_to(index);
        }
        if self.whitespaces[index].after_line_number() != change.new_after_line_number {
            // Re-insert: the new anchor may move it.
            let mut whitespace = self.whitespaces.remove(index);
            self.prefix_sum_dirty.lower_to(index);
            whitespace.set_after_line_number(change.new_after_line_number);
            self.insert_whitespace(whitespace);
        }
    }

    fn remove_whitespace(&mut self, index: usize) {
        self.whitespaces.remove(index);
        self.prefix_sum_dirty.lower_to(index);
    }

    // === Document edits ===

    /// Lines `[from_line_number, to_line_number]` were deleted.
    pub fn on_lines_deleted(&mut self, from_line_number: LineNumber, to_line_number: LineNumber) {
        self.check_pending_changes();
        if to_line_number < from_line_number || from_line_number == 0 {
            return;
        }
        let delete_count = to_line_number - from_line_number + 1;
        self.line_count = self.line_count.saturating_sub(delete_count);

        let collapse_to = from_line_number - 1;
        let mut collapsed = false;
        for whitespace in &mut self.whitespaces {
            let after_line_number = whitespace.after_line_number();
            if (from_line_number..=to_line_number).contains(&after_line_number) {
                // Its line is gone: move it above the first deleted line.
                whitespace.set_after_line_number(collapse_to);
                collapsed = true;
            } else if after_line_number > to_line_number {
                whitespace.set_after_line_number(after_line_number - delete_count);
            }
        }
        if collapsed {
            // Ordinals may now disagree with array order around `collapse_to`.
            self.whitespaces.sort_by_key(Whitespace::sort_key);
            let first_affected = self
                .whitespaces
                .partition_point(|whitespace| whitespace.after_line_number() < collapse_to);
            self.prefix_sum_dirty.lower_to(first_affected);
        }
        trace!(
            from_line_number,
            to_line_number,
            line_count = self.line_count,
            collapsed,
            "lines deleted"
        );

        self.line_heights
            .on_lines_deleted(from_line_number, to_line_number);
    }

    /// Lines `[from_line_number, to_line_number]` were inserted.
    pub fn on_lines_inserted(&mut self, from_line_number: LineNumber, to_line_number: LineNumber) {
        self.check_pending_changes();
        if to_line_number < from_line_number || from_line_number == 0 {
            return;
        }
        let insert_count = to_line_number - from_line_number + 1;
        self.line_count += insert_count;
        for whitespace in &mut self.whitespaces {
            let after_line_number = whitespace.after_line_number();
            if from_line_number <= after_line_number {
                whitespace.set_after_line_number(after_line_number + insert_count);
            }
        }
        trace!(
            from_line_number,
            to_line_number,
            line_count = self.line_count,
            "lines inserted"
        );

        self.line_heights
            .on_lines_inserted(from_line_number, to_line_number);
    }

    // === Totals ===

    /// Sum of every whitespace height.
    pub fn whitespaces_total_height(&mut self) -> Pixels {
        self.check_pending_changes();
        match self.whitespaces.len() {
            0 => 0,
            len => self.accumulated_whitespace_height(len - 1),
        }
    }

    /// Sum of whitespace heights for indices `0..=index`.
    pub fn whitespaces_accumulated_height(&mut self, index: usize) -> Option<Pixels> {
        self.check_pending_changes();
        (index < self.whitespaces.len()).then(|| self.accumulated_whitespace_height(index))
    }

    /// Height of all lines, whitespace and padding.
    pub fn lines_total_height(&mut self) -> Pixels {
        self.check_pending_changes();
        let lines_height = self
            .line_heights
            .accumulated_line_heights_including_line_number(self.line_count);
        let whitespaces_height = self.whitespaces_total_height();
        lines_height + whitespaces_height + self.padding_top + self.padding_bottom
    }

    /// Sum of heights of whitespaces anchored strictly before `line_number`.
    pub fn whitespace_accumulated_height_before_line_number(&mut self, line_number: LineNumber) -> Pixels {
        self.check_pending_changes();
        match self.last_whitespace_before_line_number(line_number) {
            Some(index) => self.accumulated_whitespace_height(index),
            None => 0,
        }
    }

    /// Index of the first whitespace anchored at or after `line_number`.
    pub fn first_whitespace_index_after_line_number(&mut self, line_number: LineNumber) -> Option<usize> {
        self.check_pending_changes();
        let index = self
            .whitespaces
            .partition_point(|whitespace| whitespace.after_line_number() < line_number);
        (index < self.whitespaces.len()).then_some(index)
    }

    fn last_whitespace_before_line_number(&self, line_number: LineNumber) -> Option<usize> {
        self.whitespaces
            .partition_point(|whitespace| whitespace.after_line_number() < line_number)
            .checked_sub(1)
    }

    /// Extend the prefix sums through `index` if needed. `index` must be valid.
    fn accumulated_whitespace_height(&mut self, index: usize) -> Pixels {
        if let Some(from) = self.prefix_sum_dirty.index() {
            if from <= index {
                let mut running = match from {
                    0 => 0,
                    _ => self.whitespaces[from - 1].prefix_sum(),
                };
                for whitespace in &mut self.whitespaces[from..=index] {
                    running += whitespace.height();
                    whitespace.set_prefix_sum(running);
                }
                self.prefix_sum_dirty
                    .advance_past(index, self.whitespaces.len());
            }
        }
        self.whitespaces[index].prefix_sum()
    }

    // === Line queries ===

    /// Top of `line_number`: padding, every line above it and the
    /// whitespaces above it. With `include_view_zones`, the zones anchored
    /// directly above the line are left out so the offset points at them.
    pub fn vertical_offset_for_line_number(&mut self, line_number: LineNumber, include_view_zones: bool) -> Pixels {
        self.check_pending_changes();
        let previous_lines_height = if line_number > 1 {
            self.line_heights
                .accumulated_line_heights_including_line_number(line_number - 1)
        } else {
            0
        };
        let whitespace_line = if include_view_zones {
            line_number.saturating_sub(1)
        } else {
            line_number
        };
        let previous_whitespaces_height =
            self.whitespace_accumulated_height_before_line_number(whitespace_line);
        previous_lines_height + previous_whitespaces_height + self.padding_top
    }

    /// Bottom of `line_number`. With `include_view_zones`, zones anchored
    /// after the line are counted as well.
    pub fn vertical_offset_after_line_number(&mut self, line_number: LineNumber, include_view_zones: bool) -> Pixels {
        self.check_pending_changes();
        let total_lines_height = self
            .line_heights
            .accumulated_line_heights_including_line_number(line_number);
        let whitespace_line = if include_view_zones {
            line_number + 1
        } else {
            line_number
        };
        let total_whitespaces_height =
            self.whitespace_accumulated_height_before_line_number(whitespace_line);
        total_lines_height + total_whitespaces_height + self.padding_top
    }

    pub fn line_height_for_line_number(&mut self, line_number: LineNumber) -> Pixels {
        self.line_heights.height_for_line_number(line_number)
    }

    pub fn has_whitespace(&mut self) -> bool {
        self.whitespaces_count() > 0
    }

    /// Largest `min_width` among all whitespaces, 0 when there are none.
    pub fn whitespace_min_width(&mut self) -> Pixels {
        self.check_pending_changes();
        if let Some(min_width) = self.min_width {
            return min_width;
        }
        let min_width = self
            .whitespaces
            .iter()
            .map(Whitespace::min_width)
            .fold(0, Pixels::max);
        self.min_width = Some(min_width);
        min_width
    }

    pub fn is_after_lines(&mut self, vertical_offset: Pixels) -> bool {
        self.check_pending_changes();
        vertical_offset > self.lines_total_height()
    }

    pub fn is_in_top_padding(&mut self, vertical_offset: Pixels) -> bool {
        if self.padding_top == 0 {
            return false;
        }
        self.check_pending_changes();
        vertical_offset < self.padding_top
    }

    pub fn is_in_bottom_padding(&mut self, vertical_offset: Pixels) -> bool {
        if self.padding_bottom == 0 {
            return false;
        }
        self.check_pending_changes();
        vertical_offset >= self.lines_total_height() - self.padding_bottom
    }

    /// Line at `vertical_offset`, or the first line starting after it when
    /// the offset falls inside a whitespace.
    ///
    /// Negative offsets give line 1; offsets past the end give the last line.
    /// An empty document has no line to return and always gives 0.
    pub fn line_number_at_or_after_vertical_offset(&mut self, vertical_offset: Pixels) -> LineNumber {
        self.check_pending_changes();
        let line_count = self.line_count;
        if line_count == 0 {
            return 0;
        }
        if vertical_offset < 0 {
            return 1;
        }

        let mut min_line_number: LineNumber = 1;
        let mut max_line_number = line_count;

        while min_line_number < max_line_number {
            let mid_line_number = min_line_number + (max_line_number - min_line_number) / 2;
            let mid_vertical_offset = self.vertical_offset_for_line_number(mid_line_number, false);

            if vertical_offset < mid_vertical_offset {
                // Before mid, but mid may still be the answer.
                max_line_number = mid_line_number;
            } else if vertical_offset < mid_vertical_offset + self.line_height_for_line_number(mid_line_number) {
                return mid_line_number;
            } else {
                min_line_number = mid_line_number + 1;
            }
        }

        min_line_number
    }

    /// Lines visible between `vertical_offset1` and `vertical_offset2`.
    pub fn lines_viewport_data(&mut self, vertical_offset1: Pixels, vertical_offset2: Pixels) -> LinesViewportData {
        self.check_pending_changes();
        let line_height = self.line_heights.default_line_height();
        if self.line_count == 0 {
            return LinesViewportData {
                big_numbers_delta: 0,
                start_line_number: 0,
                end_line_number: 0,
                relative_vertical_offset: Vec::new(),
                centered_line_number: 0,
                completely_visible_start_line_number: 0,
                completely_visible_end_line_number: 0,
                line_height,
            };
        }

        // The start line may begin before or after `vertical_offset1`.
        let start_line_number = self.line_number_at_or_after_vertical_offset(vertical_offset1);
        let start_line_number_vertical_offset =
            self.vertical_offset_for_line_number(start_line_number, false);
        let line_count = self.line_count;
        let mut end_line_number = line_count;

        let whitespace_count = self.whitespaces.len();
        let mut whitespace_index = self
            .first_whitespace_index_after_line_number(start_line_number)
            .unwrap_or(whitespace_count);
        let (mut current_whitespace_after_line_number, mut current_whitespace_height) =
            self.whitespace_anchor(whitespace_index, 0);

        let mut current_vertical_offset = start_line_number_vertical_offset;
        let mut current_line_relative_offset = current_vertical_offset;

        let mut big_numbers_delta = 0;
        if start_line_number_vertical_offset >= BIG_NUMBERS_STEP {
            big_numbers_delta = (start_line_number_vertical_offset / BIG_NUMBERS_STEP) * BIG_NUMBERS_STEP;
            // Keep lines positioned at `line_height` increments.
            big_numbers_delta = (big_numbers_delta / line_height) * line_height;
            current_line_relative_offset -= big_numbers_delta;
        }

        let mut lines_offsets = Vec::new();
        // Doubled to keep the centre integral.
        let doubled_center = vertical_offset1 + vertical_offset2;
        let mut centered_line_number = None;

        let mut line_number = start_line_number;
        while line_number <= line_count {
            let height = self.line_height_for_line_number(line_number);
            if centered_line_number.is_none() {
                let top = 2 * current_vertical_offset;
                let bottom = 2 * (current_vertical_offset + height);
                if (top <= doubled_center && doubled_center < bottom) || top > doubled_center {
                    centered_line_number = Some(line_number);
                }
            }

            current_vertical_offset += height;
            lines_offsets.push(current_line_relative_offset);
            current_line_relative_offset += height;

            while current_whitespace_after_line_number == line_number {
                // Push the next line down by the whitespace.
                current_line_relative_offset += current_whitespace_height;
                current_vertical_offset += current_whitespace_height;
                whitespace_index += 1;
                (current_whitespace_after_line_number, current_whitespace_height) =
                    self.whitespace_anchor(whitespace_index, current_whitespace_height);
            }

            if current_vertical_offset >= vertical_offset2 {
                end_line_number = line_number;
                break;
            }
            line_number += 1;
        }

        let centered_line_number = centered_line_number.unwrap_or(end_line_number);
        let end_line_number_vertical_offset = self.vertical_offset_for_line_number(end_line_number, false);

        let mut completely_visible_start_line_number = start_line_number;
        let mut completely_visible_end_line_number = end_line_number;
        if completely_visible_start_line_number < completely_visible_end_line_number
            && start_line_number_vertical_offset < vertical_offset1
        {
            completely_visible_start_line_number += 1;
        }
        if completely_visible_start_line_number < completely_visible_end_line_number {
            let end_line_height = self.line_height_for_line_number(end_line_number);
            if end_line_number_vertical_offset + end_line_height > vertical_offset2 {
                completely_visible_end_line_number -= 1;
            }
        }

        LinesViewportData {
            big_numbers_delta,
            start_line_number,
            end_line_number,
            relative_vertical_offset: lines_offsets,
            centered_line_number,
            completely_visible_start_line_number,
            completely_visible_end_line_number,
            line_height,
        }
    }

    /// Anchor and height of the whitespace at `index`; past the end, an
    /// anchor no line reaches and `fallback_height`.
    fn whitespace_anchor(&self, index: usize, fallback_height: Pixels) -> (LineNumber, Pixels) {
        match self.whitespaces.get(index) {
            Some(whitespace) => (whitespace.after_line_number(), whitespace.height()),
            None => (self.line_count.saturating_add(1), fallback_height),
        }
    }

    // === Whitespace queries ===

    /// Absolute top of the whitespace at `index`.
    pub fn vertical_offset_for_whitespace_index(&mut self, index: usize) -> Option<Pixels> {
        self.check_pending_changes();
        let after_line_number = self.whitespaces.get(index)?.after_line_number();
        Some(self.whitespace_top(index, after_line_number))
    }

    fn whitespace_top(&mut self, index: usize, after_line_number: LineNumber) -> Pixels {
        let previous_lines_height = if after_line_number >= 1 {
            self.line_heights
                .accumulated_line_heights_including_line_number(after_line_number)
        } else {
            0
        };
        let previous_whitespaces_height = match index {
            0 => 0,
            _ => self.accumulated_whitespace_height(index - 1),
        };
        previous_lines_height + previous_whitespaces_height + self.padding_top
    }

    /// Index of the whitespace containing `vertical_offset`, or of the first
    /// one below it. `None` when every whitespace ends at or above it.
    pub fn whitespace_index_at_or_after_vertical_offset(&mut self, vertical_offset: Pixels) -> Option<usize> {
        self.check_pending_changes();
        let mut max_index = self.whitespaces.len().checked_sub(1)?;
        let mut min_index = 0;

        let (max_top, max_height) = self.whitespace_extent(max_index);
        if vertical_offset >= max_top + max_height {
            return None;
        }

        while min_index < max_index {
            let mid_index = min_index + (max_index - min_index) / 2;
            let (mid_top, mid_height) = self.whitespace_extent(mid_index);

            if vertical_offset >= mid_top + mid_height {
                min_index = mid_index + 1;
            } else if vertical_offset >= mid_top {
                return Some(mid_index);
            } else {
                max_index = mid_index;
            }
        }
        Some(min_index)
    }

    /// `(top, height)` of a valid whitespace index.
    fn whitespace_extent(&mut self, index: usize) -> (Pixels, Pixels) {
        let whitespace = &self.whitespaces[index];
        let (after_line_number, height) = (whitespace.after_line_number(), whitespace.height());
        (self.whitespace_top(index, after_line_number), height)
    }

    fn whitespace_viewport_entry(&mut self, index: usize) -> WhitespaceViewportData {
        let (vertical_offset, height) = self.whitespace_extent(index);
        let whitespace = &self.whitespaces[index];
        WhitespaceViewportData {
            id: whitespace.id(),
            after_line_number: whitespace.after_line_number(),
            vertical_offset,
            height,
        }
    }

    /// The whitespace covering `vertical_offset`, if any.
    pub fn whitespace_at_vertical_offset(&mut self, vertical_offset: Pixels) -> Option<WhitespaceViewportData> {
        self.check_pending_changes();
        let candidate = self.whitespace_index_at_or_after_vertical_offset(vertical_offset)?;
        let data = self.whitespace_viewport_entry(candidate);
        (data.vertical_offset <= vertical_offset).then_some(data)
    }

    /// Whitespaces visible between `vertical_offset1` and `vertical_offset2`.
    pub fn whitespace_viewport_data(
        &mut self,
        vertical_offset1: Pixels,
        vertical_offset2: Pixels,
    ) -> Vec<WhitespaceViewportData> {
        self.check_pending_changes();
        let Some(start_index) = self.whitespace_index_at_or_after_vertical_offset(vertical_offset1) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        for index in start_index..self.whitespaces.len() {
            let data = self.whitespace_viewport_entry(index);
            if data.vertical_offset >= vertical_offset2 {
                break;
            }
            result.push(data);
        }
        result
    }

    /// Every whitespace in layout order, with prefix sums computed.
    /// Returns a copy.
    pub fn whitespaces(&mut self) -> Vec<Whitespace> {
        self.check_pending_changes();
        if let Some(last) = self.whitespaces.len().checked_sub(1) {
            self.accumulated_whitespace_height(last);
        }
        self.whitespaces.clone()
    }

    pub fn whitespaces_count(&mut self) -> usize {
        self.check_pending_changes();
        self.whitespaces.len()
    }

    pub fn id_for_whitespace_index(&mut self, index: usize) -> Option<WhitespaceId> {
        self.check_pending_changes();
        self.whitespaces.get(index).map(Whitespace::id)
    }

    pub fn after_line_number_for_whitespace_index(&mut self, index: usize) -> Option<LineNumber> {
        self.check_pending_changes();
        self.whitespaces.get(index).map(Whitespace::after_line_number)
    }

    pub fn height_for_whitespace_index(&mut self, index: usize) -> Option<Pixels> {
        self.check_pending_changes();
        self.whitespaces.get(index).map(Whitespace::height)
    }
}

/// Line height accessor; commits the manager when dropped.
struct LineHeightBatch<'a> {
    manager: &'a mut LineHeightsManager,
    had_change: bool,
}

impl LineHeightAccessor for LineHeightBatch<'_> {
    fn insert_or_change_custom_line_height(
        &mut self,
        decoration_id: &DecorationId,
        start_line_number: LineNumber,
        end_line_number: LineNumber,
        line_height: Pixels,
    ) {
        self.had_change = true;
        self.manager.insert_or_change_custom_line_height(
            decoration_id,
            start_line_number,
            end_line_number,
            line_height,
        );
    }

    fn remove_custom_line_height(&mut self, decoration_id: &DecorationId) {
        self.had_change = true;
        self.manager.remove_custom_line_height(decoration_id);
    }
}

impl Drop for LineHeightBatch<'_> {
    fn drop(&mut self) {
        self.manager.commit();
    }
}

/// Whitespace accessor; commits the staged changes when dropped.
struct WhitespaceBatch<'a> {
    layout: &'a mut LinesLayout,
    had_change: bool,
}

impl WhitespaceAccessor for WhitespaceBatch<'_> {
    fn insert_whitespace(
        &mut self,
        after_line_number: LineNumber,
        ordinal: i32,
        height: Pixels,
        min_width: Pixels,
    ) -> WhitespaceId {
        self.had_change = true;
        self.layout.last_whitespace_id += 1;
        let id = WhitespaceId::new(self.layout.instance_id, self.layout.last_whitespace_id);
        self.layout.pending_changes.insert(Whitespace::new(
            id,
            after_line_number,
            ordinal,
            height,
            min_width,
        ));
        id
    }

    fn change_one_whitespace(
        &mut self,
        id: WhitespaceId,
        new_after_line_number: LineNumber,
        new_height: Pixels,
    ) {
        self.had_change = true;
        self.layout.pending_changes.change(PendingChange {
            id,
            new_after_line_number,
            new_height,
        });
    }

    fn remove_whitespace(&mut self, id: WhitespaceId) {
        self.had_change = true;
        self.layout.pending_changes.remove(id);
    }
}

impl Drop for WhitespaceBatch<'_> {
    fn drop(&mut self) {
        self.layout.commit_pending_whitespace();
    }
}

#[cfg(test)]
#[path = "lines_layout_tests.rs"]
mod tests;
