//! LineHeightsManager - per-line custom heights with O(log n) cumulative queries
//!
//! Tracks height overrides ("custom line heights") owned by decorations and
//! answers two questions for any 1-based line number:
//!
//! - the effective height of the line (maximum override, or the default)
//! - the accumulated height of all lines up to and including it
//!
//! Overrides are stored as one [`CustomLineHeightEntry`] per covered line in a
//! vector ordered by line number. Every entry caches the prefix sum of the
//! document above its line, so cumulative queries reduce to a binary search
//! plus interpolation over the default-height gap.
//!
//! # Batching
//!
//! Mutations are staged: inserts go to a pending buffer, removals tombstone
//! entries in place and lower the [`DirtyFrom`] watermark. [`commit`] merges
//! pending entries and recomputes only the suffix starting at the watermark.
//! Every read commits first, so callers never observe a half-applied batch.
//!
//! # Complexity
//!
//! - `height_for_line_number`: O(log n)
//! - `accumulated_line_heights_including_line_number`: O(log n)
//! - `commit`: O(k log k + n - watermark) for k pending entries
//! - `on_lines_inserted` / `on_lines_deleted`: O(n - affected index)
//!
//! [`commit`]: LineHeightsManager::commit

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, trace};

use super::identifiers::DecorationId;
use super::types::{DirtyFrom, LineNumber, Pixels};

/// Smallest height a line can take. Every line occupies at least one pixel,
/// so no two lines share a top offset.
pub const MIN_LINE_HEIGHT: Pixels = 1;

/// Externally supplied height override covering an inclusive line range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLineHeightData {
    /// Owner of the override.
    pub decoration_id: DecorationId,
    /// First covered line (1-based, inclusive).
    pub start_line_number: LineNumber,
    /// Last covered line (1-based, inclusive).
    pub end_line_number: LineNumber,
    /// Requested height in pixels for every covered line.
    pub line_height: Pixels,
}

impl CustomLineHeightData {
    /// Create a new override record.
    pub fn new(
        decoration_id: DecorationId,
        start_line_number: LineNumber,
        end_line_number: LineNumber,
        line_height: Pixels,
    ) -> Self {
        Self {
            decoration_id,
            start_line_number,
            end_line_number,
            line_height,
        }
    }
}

/// One decoration's height override on one line.
///
/// # Invariants (after commit)
/// - Entries sharing a `line_number` share `maximum_special_height` and `prefix_sum`
/// - `prefix_sum` is the height of every line strictly above `line_number`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomLineHeightEntry {
    decoration_id: DecorationId,
    index: usize,
    line_number: LineNumber,
    special_height: Pixels,
    maximum_special_height: Pixels,
    prefix_sum: Pixels,
    deleted: bool,
}

impl CustomLineHeightEntry {
    fn pending(decoration_id: DecorationId, line_number: LineNumber, special_height: Pixels) -> Self {
        Self {
            decoration_id,
            index: 0,
            line_number,
            special_height,
            maximum_special_height: special_height,
            prefix_sum: 0,
            deleted: false,
        }
    }

    /// Decoration owning this entry.
    pub fn decoration_id(&self) -> &DecorationId {
        &self.decoration_id
    }

    /// Position in the ordered entry vector.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Line this entry applies to.
    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    /// Height requested by this entry's decoration.
    pub fn special_height(&self) -> Pixels {
        self.special_height
    }

    /// Effective height of the line: max over all entries on it.
    pub fn maximum_special_height(&self) -> Pixels {
        self.maximum_special_height
    }

    /// Accumulated height of all lines above this one.
    pub fn prefix_sum(&self) -> Pixels {
        self.prefix_sum
    }
}

/// Per-line custom height tracker.
#[derive(Debug, Clone)]
pub struct LineHeightsManager {
    default_line_height: Pixels,
    /// Committed entries, sorted by line number.
    ordered: Vec<CustomLineHeightEntry>,
    /// Decoration id -> positions in `ordered`. Rebuilt on every commit.
    by_decoration: HashMap<DecorationId, Vec<usize>>,
    /// Staged entries not yet merged into `ordered`.
    pending: Vec<CustomLineHeightEntry>,
    dirty: DirtyFrom,
}

impl LineHeightsManager {
    /// Create a manager seeded with `custom_line_heights`, already committed.
    pub fn new(default_line_height: Pixels, custom_line_heights: &[CustomLineHeightData]) -> Self {
        let mut manager = Self {
            default_line_height: default_line_height.max(MIN_LINE_HEIGHT),
            ordered: Vec::new(),
            by_decoration: HashMap::new(),
            pending: Vec::new(),
            dirty: DirtyFrom::Clean,
        };
        for data in custom_line_heights {
            manager.insert_or_change_custom_line_height(
                &data.decoration_id,
                data.start_line_number,
                data.end_line_number,
                data.line_height,
            );
        }
        manager.commit();
        manager
    }

    /// Height of a line without an override, at least [`MIN_LINE_HEIGHT`].
    pub fn default_line_height(&self) -> Pixels {
        self.default_line_height
    }

    /// Change the default height. Every prefix sum depends on it, so the
    /// whole cache is invalidated.
    pub fn set_default_line_height(&mut self, default_line_height: Pixels) {
        let default_line_height = default_line_height.max(MIN_LINE_HEIGHT);
        if self.default_line_height == default_line_height {
            return;
        }
        self.default_line_height = default_line_height;
        if !self.ordered.is_empty() {
            self.dirty.lower_to(0);
        }
    }

    /// Check if staged inserts or tombstones are waiting for a commit.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() || !self.dirty.is_clean()
    }

    /// Stage an override for `decoration_id` on every line in
    /// `[start_line_number, end_line_number]`, replacing any existing one.
    ///
    /// Line 0 is not addressable and is skipped; heights clamp to
    /// [`MIN_LINE_HEIGHT`].
    pub fn insert_or_change_custom_line_height(
        &mut self,
        decoration_id: &DecorationId,
        start_line_number: LineNumber,
        end_line_number: LineNumber,
        line_height: Pixels,
    ) {
        self.remove_custom_line_height(decoration_id);
        let line_height = line_height.max(MIN_LINE_HEIGHT);
        for line_number in start_line_number.max(1)..=end_line_number {
            self.pending.push(CustomLineHeightEntry::pending(
                decoration_id.clone(),
                line_number,
                line_height,
            ));
        }
    }

    /// Tombstone every entry owned by `decoration_id`. Unknown ids are ignored.
    pub fn remove_custom_line_height(&mut self, decoration_id: &DecorationId) {
        self.pending.retain(|entry| &entry.decoration_id != decoration_id);
        let Some(positions) = self.by_decoration.remove(decoration_id) else {
            return;
        };
        for index in positions {
            if let Some(entry) = self.ordered.get_mut(index) {
                entry.deleted = true;
                self.dirty.lower_to(index);
            }
        }
    }

    /// Effective height of `line_number`: the maximum override covering it,
    /// or the default height.
    pub fn height_for_line_number(&mut self, line_number: LineNumber) -> Pixels {
        self.commit();
        match self.search(line_number) {
            Ok(index) => self.ordered[index].maximum_special_height,
            Err(_) => self.default_line_height,
        }
    }

    /// Accumulated height of lines `1..=line_number`. Line 0 yields 0.
    pub fn accumulated_line_heights_including_line_number(&mut self, line_number: LineNumber) -> Pixels {
        self.commit();
        match self.search(line_number) {
            Ok(index) => {
                let entry = &self.ordered[index];
                entry.prefix_sum + entry.maximum_special_height
            }
            Err(0) => self.default_line_height * Pixels::from(line_number),
            Err(index) => {
                let previous = &self.ordered[index - 1];
                previous.prefix_sum
                    + previous.maximum_special_height
                    + self.default_line_height
                        * (Pixels::from(line_number) - Pixels::from(previous.line_number))
            }
        }
    }

    /// Committed entries in line order. Returns a copy.
    pub fn custom_lines(&mut self) -> Vec<CustomLineHeightEntry> {
        self.commit();
        self.ordered.clone()
    }

    /// Number of committed per-line entries.
    pub fn len(&mut self) -> usize {
        self.commit();
        self.ordered.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Translate the deletion of lines `[from_line_number, to_line_number]`.
    ///
    /// Entries after the span move up by the deleted count. Every entry
    /// inside the span collapses into a single representative on
    /// `from_line_number` carrying the tallest override of the span, owned by
    /// that override's decoration. When the same decoration already lands on
    /// the boundary line from below, the two merge into one entry.
    pub fn on_lines_deleted(&mut self, from_line_number: LineNumber, to_line_number: LineNumber) {
        self.commit();
        if to_line_number < from_line_number || from_line_number == 0 {
            return;
        }
        let delete_count = to_line_number - from_line_number + 1;
        let start = self
            .ordered
            .partition_point(|entry| entry.line_number < from_line_number);
        if start == self.ordered.len() {
            return;
        }

        let tail = self.ordered.split_off(start);
        let mut representative: Option<CustomLineHeightEntry> = None;
        let mut collapsed = 0usize;
        let mut shifted = Vec::with_capacity(tail.len());
        for mut entry in tail {
            if entry.line_number <= to_line_number {
                collapsed += 1;
                let taller = representative
                    .as_ref()
                    .is_none_or(|kept| entry.special_height > kept.special_height);
                if taller {
                    entry.line_number = from_line_number;
                    representative = Some(entry);
                }
            } else {
                entry.line_number -= delete_count;
                shifted.push(entry);
            }
        }

        if let Some(representative) = representative {
            let same_decoration = shifted
                .iter_mut()
                .take_while(|entry| entry.line_number == from_line_number)
                .find(|entry| entry.decoration_id == representative.decoration_id);
            match same_decoration {
                Some(entry) => {
                    entry.special_height = entry.special_height.max(representative.special_height);
                }
                None => self.ordered.push(representative),
            }
        }
        self.ordered.extend(shifted);
        trace!(
            from_line_number,
            to_line_number,
            collapsed,
            "custom line heights re-anchored after deletion"
        );

        self.dirty.lower_to(start);
        self.commit();
    }

    /// Translate the insertion of lines `[from_line_number, to_line_number]`.
    ///
    /// Entries at or after the insertion point move down. Decorations that
    /// own both the line above and the line at the insertion point are
    /// re-expanded so the inserted lines inherit the override.
    pub fn on_lines_inserted(&mut self, from_line_number: LineNumber, to_line_number: LineNumber) {
        self.commit();
        if to_line_number < from_line_number || from_line_number == 0 {
            return;
        }
        let insert_count = to_line_number - from_line_number + 1;
        let start = self
            .ordered
            .partition_point(|entry| entry.line_number < from_line_number);

        let immediately_after: HashSet<&DecorationId> = self.ordered[start..]
            .iter()
            .take_while(|entry| entry.line_number == from_line_number)
            .map(|entry| &entry.decoration_id)
            .collect();
        let immediately_before: HashSet<&DecorationId> = self.ordered[..start]
            .iter()
            .rev()
            .take_while(|entry| entry.line_number + 1 == from_line_number)
            .map(|entry| &entry.decoration_id)
            .collect();
        let spanning: BTreeSet<DecorationId> = immediately_before
            .intersection(&immediately_after)
            .map(|id| (*id).clone())
            .collect();

        let shift = self.default_line_height * Pixels::from(insert_count);
        for entry in &mut self.ordered[start..] {
            entry.line_number += insert_count;
            entry.prefix_sum += shift;
        }
        trace!(
            from_line_number,
            to_line_number,
            shifted = self.ordered.len() - start,
            spanning = spanning.len(),
            "custom line heights shifted after insertion"
        );

        if spanning.is_empty() {
            return;
        }
        let re_add: Vec<CustomLineHeightData> = spanning
            .into_iter()
            .filter_map(|decoration_id| {
                let positions = self.by_decoration.get(&decoration_id)?;
                let entries = positions.iter().map(|&index| &self.ordered[index]);
                let start_line_number = entries
                    .clone()
                    .map(|entry| entry.line_number)
                    .fold(from_line_number, LineNumber::min);
                let end_line_number = entries
                    .clone()
                    .map(|entry| entry.line_number)
                    .fold(from_line_number, LineNumber::max);
                let line_height = entries.map(|entry| entry.special_height).fold(0, Pixels::max);
                Some(CustomLineHeightData::new(
                    decoration_id,
                    start_line_number,
                    end_line_number,
                    line_height,
                ))
            })
            .collect();
        for data in &re_add {
            self.insert_or_change_custom_line_height(
                &data.decoration_id,
                data.start_line_number,
                data.end_line_number,
                data.line_height,
            );
        }
        self.commit();
    }

    /// Merge staged entries and recompute the invalidated suffix.
    ///
    /// No-op when nothing is pending.
    pub fn commit(&mut self) {
        if !self.has_pending() {
            return;
        }
        let inserted = self.pending.len();
        if !self.pending.is_empty() {
            self.merge_pending();
        }
        let from = self.dirty.index();
        if let Some(from) = from {
            self.recompute_from(from);
        }
        self.dirty = DirtyFrom::Clean;
        debug!(
            inserted,
            from = ?from,
            entries = self.ordered.len(),
            "committed custom line heights"
        );
    }

    fn search(&self, line_number: LineNumber) -> Result<usize, usize> {
        self.ordered
            .binary_search_by(|entry| entry.line_number.cmp(&line_number))
    }

    fn merge_pending(&mut self) {
        let mut pending = std::mem::take(&mut self.pending);
        pending.sort_by_key(|entry| entry.line_number);
        let first_line = pending[0].line_number;
        let first = self
            .ordered
            .partition_point(|entry| entry.line_number < first_line);

        let mut existing = self.ordered.split_off(first).into_iter().peekable();
        self.ordered.reserve(pending.len() + existing.len());
        for entry in pending {
            while let Some(kept) = existing.next_if(|kept| kept.line_number <= entry.line_number) {
                self.ordered.push(kept);
            }
            self.ordered.push(entry);
        }
        self.ordered.extend(existing);
        self.dirty.lower_to(first);
    }

    /// Drop tombstones and rebuild index, max height and prefix sum for every
    /// entry at or after `from`.
    fn recompute_from(&mut self, from: usize) {
        let mut from = from.min(self.ordered.len());
        // A line's run must be recomputed as a whole.
        while from > 0
            && from < self.ordered.len()
            && self.ordered[from - 1].line_number == self.ordered[from].line_number
        {
            from -= 1;
        }

        let default = self.default_line_height;
        let mut tail = self
            .ordered
            .split_off(from)
            .into_iter()
            .filter(|entry| !entry.deleted)
            .peekable();
        while let Some(first) = tail.next() {
            let line_number = first.line_number;
            let mut run = vec![first];
            while let Some(next) = tail.next_if(|entry| entry.line_number == line_number) {
                run.push(next);
            }
            let maximum_special_height = run
                .iter()
                .map(|entry| entry.special_height)
                .max()
                .unwrap_or(default);
            let prefix_sum = match self.ordered.last() {
                Some(previous) => {
                    previous.prefix_sum
                        + previous.maximum_special_height
                        + default
                            * (Pixels::from(line_number) - Pixels::from(previous.line_number) - 1)
                }
                None => default * (Pixels::from(line_number) - 1),
            };
            for mut entry in run {
                entry.index = self.ordered.len();
                entry.maximum_special_height = maximum_special_height;
                entry.prefix_sum = prefix_sum;
                self.ordered.push(entry);
            }
        }

        self.by_decoration.clear();
        for (index, entry) in self.ordered.iter().enumerate() {
            self.by_decoration
                .entry(entry.decoration_id.clone())
                .or_default()
                .push(index);
        }
    }
}

#[cfg(test)]
#[path = "line_heights_tests.rs"]
mod tests;
