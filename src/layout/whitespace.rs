//! Whitespace zones, their staging buffer and the batch accessor traits

use super::identifiers::{DecorationId, WhitespaceId};
use super::types::{LineNumber, Pixels};

/// A vertical gap anchored after a line.
///
/// `after_line_number == 0` places the gap above the first line.
/// Whitespaces anchored after the same line are ordered by `ordinal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitespace {
    id: WhitespaceId,
    after_line_number: LineNumber,
    ordinal: i32,
    height: Pixels,
    min_width: Pixels,
    /// Accumulated whitespace height up to and including this entry.
    /// Only meaningful below the owning layout's dirty watermark.
    prefix_sum: Pixels,
}

impl Whitespace {
    pub(crate) fn new(
        id: WhitespaceId,
        after_line_number: LineNumber,
        ordinal: i32,
        height: Pixels,
        min_width: Pixels,
    ) -> Self {
        Self {
            id,
            after_line_number,
            ordinal,
            height,
            min_width,
            prefix_sum: 0,
        }
    }

    pub fn id(&self) -> WhitespaceId {
        self.id
    }

    pub fn after_line_number(&self) -> LineNumber {
        self.after_line_number
    }

    pub fn ordinal(&self) -> i32 {
        self.ordinal
    }

    pub fn height(&self) -> Pixels {
        self.height
    }

    pub fn min_width(&self) -> Pixels {
        self.min_width
    }

    pub fn prefix_sum(&self) -> Pixels {
        self.prefix_sum
    }

    pub(crate) fn set_after_line_number(&mut self, after_line_number: LineNumber) {
        self.after_line_number = after_line_number;
    }

    pub(crate) fn set_height(&mut self, height: Pixels) {
        self.height = height;
    }

    pub(crate) fn set_prefix_sum(&mut self, prefix_sum: Pixels) {
        self.prefix_sum = prefix_sum;
    }

    /// Sort key: `(after_line_number, ordinal)`.
    pub(crate) fn sort_key(&self) -> (LineNumber, i32) {
        (self.after_line_number, self.ordinal)
    }
}

/// A staged change to an existing whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingChange {
    pub id: WhitespaceId,
    pub new_after_line_number: LineNumber,
    pub new_height: Pixels,
}

/// Everything staged since the last commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StagedChanges {
    pub inserts: Vec<Whitespace>,
    pub changes: Vec<PendingChange>,
    pub removes: Vec<WhitespaceId>,
}

impl StagedChanges {
    /// Total number of staged primitives.
    pub fn len(&self) -> usize {
        self.inserts.len() + self.changes.len() + self.removes.len()
    }
}

/// Batching buffer for whitespace mutations.
///
/// Two states: empty (`None`) or dirty (`Some(staged)`). Any staging call
/// makes it dirty; [`take`](PendingChanges::take) empties it.
#[derive(Debug, Clone, Default)]
pub(crate) struct PendingChanges(Option<StagedChanges>);

impl PendingChanges {
    pub fn insert(&mut self, whitespace: Whitespace) {
        self.staged().inserts.push(whitespace);
    }

    pub fn change(&mut self, change: PendingChange) {
        self.staged().changes.push(change);
    }

    pub fn remove(&mut self, id: WhitespaceId) {
        self.staged().removes.push(id);
    }

    pub fn must_commit(&self) -> bool {
        self.0.is_some()
    }

    /// Drain the buffer, returning to the empty state.
    pub fn take(&mut self) -> Option<StagedChanges> {
        self.0.take()
    }

    fn staged(&mut self) -> &mut StagedChanges {
        self.0.get_or_insert_with(StagedChanges::default)
    }
}

/// Mutation surface handed to `LinesLayout::change_whitespace` callbacks.
///
/// Every call is staged; the layout commits once when the callback returns.
pub trait WhitespaceAccessor {
    /// Stage a new whitespace and return its id.
    fn insert_whitespace(
        &mut self,
        after_line_number: LineNumber,
        ordinal: i32,
        height: Pixels,
        min_width: Pixels,
    ) -> WhitespaceId;

    /// Stage a new anchor and height for an existing whitespace.
    /// Unknown ids are ignored at commit time.
    fn change_one_whitespace(
        &mut self,
        id: WhitespaceId,
        new_after_line_number: LineNumber,
        new_height: Pixels,
    );

    /// Stage the removal of a whitespace. Unknown ids are ignored.
    fn remove_whitespace(&mut self, id: WhitespaceId);
}

/// Mutation surface handed to `LinesLayout::change_line_heights` callbacks.
pub trait LineHeightAccessor {
    /// Stage an override covering `[start_line_number, end_line_number]`,
    /// replacing any previous override of `decoration_id`.
    fn insert_or_change_custom_line_height(
        &mut self,
        decoration_id: &DecorationId,
        start_line_number: LineNumber,
        end_line_number: LineNumber,
        line_height: Pixels,
    );

    /// Stage the removal of every override owned by `decoration_id`.
    fn remove_custom_line_height(&mut self, decoration_id: &DecorationId);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitespace(sequence: u32, after: LineNumber, ordinal: i32) -> Whitespace {
        Whitespace::new(WhitespaceId::new(1, sequence), after, ordinal, 10, 0)
    }

    mod pending_changes {
        use super::*;

        #[test]
        fn starts_empty() {
            let mut pending = PendingChanges::default();
            assert!(!pending.must_commit());
            assert_eq!(pending.take(), None);
        }

        #[test]
        fn any_staging_call_makes_it_dirty() {
            let mut pending = PendingChanges::default();
            pending.remove(WhitespaceId::new(1, 1));
            assert!(pending.must_commit());
        }

        #[test]
        fn take_returns_everything_and_empties() {
            let mut pending = PendingChanges::default();
            pending.insert(whitespace(1, 3, 0));
            pending.change(PendingChange {
                id: WhitespaceId::new(1, 1),
                new_after_line_number: 4,
                new_height: 12,
            });
            pending.remove(WhitespaceId::new(1, 2));

            let staged = pending.take().expect("staged changes");
            assert_eq!(staged.inserts.len(), 1);
            assert_eq!(staged.changes.len(), 1);
            assert_eq!(staged.removes, vec![WhitespaceId::new(1, 2)]);
            assert_eq!(staged.len(), 3);
            assert!(!pending.must_commit());
        }
    }

    mod whitespace_record {
        use super::*;

        #[test]
        fn new_has_zero_prefix_sum() {
            let ws = whitespace(1, 5, 2);
            assert_eq!(ws.prefix_sum(), 0);
            assert_eq!(ws.sort_key(), (5, 2));
        }

        #[test]
        fn sort_key_orders_by_anchor_then_ordinal() {
            let a = whitespace(1, 5, 9);
            let b = whitespace(2, 6, 0);
            let c = whitespace(3, 5, 1);
            let mut all = [a.clone(), b.clone(), c.clone()];
            all.sort_by_key(Whitespace::sort_key);
            assert_eq!(all, [c, a, b]);
        }
    }
}
