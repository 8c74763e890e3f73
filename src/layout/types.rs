//! Core layout scalars and the prefix-sum invalidation watermark

/// 1-based line number. `0` addresses the position above the first line.
pub type LineNumber = u32;

/// Pixel quantity: heights, vertical offsets and prefix sums.
pub type Pixels = i64;

/// Lowest index whose cached prefix sum is stale.
///
/// Both prefix-sum caches (custom line heights and whitespace heights) track
/// invalidation with a single watermark: everything below the index is
/// trusted, everything at or above it is recomputed on the next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirtyFrom {
    /// Every cached prefix sum is valid.
    #[default]
    Clean,
    /// Entries at or after this index must be recomputed.
    From(usize),
}

impl DirtyFrom {
    /// Lower the watermark to `index`. Never raises it.
    pub fn lower_to(&mut self, index: usize) {
        *self = match *self {
            DirtyFrom::Clean => DirtyFrom::From(index),
            DirtyFrom::From(current) => DirtyFrom::From(current.min(index)),
        };
    }

    /// Record that every entry up to and including `index` is valid again.
    ///
    /// Becomes `Clean` once the watermark passes the end of a sequence of
    /// `len` entries.
    pub fn advance_past(&mut self, index: usize, len: usize) {
        if let DirtyFrom::From(current) = *self {
            let next = current.max(index + 1);
            *self = if next >= len {
                DirtyFrom::Clean
            } else {
                DirtyFrom::From(next)
            };
        }
    }

    /// First stale index, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            DirtyFrom::Clean => None,
            DirtyFrom::From(index) => Some(*index),
        }
    }

    /// Check if nothing is stale.
    pub fn is_clean(&self) -> bool {
        matches!(self, DirtyFrom::Clean)
    }
}
