//! Distinct segment offsets, kept in the order they were first seen.

use std::{collections::HashSet, fmt, ops::Deref};

/// An insertion-ordered, deduplicated collection of segment offsets.
///
/// Only the decoder inserts into this collection. Callers observe it through [Deref]
/// to `[u64]` or by converting it into a [`Vec<u64>`].
#[derive(Clone, Default)]
pub struct Offsets {
    ordered: Vec<u64>,
    seen: HashSet<u64>,
}

impl Offsets {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `offset`, returning `true` if it was not seen before.
    pub(crate) fn insert(&mut self, offset: u64) -> bool {
        if !self.seen.insert(offset) {
            return false;
        }
        self.ordered.push(offset);
        true
    }

    /// Returns `true` if `offset` has been recorded.
    pub fn contains(&self, offset: u64) -> bool {
        self.seen.contains(&offset)
    }

    /// Returns the offsets as a slice, in first-seen order.
    pub fn as_slice(&self) -> &[u64] {
        &self.ordered
    }
}

impl Deref for Offsets {
    type Target = [u64];

    fn deref(&self) -> &Self::Target {
        &self.ordered
    }
}

impl fmt::Debug for Offsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ordered.iter()).finish()
    }
}

impl PartialEq for Offsets {
    fn eq(&self, other: &Self) -> bool {
        self.ordered == other.ordered
    }
}

impl Eq for Offsets {}

impl From<Offsets> for Vec<u64> {
    fn from(offsets: Offsets) -> Self {
        offsets.ordered
    }
}

impl IntoIterator for Offsets {
    type Item = u64;
    type IntoIter = std::vec::IntoIter<u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.into_iter()
    }
}

impl<'a> IntoIterator for &'a Offsets {
    type Item = &'a u64;
    type IntoIter = std::slice::Iter<'a, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.iter()
    }
}
