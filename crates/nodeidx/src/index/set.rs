use crate::types::Handle;
use derive_more::{Deref, IntoIterator};
use std::collections::HashSet;

///
/// HandleSet
///
/// Owned, unordered result of a subclass query. The caller owns it outright;
/// nothing in it aliases index storage.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
#[into_iterator(owned, ref)]
pub struct HandleSet(HashSet<Handle>);

impl HandleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Singleton set, or empty for `None`.
    #[must_use]
    pub fn from_option(handle: Option<Handle>) -> Self {
        Self(handle.into_iter().collect())
    }

    pub(crate) fn insert(&mut self, handle: Handle) -> bool {
        self.0.insert(handle)
    }

    /// Handles in ascending order, for callers that need a stable listing.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<Handle> {
        let mut handles: Vec<_> = self.0.iter().copied().collect();
        handles.sort_unstable();
        handles
    }

    #[must_use]
    pub fn into_inner(self) -> HashSet<Handle> {
        self.0
    }
}

impl FromIterator<Handle> for HandleSet {
    fn from_iter<I: IntoIterator<Item = Handle>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
