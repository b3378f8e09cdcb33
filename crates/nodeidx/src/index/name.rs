use crate::types::Handle;
use std::collections::HashMap;

///
/// NameIndex
///
/// Exact-match registry of name -> handle for a single node type.
/// At most one handle per name. A reverse handle -> name map keeps
/// removal by handle O(1) and is maintained in lockstep with the forward map.
///

#[derive(Clone, Debug, Default)]
pub struct NameIndex {
    by_name: HashMap<String, Handle>,
    by_handle: HashMap<Handle, String>,
}

impl NameIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_name: HashMap::with_capacity(capacity),
            by_handle: HashMap::with_capacity(capacity),
        }
    }

    /// Associate `handle` with `name`, replacing any previous handle.
    ///
    /// Returns the handle that was displaced, if it differs from `handle`.
    pub fn insert(&mut self, name: &str, handle: Handle) -> Option<Handle> {
        let displaced = self
            .by_name
            .insert(name.to_string(), handle)
            .filter(|prev| *prev != handle);
        if let Some(prev) = displaced {
            self.by_handle.remove(&prev);
        }

        // A handle filed under another name loses that name.
        if let Some(old_name) = self.by_handle.insert(handle, name.to_string())
            && old_name != name
        {
            self.by_name.remove(&old_name);
        }

        displaced
    }

    /// Remove the entry holding `handle`. Unknown handles are a no-op.
    pub fn remove(&mut self, handle: Handle) -> bool {
        match self.by_handle.remove(&handle) {
            Some(name) => {
                self.by_name.remove(&name);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Handle> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn contains_handle(&self, handle: Handle) -> bool {
        self.by_handle.contains_key(&handle)
    }

    /// Remove every entry whose handle satisfies `predicate`.
    ///
    /// Each entry is offered to the predicate exactly once. Returns the
    /// number of entries removed.
    pub fn remove_if(&mut self, mut predicate: impl FnMut(Handle) -> bool) -> usize {
        let before = self.by_name.len();
        let by_handle = &mut self.by_handle;

        self.by_name.retain(|_, handle| {
            let handle = *handle;
            if predicate(handle) {
                by_handle.remove(&handle);
                false
            } else {
                true
            }
        });

        before - self.by_name.len()
    }

    pub fn clear(&mut self) {
        self.by_name.clear();
        self.by_handle.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterate name/handle pairs in arbitrary order (diagnostics only).
    pub fn iter(&self) -> impl Iterator<Item = (&str, Handle)> {
        self.by_name
            .iter()
            .map(|(name, handle)| (name.as_str(), *handle))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn h(raw: u64) -> Handle {
        Handle(raw)
    }

    #[test]
    fn get_returns_inserted_handle() {
        let mut idx = NameIndex::new();
        assert_eq!(idx.insert("alpha", h(1)), None);

        assert_eq!(idx.get("alpha"), Some(h(1)));
        assert_eq!(idx.get("beta"), None);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn insert_overwrites_and_reports_displaced() {
        let mut idx = NameIndex::new();
        idx.insert("alpha", h(1));

        assert_eq!(idx.insert("alpha", h(2)), Some(h(1)));
        assert_eq!(idx.get("alpha"), Some(h(2)));
        assert!(!idx.contains_handle(h(1)));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn reinserting_same_pair_displaces_nothing() {
        let mut idx = NameIndex::new();
        idx.insert("alpha", h(1));

        assert_eq!(idx.insert("alpha", h(1)), None);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn removing_displaced_handle_keeps_newer_entry() {
        let mut idx = NameIndex::new();
        idx.insert("alpha", h(1));
        idx.insert("alpha", h(2));

        assert!(!idx.remove(h(1)));
        assert_eq!(idx.get("alpha"), Some(h(2)));
    }

    #[test]
    fn handle_moved_to_new_name_drops_old_name() {
        let mut idx = NameIndex::new();
        idx.insert("alpha", h(1));
        idx.insert("beta", h(1));

        assert_eq!(idx.get("alpha"), None);
        assert_eq!(idx.get("beta"), Some(h(1)));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn remove_unknown_handle_is_noop() {
        let mut idx = NameIndex::new();
        idx.insert("alpha", h(1));

        assert!(!idx.remove(h(99)));
        assert_eq!(idx.get("alpha"), Some(h(1)));
    }

    #[test]
    fn remove_if_visits_each_entry_once() {
        let mut idx = NameIndex::with_capacity(8);
        for raw in 1..=6 {
            idx.insert(&format!("n{raw}"), h(raw));
        }

        let mut visited = Vec::new();
        let removed = idx.remove_if(|handle| {
            visited.push(handle);
            handle.0 % 2 == 0
        });

        visited.sort();
        assert_eq!(visited, (1..=6).map(h).collect::<Vec<_>>());
        assert_eq!(removed, 3);
        assert_eq!(idx.len(), 3);
        assert!(!idx.contains_handle(h(4)));
        assert_eq!(idx.get("n5"), Some(h(5)));
    }

    #[test]
    fn remove_if_with_no_matches_is_noop() {
        let mut idx = NameIndex::new();
        assert_eq!(idx.remove_if(|_| true), 0);

        idx.insert("alpha", h(1));
        assert_eq!(idx.remove_if(|_| false), 0);
        assert_eq!(idx.get("alpha"), Some(h(1)));
    }
}
