use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::fs::tree::TreeStore;

/// Compile `pattern` the way every search does: case-insensitive.
pub fn compile(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Scan the store circularly, starting right after `from` and ending on
/// `from` itself, for the first entry whose full path matches.
pub fn find_from(store: &TreeStore, from: usize, regex: &Regex) -> Option<usize> {
    let len = store.len();
    if len == 0 {
        return None;
    }
    (1..=len)
        .map(|offset| (from + offset) % len)
        .find(|&i| {
            store
                .get(i)
                .map(|e| regex.is_match(&e.full_path().to_string_lossy()))
                .unwrap_or(false)
        })
}

/// The last successfully compiled search pattern.
#[derive(Debug, Default)]
pub struct Search {
    last: Option<Regex>,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source text of the remembered pattern.
    pub fn pattern(&self) -> Option<&str> {
        self.last.as_ref().map(Regex::as_str)
    }

    /// Compile `pattern`, remember it, and look for the next match after
    /// `selected`.
    ///
    /// An empty pattern does nothing and keeps the previous one. A pattern
    /// that fails to compile is returned as an error and also leaves the
    /// previous one in place.
    pub fn find_next(
        &mut self,
        store: &TreeStore,
        selected: usize,
        pattern: &str,
    ) -> Result<Option<usize>> {
        if pattern.is_empty() {
            return Ok(None);
        }
        let regex = compile(pattern)?;
        let found = find_from(store, selected, &regex);
        self.last = Some(regex);
        Ok(found)
    }

    /// Search again with the remembered pattern.
    pub fn repeat(&self, store: &TreeStore, selected: usize) -> Option<usize> {
        self.last
            .as_ref()
            .and_then(|regex| find_from(store, selected, regex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::fs::entry::{Entry, EntryKind};

    fn sample_store() -> TreeStore {
        let mut store = TreeStore::new();
        store.insert(Entry::new("a", "1", EntryKind::File));
        store.insert(Entry::new("a", "2", EntryKind::File));
        store.insert(Entry::new("b", "3", EntryKind::File));
        store
    }

    #[test]
    fn finds_match_after_selection() {
        let store = sample_store();
        let mut search = Search::new();
        // selection on a/2
        assert_eq!(search.find_next(&store, 1, "b").unwrap(), Some(2));
    }

    #[test]
    fn wraps_around_to_start() {
        let store = sample_store();
        let mut search = Search::new();
        assert_eq!(search.find_next(&store, 2, "a/1").unwrap(), Some(0));
    }

    #[test]
    fn no_match_returns_none() {
        let store = sample_store();
        let mut search = Search::new();
        assert_eq!(search.find_next(&store, 1, "zzz").unwrap(), None);
    }

    #[test]
    fn current_entry_is_checked_last() {
        let store = sample_store();
        let mut search = Search::new();
        assert_eq!(search.find_next(&store, 2, "b/3").unwrap(), Some(2));
        assert_eq!(search.find_next(&store, 0, "a").unwrap(), Some(1));
    }

    #[test]
    fn case_insensitive() {
        let store = sample_store();
        let mut search = Search::new();
        assert_eq!(search.find_next(&store, 0, "B/3").unwrap(), Some(2));
    }

    #[test]
    fn extended_syntax_supported() {
        let store = sample_store();
        let mut search = Search::new();
        assert_eq!(search.find_next(&store, 0, "^b/[0-9]+$").unwrap(), Some(2));
    }

    #[test]
    fn empty_pattern_keeps_previous() {
        let store = sample_store();
        let mut search = Search::new();
        search.find_next(&store, 0, "b").unwrap();
        assert_eq!(search.find_next(&store, 0, "").unwrap(), None);
        assert_eq!(search.pattern(), Some("b"));
        assert_eq!(search.repeat(&store, 0), Some(2));
    }

    #[test]
    fn invalid_pattern_is_error_and_keeps_previous() {
        let store = sample_store();
        let mut search = Search::new();
        search.find_next(&store, 0, "a/2").unwrap();
        let err = search.find_next(&store, 0, "(unclosed").unwrap_err();
        assert!(matches!(err, AppError::Pattern(_)));
        assert_eq!(search.pattern(), Some("a/2"));
    }

    #[test]
    fn repeat_without_pattern_is_none() {
        let store = sample_store();
        let search = Search::new();
        assert_eq!(search.repeat(&store, 0), None);
    }

    #[test]
    fn empty_store_never_matches() {
        let store = TreeStore::new();
        let mut search = Search::new();
        assert_eq!(search.find_next(&store, 0, ".").unwrap(), None);
    }
}
