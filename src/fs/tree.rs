use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::entry::{list_children, subtree_prefix, Entry};

/// Direction for a manual reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// The flattened view: every visible entry in one ordered sequence.
///
/// Sorting by [`Entry::sort_key`] keeps each expanded directory's subtree
/// contiguous and directly after the directory, so no parent/child links
/// are stored. Manual reorders via [`TreeStore::move_entry`] break that
/// order on purpose; `ordering_dirty` records it, and the next expand,
/// collapse, insert or [`TreeStore::sort`] throws the manual order away.
#[derive(Debug, Default)]
pub struct TreeStore {
    entries: Vec<Entry>,
    ordering_dirty: bool,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Whether a manual reorder is currently overriding the sorted order.
    pub fn ordering_dirty(&self) -> bool {
        self.ordering_dirty
    }

    /// Drop every entry (used when changing the working directory).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.ordering_dirty = false;
    }

    /// Find the index of the entry with the given full path.
    pub fn position(&self, full_path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.full_path() == full_path)
    }

    /// List `dir` itself with `dir` as the containing path, as given.
    ///
    /// Used for `.` and for directories named on the command line.
    pub fn add_root(&mut self, dir: &Path) -> Result<usize> {
        let children = list_children(dir)?;
        let at = self.entries.len();
        Ok(self.splice_children(children, at))
    }

    /// Insert the immediate children of `entry` at `insert_at` (or at the end
    /// when out of range), then re-sort the whole sequence.
    ///
    /// On failure nothing is changed. Returns how many entries were added;
    /// children already present are skipped.
    pub fn expand(&mut self, entry: &Entry, insert_at: usize) -> Result<usize> {
        let children = list_children(&entry.full_path())?;
        Ok(self.splice_children(children, insert_at))
    }

    fn splice_children(&mut self, children: Vec<Entry>, insert_at: usize) -> usize {
        let present: HashSet<PathBuf> = self.entries.iter().map(Entry::full_path).collect();
        let fresh: Vec<Entry> = children
            .into_iter()
            .filter(|c| !present.contains(&c.full_path()))
            .collect();
        let added = fresh.len();
        let at = insert_at.min(self.entries.len());
        self.entries.splice(at..at, fresh);
        self.sort();
        added
    }

    /// Remove every entry below `entry`, matching `full_path + "/"` as a raw
    /// byte prefix. Returns how many entries were removed.
    pub fn collapse(&mut self, entry: &Entry) -> usize {
        let prefix = subtree_prefix(entry);
        let before = self.entries.len();
        self.entries.retain(|e| !e.is_below(&prefix));
        self.sort();
        before - self.entries.len()
    }

    /// Whether any entry currently sits below `entry`.
    pub fn is_open(&self, entry: &Entry) -> bool {
        let prefix = subtree_prefix(entry);
        self.entries.iter().any(|e| e.is_below(&prefix))
    }

    /// Swap the entry at `index` with its neighbour. Returns the entry's new
    /// index, or `None` if there is no neighbour in that direction.
    ///
    /// The result is intentionally left unsorted.
    pub fn move_entry(&mut self, index: usize, direction: Direction) -> Option<usize> {
        if index >= self.entries.len() {
            return None;
        }
        let target = match direction {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => {
                let next = index + 1;
                if next >= self.entries.len() {
                    return None;
                }
                next
            }
        };
        self.entries.swap(index, target);
        self.ordering_dirty = true;
        Some(target)
    }

    /// Re-establish the prefix-ordering invariant.
    pub fn sort(&mut self) {
        self.entries.sort_by_cached_key(Entry::sort_key);
        self.ordering_dirty = false;
    }

    /// Add a single entry (unless already present) and re-sort. Returns the
    /// entry's index afterwards.
    pub fn insert(&mut self, entry: Entry) -> usize {
        let full = entry.full_path();
        if self.position(&full).is_none() {
            self.entries.push(entry);
        }
        self.sort();
        self.position(&full).unwrap_or(0)
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Entry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }
}
