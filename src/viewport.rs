use crate::fs::entry::Entry;
use crate::fs::tree::TreeStore;

/// A line-oriented drawing target for the visible window of the store.
pub trait Surface {
    /// Clear the area and move to its first row.
    fn clear(&mut self);
    /// Draw `entry` on `row` (0-based within the window).
    fn write_line(&mut self, row: usize, entry: &Entry, highlighted: bool);
}

/// Selection and scroll position over a [`TreeStore`].
///
/// `height` is the number of rows available for entries; one terminal row is
/// always reserved for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    selected_index: usize,
    offset: usize,
    height: usize,
}

impl Viewport {
    /// Create a viewport for a terminal with `rows` rows.
    pub fn new(rows: u16) -> Self {
        let mut viewport = Self {
            selected_index: 0,
            offset: 0,
            height: 1,
        };
        viewport.resize(rows);
        viewport
    }

    /// The selected index, or `None` when the store is empty.
    pub fn selected(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.selected_index.min(len - 1))
    }

    #[cfg(test)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[cfg(test)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Record new terminal dimensions.
    pub fn resize(&mut self, rows: u16) {
        self.height = usize::from(rows).saturating_sub(1).max(1);
    }

    /// Point the selection at `index`, clamped to the store.
    pub fn select(&mut self, index: usize, len: usize) {
        self.selected_index = index;
        self.clamp(len);
    }

    /// Keep the selection inside `[0, len-1]` (or 0 for an empty store).
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected_index = 0;
            self.offset = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    pub fn move_up(&mut self, len: usize) {
        self.selected_index = self.selected_index.saturating_sub(1);
        self.clamp(len);
    }

    pub fn move_down(&mut self, len: usize) {
        if len > 0 && self.selected_index + 1 < len {
            self.selected_index += 1;
        }
        self.clamp(len);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected_index = len.saturating_sub(1);
    }

    /// Shift the window so the selection is on screen.
    pub fn scroll_to_keep_visible(&mut self) {
        if self.selected_index < self.offset {
            self.offset = self.selected_index;
        } else if self.selected_index >= self.offset + self.height {
            self.offset = self.selected_index + 1 - self.height;
        }
    }

    /// Put the selection in the middle of the store and center the window
    /// on it, unless everything fits on one screen.
    pub fn center_on_middle(&mut self, len: usize) {
        self.selected_index = len / 2;
        self.offset = if len <= self.height {
            0
        } else {
            self.selected_index.saturating_sub(self.height / 2)
        };
        self.clamp(len);
    }

    /// Index range currently on screen, clipped to the store.
    pub fn visible_range(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        let end = (self.offset + self.height).min(len);
        start..end
    }

    /// Draw the visible window onto `surface`, one line per entry.
    pub fn render(&mut self, store: &TreeStore, surface: &mut impl Surface) {
        self.clamp(store.len());
        self.scroll_to_keep_visible();
        surface.clear();
        let selected = self.selected(store.len());
        for (row, index) in self.visible_range(store.len()).enumerate() {
            if let Some(entry) = store.get(index) {
                surface.write_line(row, entry, Some(index) == selected);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::entry::EntryKind;

    #[derive(Default)]
    struct RecordingSurface {
        clears: usize,
        lines: Vec<(usize, String, bool)>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self) {
            self.clears += 1;
            self.lines.clear();
        }

        fn write_line(&mut self, row: usize, entry: &Entry, highlighted: bool) {
            self.lines.push((row, entry.display(), highlighted));
        }
    }

    fn store_of(n: usize) -> TreeStore {
        let mut store = TreeStore::new();
        for i in 0..n {
            store.insert(Entry::new(".", format!("f{i:03}"), EntryKind::File));
        }
        store
    }

    #[test]
    fn height_reserves_status_row() {
        assert_eq!(Viewport::new(24).height(), 23);
        assert_eq!(Viewport::new(1).height(), 1);
        assert_eq!(Viewport::new(0).height(), 1);
    }

    #[test]
    fn move_down_clamps_at_end() {
        let mut vp = Viewport::new(10);
        for _ in 0..10 {
            vp.move_down(3);
        }
        assert_eq!(vp.selected(3), Some(2));
    }

    #[test]
    fn move_up_clamps_at_start() {
        let mut vp = Viewport::new(10);
        vp.move_down(5);
        vp.move_up(5);
        vp.move_up(5);
        assert_eq!(vp.selected(5), Some(0));
    }

    #[test]
    fn empty_store_has_no_selection() {
        let mut vp = Viewport::new(10);
        vp.move_down(0);
        vp.move_up(0);
        vp.select_last(0);
        assert_eq!(vp.selected(0), None);

        let mut surface = RecordingSurface::default();
        vp.render(&TreeStore::new(), &mut surface);
        assert_eq!(surface.clears, 1);
        assert!(surface.lines.is_empty());
    }

    #[test]
    fn selection_stays_in_bounds_for_any_key_sequence() {
        let mut vp = Viewport::new(5);
        let len = 4;
        let moves = [1, 1, 1, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1];
        for m in moves {
            if m == 1 {
                vp.move_down(len);
            } else {
                vp.move_up(len);
            }
            let sel = vp.selected(len).unwrap();
            assert!(sel < len);
        }
    }

    #[test]
    fn clamp_after_shrink() {
        let mut vp = Viewport::new(10);
        vp.select(7, 8);
        vp.clamp(3);
        assert_eq!(vp.selected(3), Some(2));
    }

    #[test]
    fn scroll_follows_selection_down_and_up() {
        let mut vp = Viewport::new(6); // 5 entry rows
        vp.select(7, 20);
        vp.scroll_to_keep_visible();
        assert_eq!(vp.offset(), 3);

        vp.select(1, 20);
        vp.scroll_to_keep_visible();
        assert_eq!(vp.offset(), 1);
    }

    #[test]
    fn center_on_middle_small_store_starts_at_top() {
        let mut vp = Viewport::new(11);
        vp.center_on_middle(6);
        assert_eq!(vp.selected(6), Some(3));
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn center_on_middle_large_store_centers_window() {
        let mut vp = Viewport::new(11); // height 10
        vp.center_on_middle(100);
        assert_eq!(vp.selected(100), Some(50));
        assert_eq!(vp.offset(), 45);
    }

    #[test]
    fn render_writes_visible_window_with_highlight() {
        let store = store_of(10);
        let mut vp = Viewport::new(4); // 3 entry rows
        vp.select(5, store.len());
        let mut surface = RecordingSurface::default();
        vp.render(&store, &mut surface);

        assert_eq!(
            surface.lines,
            vec![
                (0, "f003".to_string(), false),
                (1, "f004".to_string(), false),
                (2, "f005".to_string(), true),
            ]
        );
    }

    #[test]
    fn render_clips_to_store_end() {
        let store = store_of(2);
        let mut vp = Viewport::new(10);
        let mut surface = RecordingSurface::default();
        vp.render(&store, &mut surface);
        assert_eq!(surface.lines.len(), 2);
        assert!(surface.lines[0].2);
    }
}
