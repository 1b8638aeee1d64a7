use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::AppError;
use crate::fs::backup::BackupManager;
use crate::fs::tree::{Direction, TreeStore};
use crate::opener::{self, Launcher, TerminalMode};
use crate::search::Search;
use crate::viewport::Viewport;

/// Application mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    /// Typing a search pattern on the status row.
    Search,
}

/// State for the inline prompt's text input.
#[derive(Debug, Default)]
pub struct PromptState {
    pub input: String,
    pub cursor_position: usize,
}

/// Behaviour switches taken from config and CLI flags.
#[derive(Debug, Clone)]
pub struct Options {
    pub open_external: bool,
    pub allow_delete: bool,
    pub editor: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            open_external: false,
            allow_delete: true,
            editor: None,
        }
    }
}

/// A transient message shown on the status row.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub created: Instant,
}

/// Main application state: one browsing session.
pub struct App {
    pub store: TreeStore,
    pub viewport: Viewport,
    pub backups: BackupManager,
    pub search: Search,
    pub options: Options,
    pub mode: AppMode,
    pub prompt: PromptState,
    pub status_message: Option<StatusMessage>,
    /// A file chosen for opening; handled by the main loop, which owns the
    /// terminal.
    pub pending_open: Option<PathBuf>,
    pub should_quit: bool,
}

impl App {
    /// Create an empty session for a terminal with `rows` rows.
    pub fn new(options: Options, backup_root: impl Into<PathBuf>, rows: u16) -> Self {
        Self {
            store: TreeStore::new(),
            viewport: Viewport::new(rows),
            backups: BackupManager::new(backup_root),
            search: Search::new(),
            options,
            mode: AppMode::Normal,
            prompt: PromptState::default(),
            status_message: None,
            pending_open: None,
            should_quit: false,
        }
    }

    /// List each of `roots`, then `.`, and center the selection.
    ///
    /// A root that cannot be listed is reported and skipped.
    pub fn load_roots(&mut self, roots: &[PathBuf]) {
        for root in roots.iter().map(PathBuf::as_path).chain([Path::new(".")]) {
            if let Err(e) = self.store.add_root(root) {
                self.report_error(&format!("Cannot list {}", root.display()), e);
            }
        }
        self.viewport.center_on_middle(self.store.len());
    }

    fn selected(&self) -> Option<usize> {
        self.viewport.selected(self.store.len())
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.viewport.move_down(self.store.len());
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        self.viewport.move_up(self.store.len());
    }

    /// Jump to the first item.
    pub fn select_first(&mut self) {
        self.viewport.select_first();
        self.viewport.clamp(self.store.len());
    }

    /// Jump to the last item.
    pub fn select_last(&mut self) {
        self.viewport.select_last(self.store.len());
    }

    /// Swap the selected entry with its neighbour; the selection follows it.
    pub fn move_selected(&mut self, direction: Direction) {
        let Some(index) = self.selected() else {
            return;
        };
        if let Some(target) = self.store.move_entry(index, direction) {
            self.viewport.select(target, self.store.len());
        }
    }

    /// Re-sort the store, keeping the selected entry selected.
    pub fn sort(&mut self) {
        let current = self
            .selected()
            .and_then(|i| self.store.get(i))
            .map(|e| e.full_path());
        self.store.sort();
        if let Some(index) = current.and_then(|p| self.store.position(&p)) {
            self.viewport.select(index, self.store.len());
        }
    }

    // ── Tree actions ────────────────────────────────────────────────────────

    /// Enter/Backspace: open a file, or toggle a directory in place.
    pub fn activate_selected(&mut self) {
        let Some(index) = self.selected() else {
            return;
        };
        let Some(entry) = self.store.get(index).cloned() else {
            return;
        };

        if !entry.is_dir() {
            self.pending_open = Some(entry.full_path());
            return;
        }

        if self.store.is_open(&entry) {
            let removed = self.store.collapse(&entry);
            tracing::debug!(dir = %entry.full_path().display(), removed, "collapsed");
        } else {
            match self.store.expand(&entry, index + 1) {
                Ok(added) => {
                    tracing::debug!(dir = %entry.full_path().display(), added, "expanded")
                }
                Err(e) => {
                    self.report_error(&format!("Cannot open {}", entry.display()), e);
                    return;
                }
            }
        }

        // The toggled directory keeps the cursor.
        if let Some(new_index) = self.store.position(&entry.full_path()) {
            self.viewport.select(new_index, self.store.len());
        }
    }

    /// Make the selected directory the working directory and list it afresh.
    pub fn change_dir_to_selected(&mut self) {
        let Some(entry) = self.selected().and_then(|i| self.store.get(i)).cloned() else {
            return;
        };
        if !entry.is_dir() {
            self.set_status_message(
                format!("Cannot change dir to {}: not a folder", entry.display()),
                true,
            );
            return;
        }
        let target = entry.full_path();
        if let Err(e) = std::env::set_current_dir(&target) {
            self.report_error(&format!("Cannot enter {}", entry.display()), e.into());
            return;
        }
        tracing::info!(dir = %target.display(), "changed directory");

        self.store.clear();
        if let Err(e) = self.store.add_root(Path::new(".")) {
            self.report_error("Cannot list .", e);
        }
        self.viewport.center_on_middle(self.store.len());
    }

    /// Soft-delete the selected file. The index is kept, so the next entry
    /// becomes selected.
    pub fn delete_selected(&mut self) {
        if !self.options.allow_delete {
            self.set_status_message("Delete is disabled".to_string(), true);
            return;
        }
        let Some(index) = self.selected() else {
            return;
        };
        match self.backups.soft_delete(&mut self.store, index) {
            Ok(entry) => {
                self.viewport.clamp(self.store.len());
                self.set_status_message(format!("Deleted {} (u to undo)", entry.display()), false);
            }
            Err(e) => self.report_error("Delete failed", e),
        }
    }

    /// Restore the most recent deletion and select it.
    pub fn undo(&mut self) {
        match self.backups.undo(&mut self.store) {
            Ok(Some((entry, index))) => {
                self.viewport.select(index, self.store.len());
                self.set_status_message(format!("Restored {}", entry.display()), false);
            }
            Ok(None) => {}
            Err(e) => self.report_error("Undo failed", e),
        }
    }

    // ── Search ──────────────────────────────────────────────────────────────

    /// Open the search prompt.
    pub fn begin_search(&mut self) {
        self.prompt = PromptState::default();
        self.mode = AppMode::Search;
    }

    /// Leave the prompt without searching.
    pub fn cancel_prompt(&mut self) {
        self.mode = AppMode::Normal;
        self.prompt = PromptState::default();
    }

    /// Run the typed pattern and jump to the first match after the selection.
    pub fn submit_search(&mut self) {
        let pattern = std::mem::take(&mut self.prompt).input;
        self.mode = AppMode::Normal;
        let from = self.selected().unwrap_or(0);
        match self.search.find_next(&self.store, from, &pattern) {
            Ok(Some(index)) => self.viewport.select(index, self.store.len()),
            Ok(None) if pattern.is_empty() => {}
            Ok(None) => self.set_status_message(format!("No match for {pattern}"), true),
            Err(e) => self.report_error("Search failed", e),
        }
    }

    /// Jump to the next match of the last pattern.
    pub fn search_next(&mut self) {
        let from = self.selected().unwrap_or(0);
        match self.search.repeat(&self.store, from) {
            Some(index) => self.viewport.select(index, self.store.len()),
            None => {
                if let Some(pattern) = self.search.pattern() {
                    let msg = format!("No match for {pattern}");
                    self.set_status_message(msg, true);
                }
            }
        }
    }

    // ── Opening ─────────────────────────────────────────────────────────────

    /// Open the file chosen by [`App::activate_selected`], if any.
    pub fn open_pending(
        &mut self,
        terminal: &mut impl TerminalMode,
        launcher: &mut impl Launcher,
    ) {
        let Some(path) = self.pending_open.take() else {
            return;
        };
        let plan = opener::plan(
            &path,
            self.options.open_external,
            self.options.editor.as_deref(),
        );
        match opener::open(&plan, &path, terminal, launcher) {
            Ok(Some(status)) if !status.success() => {
                self.set_status_message(format!("Editor exited with {status}"), true);
            }
            Ok(_) => {}
            Err(e) => self.report_error(&format!("Cannot open {}", path.display()), e),
        }
    }

    // ── Prompt input ────────────────────────────────────────────────────────

    /// Insert a character at the current cursor position.
    pub fn prompt_input_char(&mut self, c: char) {
        self.prompt.input.insert(self.prompt.cursor_position, c);
        self.prompt.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn prompt_delete_char(&mut self) {
        let pos = self.prompt.cursor_position;
        if let Some(prev) = self.prompt.input[..pos].chars().next_back() {
            self.prompt.cursor_position -= prev.len_utf8();
            self.prompt.input.remove(self.prompt.cursor_position);
        }
    }

    /// Move cursor left by one character.
    pub fn prompt_move_cursor_left(&mut self) {
        let pos = self.prompt.cursor_position;
        if let Some(prev) = self.prompt.input[..pos].chars().next_back() {
            self.prompt.cursor_position -= prev.len_utf8();
        }
    }

    /// Move cursor right by one character.
    pub fn prompt_move_cursor_right(&mut self) {
        let pos = self.prompt.cursor_position;
        if let Some(next) = self.prompt.input[pos..].chars().next() {
            self.prompt.cursor_position += next.len_utf8();
        }
    }

    pub fn prompt_cursor_home(&mut self) {
        self.prompt.cursor_position = 0;
    }

    pub fn prompt_cursor_end(&mut self) {
        self.prompt.cursor_position = self.prompt.input.len();
    }

    // ── Status ──────────────────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, text: String, is_error: bool) {
        self.status_message = Some(StatusMessage {
            text,
            is_error,
            created: Instant::now(),
        });
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some(msg) = &self.status_message {
            if msg.created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Log a recoverable failure and show it; nothing else changes.
    pub fn report_error(&mut self, context: &str, err: AppError) {
        tracing::warn!(error = %err, "{context}");
        self.set_status_message(format!("{context}: {err}"), true);
    }
}
