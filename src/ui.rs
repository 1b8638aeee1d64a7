use ratatui::{
    layout::{Constraint, Layout, Position},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::status_bar::{StatusBarWidget, SEARCH_PROMPT};
use crate::components::tree::TreeSurface;
use crate::theme::ThemeColors;

/// Position summary for the status bar, e.g. `4/17 [manual order] undo:2`.
fn position_info(app: &App) -> String {
    let len = app.store.len();
    let mut info = match app.viewport.selected(len) {
        Some(i) => format!("{}/{}", i + 1, len),
        None => "empty".to_string(),
    };
    if app.store.ordering_dirty() {
        info.push_str(" [manual order]");
    }
    if !app.backups.is_empty() {
        info.push_str(&format!(" undo:{}", app.backups.len()));
    }
    info
}

/// Render the application UI.
pub fn render(app: &mut App, theme: &ThemeColors, frame: &mut Frame) {
    let [tree_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    {
        let mut surface = TreeSurface::new(frame.buffer_mut(), tree_area, theme);
        app.viewport.render(&app.store, &mut surface);
    }

    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "?".to_string());
    let position = position_info(app);
    let mut status = StatusBarWidget::new(&cwd, &position, theme);
    if let Some(msg) = &app.status_message {
        status = status.status_message(&msg.text, msg.is_error);
    }
    if app.mode == AppMode::Search {
        status = status.prompt(&app.prompt.input);
        let typed = app.prompt.input[..app.prompt.cursor_position].chars().count();
        let x = status_area.x as usize + SEARCH_PROMPT.len() + typed;
        let x = u16::try_from(x).unwrap_or(u16::MAX).min(status_area.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(x, status_area.y));
    }
    frame.render_widget(status, status_area);
}
