use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, AppMode};
use crate::fs::tree::Direction;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match app.mode {
        AppMode::Normal => handle_normal_key(app, key),
        AppMode::Search => handle_prompt_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            app.quit();
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('J') => app.move_selected(Direction::Down),
        KeyCode::Char('K') => app.move_selected(Direction::Up),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter | KeyCode::Backspace => app.activate_selected(),
        KeyCode::Char(' ') => app.change_dir_to_selected(),
        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('u') => app.undo(),
        KeyCode::Char('s') => app.sort(),
        KeyCode::Char('/') => app.begin_search(),
        KeyCode::Char('n') => app.search_next(),
        _ => {}
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.cancel_prompt();
        return;
    }

    match key.code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Backspace => app.prompt_delete_char(),
        KeyCode::Left => app.prompt_move_cursor_left(),
        KeyCode::Right => app.prompt_move_cursor_right(),
        KeyCode::Home => app.prompt_cursor_home(),
        KeyCode::End => app.prompt_cursor_end(),
        KeyCode::Char(c) => app.prompt_input_char(c),
        _ => {}
    }
}
