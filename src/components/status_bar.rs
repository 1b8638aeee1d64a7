use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Label drawn in front of the search input.
pub const SEARCH_PROMPT: &str = "search >> ";

const KEY_HINTS: &str = " j/k:move  enter:open  d:del  u:undo  /:search  q:quit ";

/// Single-row status bar: working directory and position, a transient
/// message, or the search prompt.
pub struct StatusBarWidget<'a> {
    cwd: &'a str,
    position: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
    prompt: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(cwd: &'a str, position: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            cwd,
            position,
            theme,
            status_message: None,
            is_error: false,
            prompt: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    /// Show the search prompt with `input` instead of the normal bar.
    pub fn prompt(mut self, input: &'a str) -> Self {
        self.prompt = Some(input);
        self
    }
}

/// Keep at most `width` characters, preferring the end of `s`.
fn tail_chars(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count <= width {
        return s.to_string();
    }
    if width <= 3 {
        return s.chars().skip(count - width).collect();
    }
    let tail: String = s.chars().skip(count - (width - 3)).collect();
    format!("...{tail}")
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let base = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), base);

        if let Some(input) = self.prompt {
            let line = Line::from(vec![
                Span::styled(
                    SEARCH_PROMPT,
                    base.fg(self.theme.accent_fg).add_modifier(Modifier::BOLD),
                ),
                Span::styled(input, base),
            ]);
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                base.fg(self.theme.success_fg)
            };
            let display: String = msg.chars().take(width).collect();
            let display = format!("{:<width$}", display, width = width);
            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [cwd] [position] [key_hints]
        let hints = if KEY_HINTS.len() + self.position.len() + 8 <= width {
            KEY_HINTS
        } else {
            ""
        };
        let remaining = width
            .saturating_sub(hints.len())
            .saturating_sub(self.position.len() + 1);
        let cwd_display = tail_chars(self.cwd, remaining);
        let gap = width
            .saturating_sub(hints.len())
            .saturating_sub(cwd_display.chars().count())
            .saturating_sub(self.position.len());

        let line = Line::from(vec![
            Span::styled(cwd_display, base.add_modifier(Modifier::BOLD)),
            Span::styled(" ".repeat(gap), base),
            Span::styled(self.position, base.fg(self.theme.accent_fg)),
            Span::styled(hints, base.add_modifier(Modifier::DIM)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
