use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Widget},
};

use crate::fs::entry::{Entry, EntryKind};
use crate::theme::ThemeColors;
use crate::viewport::Surface;

/// Draws viewport lines into a region of a ratatui buffer.
///
/// The containing path is shown in the plain file color and the name in the
/// color of its kind; the selected line is drawn in the selection colors.
pub struct TreeSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    theme: &'a ThemeColors,
}

impl<'a> TreeSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, theme: &'a ThemeColors) -> Self {
        Self { buf, area, theme }
    }

    fn name_style(&self, kind: EntryKind) -> Style {
        let style = Style::default().fg(self.theme.kind_fg(kind));
        if kind == EntryKind::Dir {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    fn line_for(&self, entry: &Entry, highlighted: bool) -> Line<'static> {
        let display = entry.display();
        let name = entry.name_lossy();
        let prefix = display
            .strip_suffix(name.as_str())
            .unwrap_or_default()
            .to_string();

        if highlighted {
            let style = Style::default()
                .bg(self.theme.selected_bg)
                .fg(self.theme.selected_fg)
                .add_modifier(Modifier::BOLD);
            return Line::from(Span::styled(display, style)).style(style);
        }

        Line::from(vec![
            Span::styled(prefix, Style::default().fg(self.theme.file_fg)),
            Span::styled(name, self.name_style(entry.kind)),
        ])
    }
}

impl Surface for TreeSurface<'_> {
    fn clear(&mut self) {
        Clear.render(self.area, self.buf);
    }

    fn write_line(&mut self, row: usize, entry: &Entry, highlighted: bool) {
        let Ok(row) = u16::try_from(row) else {
            return;
        };
        if row >= self.area.height {
            return;
        }
        let line = self.line_for(entry, highlighted);
        let line_area = Rect::new(self.area.x, self.area.y + row, self.area.width, 1);
        if highlighted {
            self.buf.set_style(line_area, line.style);
        }
        self.buf
            .set_line(line_area.x, line_area.y, &line, line_area.width);
    }
}
