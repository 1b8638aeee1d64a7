use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};

use crate::error::Result;

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// Terminal resize event (columns, rows).
    Resize(u16, u16),
    /// Anything else the terminal reports (mouse, focus, paste).
    Other,
}

impl From<CrosstermEvent> for Event {
    fn from(event: CrosstermEvent) -> Self {
        match event {
            CrosstermEvent::Key(key) => Event::Key(key),
            CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
            _ => Event::Other,
        }
    }
}

/// Block until the terminal delivers the next event.
///
/// Window size changes arrive here as [`Event::Resize`] alongside key
/// presses, so they are handled between keys like everything else.
pub fn next_event() -> Result<Event> {
    Ok(event::read()?.into())
}
