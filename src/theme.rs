//! Theme data model: built-in palettes and resolution from config.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};
use crate::fs::entry::EntryKind;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Entries, by kind
    pub file_fg: Color,
    pub dir_fg: Color,
    pub symlink_fg: Color,
    pub other_fg: Color,

    // Selection highlight
    pub selected_bg: Color,
    pub selected_fg: Color,

    // Status row
    pub status_bg: Color,
    pub status_fg: Color,

    // Semantic colors (not configurable, consistent across themes)
    pub error_fg: Color,
    pub success_fg: Color,
    pub accent_fg: Color,
}

impl ThemeColors {
    /// Foreground color for an entry of the given kind.
    pub fn kind_fg(&self, kind: EntryKind) -> Color {
        match kind {
            EntryKind::File => self.file_fg,
            EntryKind::Dir => self.dir_fg,
            EntryKind::Symlink => self.symlink_fg,
            EntryKind::Other => self.other_fg,
        }
    }
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        file_fg: Color::Rgb(205, 214, 244),    // #cdd6f4 (text)
        dir_fg: Color::Rgb(137, 180, 250),     // #89b4fa (blue)
        symlink_fg: Color::Rgb(148, 226, 213), // #94e2d5 (teal)
        other_fg: Color::Rgb(249, 226, 175),   // #f9e2af (yellow)

        selected_bg: Color::Rgb(69, 71, 90), // #45475a (surface1)
        selected_fg: Color::Rgb(205, 214, 244),

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        accent_fg: Color::Rgb(203, 166, 247),  // #cba6f7 (mauve)
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        file_fg: Color::Rgb(76, 79, 105),     // #4c4f69 (text)
        dir_fg: Color::Rgb(30, 102, 245),     // #1e66f5 (blue)
        symlink_fg: Color::Rgb(23, 146, 153), // #179299 (teal)
        other_fg: Color::Rgb(223, 142, 29),   // #df8e1d (yellow)

        selected_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        selected_fg: Color::Rgb(76, 79, 105),

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),

        error_fg: Color::Rgb(210, 15, 57),   // #d20f39 (red)
        success_fg: Color::Rgb(64, 160, 43), // #40a02b (green)
        accent_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default): dark Catppuccin palette
/// - `"light"`: light Catppuccin palette
/// - `"custom"`: start from dark palette, then override with custom hex values
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

/// Apply custom hex color overrides on top of an existing theme.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let slots: [(&Option<String>, &mut Color); 8] = [
        (&custom.file_fg, &mut theme.file_fg),
        (&custom.dir_fg, &mut theme.dir_fg),
        (&custom.symlink_fg, &mut theme.symlink_fg),
        (&custom.other_fg, &mut theme.other_fg),
        (&custom.selected_bg, &mut theme.selected_bg),
        (&custom.selected_fg, &mut theme.selected_fg),
        (&custom.status_bg, &mut theme.status_bg),
        (&custom.status_fg, &mut theme.status_fg),
    ];
    for (value, slot) in slots {
        if let Some(color) = value.as_deref().and_then(parse_hex_color) {
            *slot = color;
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
