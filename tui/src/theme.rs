//! Color theme and glyphs for the Moodping TUI.
//!
//! A muted dusk palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use moodping_engine::moodping_config::UiOptions;

mod colors {
    use super::Color;

    pub const BG: Color = Color::Rgb(30, 28, 36);
    pub const BG_PANEL: Color = Color::Rgb(40, 37, 48);
    pub const BG_HIGHLIGHT: Color = Color::Rgb(58, 53, 70);
    pub const BG_POPUP: Color = Color::Rgb(66, 60, 80);

    pub const TEXT_PRIMARY: Color = Color::Rgb(232, 226, 214);
    pub const TEXT_MUTED: Color = Color::Rgb(140, 134, 150);
    pub const TEXT_DISABLED: Color = Color::Rgb(88, 84, 98);

    pub const BORDER_ACTIVE: Color = Color::Rgb(196, 160, 210);
    pub const BORDER_INACTIVE: Color = Color::Rgb(70, 66, 82);

    pub const ACCENT: Color = Color::Rgb(244, 180, 120);
    pub const SELECTED: Color = Color::Rgb(150, 200, 160);
    pub const ERROR: Color = Color::Rgb(240, 110, 110);
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub bg_popup: Color,
    pub text_primary: Color,
    pub text_muted: Color,
    pub text_disabled: Color,
    pub border_active: Color,
    pub border_inactive: Color,
    pub accent: Color,
    pub selected: Color,
    pub error: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg: colors::BG,
            bg_panel: colors::BG_PANEL,
            bg_highlight: colors::BG_HIGHLIGHT,
            bg_popup: colors::BG_POPUP,
            text_primary: colors::TEXT_PRIMARY,
            text_muted: colors::TEXT_MUTED,
            text_disabled: colors::TEXT_DISABLED,
            border_active: colors::BORDER_ACTIVE,
            border_inactive: colors::BORDER_INACTIVE,
            accent: colors::ACCENT,
            selected: colors::SELECTED,
            error: colors::ERROR,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            bg_popup: Color::Black,
            text_primary: Color::White,
            text_muted: Color::Gray,
            text_disabled: Color::DarkGray,
            border_active: Color::White,
            border_inactive: Color::DarkGray,
            accent: Color::Yellow,
            selected: Color::Green,
            error: Color::Red,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    /// Emoji are replaced by text labels when false.
    pub show_emoji: bool,
    pub cursor: &'static str,
    pub selected: &'static str,
    pub unselected: &'static str,
    pub level_filled: &'static str,
    pub level_empty: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            show_emoji: false,
            cursor: ">",
            selected: "(*)",
            unselected: "( )",
            level_filled: "#",
            level_empty: ".",
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            show_emoji: true,
            cursor: "▸",
            selected: "●",
            unselected: "○",
            level_filled: "●",
            level_empty: "○",
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    frames[tick % frames.len()]
}

pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn section_border(palette: &Palette, active: bool) -> Style {
        if active {
            Style::default().fg(palette.border_active)
        } else {
            Style::default().fg(palette.border_inactive)
        }
    }

    #[must_use]
    pub fn section_title(palette: &Palette, active: bool) -> Style {
        if active {
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_disabled)
        }
    }

    #[must_use]
    pub fn option(palette: &Palette, active: bool, selected: bool, focused: bool) -> Style {
        let mut style = if !active {
            Style::default().fg(palette.text_disabled)
        } else if selected {
            Style::default()
                .fg(palette.selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_primary)
        };
        if active && focused {
            style = style.bg(palette.bg_highlight);
        }
        style
    }

    #[must_use]
    pub fn button(palette: &Palette, enabled: bool, focused: bool) -> Style {
        if !enabled {
            return Style::default().fg(palette.text_disabled);
        }
        let style = Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD);
        if focused {
            style.bg(palette.bg_highlight)
        } else {
            style
        }
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }
}
