//! TUI rendering and input handling for Moodping using ratatui.

mod bridge;
mod input;
mod labels;
mod markup;
mod sanitize;
mod screen;
mod theme;
mod ui;

pub use bridge::{Notice, TerminalView, ViewUpdates, view_channel};
pub use input::{InputPump, handle_events};
pub use labels::{Labels, labels};
pub use markup::markup_to_lines;
pub use sanitize::sanitize_terminal_text;
pub use screen::{Focus, Screen};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};
pub use ui::draw;
