//! Color theme for the Wordsift TUI.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

// ── Primary palette ─────────────────────────────────────────────────────────

/// Indigo: primary accent, focused borders.
pub const PRIMARY: Color = Color::Rgb(0x5C, 0x6B, 0xC0);
/// Light indigo: hints, secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x9F, 0xA8, 0xDA);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Amber: matches, calls to action.
pub const ACCENT: Color = Color::Rgb(0xFF, 0xC1, 0x07);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Charcoal: base background.
pub const BG_BASE: Color = Color::Rgb(0x12, 0x12, 0x1A);

// ── Text ────────────────────────────────────────────────────────────────────

/// Primary text.
pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
/// Muted text: secondary labels.
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
/// Dim text: placeholders, faint hints.
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);
pub const SUCCESS: Color = Color::Rgb(0x66, 0xBB, 0x6A);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
pub const INFO: Color = Color::Rgb(0x42, 0xA5, 0xF5);

// ── Style helpers ───────────────────────────────────────────────────────────

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Muted label text.
pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

/// Placeholder text in empty inputs.
pub fn placeholder() -> Style {
    Style::default().fg(TEXT_DIM).add_modifier(Modifier::ITALIC)
}

/// Key hint style (e.g., "q:quit").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Busy badge shown while a search is in flight.
pub fn busy_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY_LIGHT)
        .add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block, styled by whether it has focus.
pub fn block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border)
}
