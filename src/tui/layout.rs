//! Root layout computation: input fields, results, detail panel, status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Height of the single-line letters field including its border.
pub const QUERY_HEIGHT: u16 = 3;
/// Hide the detail panel below this terminal width.
pub const DETAIL_MIN_WIDTH: u16 = 60;
/// Width of the detail panel when shown.
pub const DETAIL_WIDTH_PERCENT: u16 = 45;

/// Computed layout regions for a single frame.
#[derive(Debug, Clone, Copy)]
pub struct SearchLayout {
    /// Multi-line text area.
    pub text: Rect,
    /// Letters (substring) field.
    pub query: Rect,
    /// Matched word list.
    pub results: Rect,
    /// Annotation detail (None if hidden or too narrow).
    pub detail: Option<Rect>,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl SearchLayout {
    pub fn compute(area: Rect, show_detail: bool) -> Self {
        let rows = Layout::vertical([
            Constraint::Percentage(40),
            Constraint::Length(QUERY_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        let (results, detail) = if show_detail && area.width >= DETAIL_MIN_WIDTH {
            let cols = Layout::horizontal([
                Constraint::Percentage(100 - DETAIL_WIDTH_PERCENT),
                Constraint::Percentage(DETAIL_WIDTH_PERCENT),
            ])
            .split(rows[2]);
            (cols[0], Some(cols[1]))
        } else {
            (rows[2], None)
        };

        SearchLayout {
            text: rows[0],
            query: rows[1],
            results,
            detail,
            status: rows[3],
        }
    }
}
