//! Search view: text area, letters field, match list, annotation detail.
//!
//! `Tab`/`Shift+Tab` cycle the three panes. In the text area `Enter` inserts
//! a newline; in the letters field it runs the search. In the results pane
//! `j`/`k` move the selection and `Enter` toggles the detail panel.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc;

use crate::core::morphology::MorphologyRecord;
use crate::core::pipeline::{MessageLevel, SearchOutcome, SearchRequest};
use crate::tui::events::{Focus, NotificationLevel};
use crate::tui::layout::SearchLayout;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::InputBuffer;

/// Characters of a raw model response shown under a format error.
const RAW_EXCERPT_CHARS: usize = 200;

// ── Internal async data events ─────────────────────────────────────────────

enum SearchDataEvent {
    /// Result of the search started as `generation`.
    Completed {
        generation: u64,
        outcome: SearchOutcome,
    },
}

// ── State ──────────────────────────────────────────────────────────────────

pub struct SearchViewState {
    // Inputs
    text: InputBuffer,
    query: InputBuffer,
    focus: Focus,
    annotate: bool,

    // Results
    outcome: Option<SearchOutcome>,
    selected: usize,
    show_detail: bool,

    // In-flight search; results from older generations are dropped.
    busy: bool,
    generation: u64,

    // Async channel
    data_tx: mpsc::UnboundedSender<SearchDataEvent>,
    data_rx: mpsc::UnboundedReceiver<SearchDataEvent>,
}

impl SearchViewState {
    pub fn new(annotate: bool) -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            text: InputBuffer::new(),
            query: InputBuffer::new(),
            focus: Focus::Text,
            annotate,
            outcome: None,
            selected: 0,
            show_detail: false,
            busy: false,
            generation: 0,
            data_tx,
            data_rx,
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn annotate(&self) -> bool {
        self.annotate
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    /// Start a search with the current inputs on a background task.
    pub fn submit(&mut self, services: &Services) {
        if self.busy {
            services.notify("A search is already running.", NotificationLevel::Info);
            return;
        }

        // Tokens never hold whitespace, so padding around the letters is dropped.
        let request = SearchRequest::new(self.text.text(), self.query.text().trim())
            .with_annotation(self.annotate);
        self.generation += 1;
        self.busy = true;

        let pipeline = services.pipeline.clone();
        let tx = self.data_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = pipeline.run(request).await;
            let _ = tx.send(SearchDataEvent::Completed {
                generation,
                outcome,
            });
        });
    }

    pub fn toggle_annotate(&mut self, services: &Services) {
        self.annotate = !self.annotate;
        let message = if !self.annotate {
            "Morphological annotation off."
        } else if services.pipeline.can_annotate() {
            "Morphological annotation on."
        } else {
            "Annotation on, but the morphology service is not configured."
        };
        services.notify(message, NotificationLevel::Info);
    }

    /// Reset inputs and results. A search still in flight is discarded.
    pub fn clear(&mut self) {
        self.text.clear();
        self.query.clear();
        self.outcome = None;
        self.selected = 0;
        self.show_detail = false;
        self.busy = false;
        self.generation += 1;
        self.focus = Focus::Text;
    }

    pub fn poll(&mut self, services: &Services) {
        while let Ok(event) = self.data_rx.try_recv() {
            match event {
                SearchDataEvent::Completed {
                    generation,
                    outcome,
                } => {
                    if generation != self.generation {
                        log::debug!("Dropping stale search result (generation {generation})");
                        continue;
                    }
                    self.busy = false;
                    self.apply_outcome(outcome, services);
                }
            }
        }
    }

    fn apply_outcome(&mut self, outcome: SearchOutcome, services: &Services) {
        for message in &outcome.messages {
            let level = match message.level() {
                MessageLevel::Warning => NotificationLevel::Warning,
                MessageLevel::Error => NotificationLevel::Error,
            };
            services.notify(message.to_string(), level);
        }
        if outcome.messages.is_empty() {
            if let Some(summary) = outcome.summary() {
                services.notify(summary, NotificationLevel::Success);
            }
        }

        self.selected = 0;
        self.outcome = Some(outcome);
    }

    fn word_count(&self) -> usize {
        self.outcome.as_ref().map_or(0, |o| o.words.len())
    }

    fn selected_word(&self) -> Option<&str> {
        self.outcome
            .as_ref()
            .and_then(|o| o.words.get(self.selected))
            .map(String::as_str)
    }

    // ── Input handling ─────────────────────────────────────────────────────

    /// Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        if let Event::Paste(pasted) = event {
            return self.handle_paste(pasted);
        }

        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match (*modifiers, *code) {
            (_, KeyCode::Tab) => {
                self.focus = self.focus.next();
                return true;
            }
            (_, KeyCode::BackTab) => {
                self.focus = self.focus.prev();
                return true;
            }
            _ => {}
        }

        match self.focus {
            Focus::Text => self.handle_text_input(*code, *modifiers),
            Focus::Query => self.handle_query_input(*code, *modifiers, services),
            Focus::Results => self.handle_results_input(*code, *modifiers),
        }
    }

    fn handle_paste(&mut self, pasted: &str) -> bool {
        match self.focus {
            Focus::Text => self.text.insert_str(pasted),
            Focus::Query => {
                let single_line: String = pasted
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                self.query.insert_str(single_line.trim());
            }
            Focus::Results => return false,
        }
        true
    }

    fn handle_text_input(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match (modifiers, code) {
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Enter) => {
                self.text.insert_char('\n');
                true
            }
            (KeyModifiers::NONE, KeyCode::Up) => {
                self.text.move_up();
                true
            }
            (KeyModifiers::NONE, KeyCode::Down) => {
                self.text.move_down();
                true
            }
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.focus = Focus::Results;
                true
            }
            _ => route_text_input(&mut self.text, code, modifiers),
        }
    }

    fn handle_query_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) -> bool {
        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Enter) => {
                self.submit(services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.focus = Focus::Results;
                true
            }
            _ => route_text_input(&mut self.query, code, modifiers),
        }
    }

    fn handle_results_input(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                let count = self.word_count();
                if count > 0 {
                    self.selected = (self.selected + 1).min(count - 1);
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => {
                self.selected = 0;
                true
            }
            (KeyModifiers::SHIFT, KeyCode::Char('G')) | (KeyModifiers::NONE, KeyCode::End) => {
                self.selected = self.word_count().saturating_sub(1);
                true
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                self.show_detail = !self.show_detail;
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('i')) => {
                self.focus = Focus::Text;
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('/')) => {
                self.focus = Focus::Query;
                true
            }
            _ => false,
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    /// Render all panes; returns the status bar area for the app to fill.
    pub fn render(&self, frame: &mut Frame, area: Rect) -> Rect {
        let layout = SearchLayout::compute(area, self.show_detail);

        self.render_text(frame, layout.text);
        self.render_query(frame, layout.query);
        self.render_results(frame, layout.results);
        if let Some(detail) = layout.detail {
            self.render_detail(frame, detail);
        }

        layout.status
    }

    fn render_text(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Text;
        let block = theme::block("Text", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.text.text().is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Paste or type the text to search…",
                    theme::placeholder(),
                )),
                inner,
            );
        } else {
            let (line, _) = self.text.line_col();
            let scroll = line.saturating_sub(inner.height.saturating_sub(1) as usize) as u16;
            frame.render_widget(
                Paragraph::new(self.text.text()).scroll((scroll, 0)),
                inner,
            );
        }

        if focused {
            place_cursor(frame, inner, &self.text);
        }
    }

    fn render_query(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Query;
        let block = theme::block("Letters", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let content = if self.query.text().is_empty() {
            Line::from(Span::styled(
                "Letters to find, e.g. \"ción\". Enter searches.",
                theme::placeholder(),
            ))
        } else {
            Line::raw(self.query.text())
        };
        frame.render_widget(Paragraph::new(content), inner);

        if focused {
            place_cursor(frame, inner, &self.query);
        }
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Results;
        let title = format!("Results ({})", self.word_count());
        let block = theme::block(&title, focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line<'static>> = Vec::new();

        if self.busy {
            lines.push(Line::from(Span::styled(
                "  Searching…",
                Style::default().fg(theme::PRIMARY_LIGHT),
            )));
        }

        let Some(outcome) = &self.outcome else {
            if !self.busy {
                lines.push(Line::from(vec![
                    Span::styled("  Enter text and letters, then press ", theme::muted()),
                    Span::styled("F5", theme::highlight()),
                    Span::styled(".", theme::muted()),
                ]));
            }
            frame.render_widget(Paragraph::new(lines), inner);
            return;
        };

        if let Some(summary) = outcome.summary() {
            lines.push(Line::from(Span::styled(format!("  {summary}"), theme::heading())));
            let mut meta = vec![Span::styled(
                format!("  {} token(s) scanned", outcome.tokens_scanned),
                theme::muted(),
            )];
            if let Some(language) = outcome.language {
                meta.push(Span::styled(" │ language: ", theme::muted()));
                meta.push(Span::styled(
                    language.label().to_string(),
                    Style::default().fg(theme::PRIMARY_LIGHT),
                ));
            }
            lines.push(Line::from(meta));
        }

        for message in &outcome.messages {
            let (prefix, color) = match message.level() {
                MessageLevel::Warning => ("⚠", theme::WARNING),
                MessageLevel::Error => ("✗", theme::ERROR),
            };
            lines.push(Line::from(Span::styled(
                format!("  {prefix} {message}"),
                Style::default().fg(color),
            )));
            if let Some(raw) = message.raw_response() {
                lines.push(Line::from(Span::styled(
                    format!("    raw: {}", excerpt(raw, RAW_EXCERPT_CHARS)),
                    theme::muted(),
                )));
            }
        }

        let header_len = lines.len() + 1;
        lines.push(Line::raw(""));

        let annotated = outcome.language.is_some();
        for (i, word) in outcome.words.iter().enumerate() {
            let is_selected = i == self.selected;
            let cursor = if is_selected && focused { "▸ " } else { "  " };
            let word_style = if is_selected {
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::TEXT)
            };

            let mut spans = vec![
                Span::styled(cursor, Style::default().fg(theme::ACCENT)),
                Span::styled(word.clone(), word_style),
            ];
            if let Some(record) = outcome.annotation_for(word) {
                spans.push(Span::styled(
                    format!("  {} · {}", record.lemma, record.part_of_speech),
                    theme::muted(),
                ));
            } else if annotated {
                spans.push(Span::styled("  –", Style::default().fg(theme::TEXT_DIM)));
            }
            lines.push(Line::from(spans));
        }

        let visible = inner.height.saturating_sub(1) as usize;
        let scroll = (header_len + self.selected).saturating_sub(visible) as u16;
        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block("Morphology", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = match (self.outcome.as_ref(), self.selected_word()) {
            (Some(outcome), Some(word)) => {
                let mut lines = vec![
                    Line::from(Span::styled(format!(" {word}"), theme::heading())),
                    Line::raw(""),
                ];
                match outcome.annotation_for(word) {
                    Some(record) => lines.extend(record_lines(record)),
                    None if outcome.language.is_some() => lines.push(Line::from(Span::styled(
                        " No annotation returned for this word.",
                        theme::muted(),
                    ))),
                    None => lines.push(Line::from(vec![
                        Span::styled(" Annotation disabled. Press ", theme::muted()),
                        Span::styled("Ctrl+A", theme::highlight()),
                        Span::styled(" and search again.", theme::muted()),
                    ])),
                }
                lines
            }
            _ => vec![Line::from(Span::styled(" No word selected.", theme::muted()))],
        };

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

// ── Free helpers ───────────────────────────────────────────────────────────

fn record_lines(record: &MorphologyRecord) -> Vec<Line<'static>> {
    let f = &record.features;
    [
        ("Lemma", record.lemma.clone()),
        ("Part of speech", record.part_of_speech.clone()),
        ("Gender", f.gender.to_string()),
        ("Number", f.number.to_string()),
        ("Tense", f.tense.to_string()),
        ("Person", f.person.to_string()),
        ("Mood", f.mood.to_string()),
    ]
    .into_iter()
    .map(|(label, value)| {
        let value = if value.is_empty() { "-".to_string() } else { value };
        Line::from(vec![
            Span::styled(format!(" {label:<16}"), theme::muted()),
            Span::raw(value),
        ])
    })
    .collect()
}

/// Returns true if the key edited the buffer.
fn route_text_input(buf: &mut InputBuffer, code: KeyCode, modifiers: KeyModifiers) -> bool {
    match (modifiers, code) {
        (KeyModifiers::NONE, KeyCode::Char(c)) | (KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            buf.insert_char(c);
        }
        (KeyModifiers::NONE, KeyCode::Backspace) => buf.backspace(),
        (KeyModifiers::NONE, KeyCode::Delete) => buf.delete(),
        (KeyModifiers::NONE, KeyCode::Left) => buf.move_left(),
        (KeyModifiers::NONE, KeyCode::Right) => buf.move_right(),
        (KeyModifiers::NONE, KeyCode::Home) => buf.move_home(),
        (KeyModifiers::NONE, KeyCode::End) => buf.move_end(),
        _ => return false,
    }
    true
}

fn place_cursor(frame: &mut Frame, inner: Rect, buf: &InputBuffer) {
    if inner.width == 0 || inner.height == 0 {
        return;
    }
    let (line, col) = buf.line_col();
    let row = line.min(inner.height as usize - 1) as u16;
    let col = col.min(inner.width as usize - 1) as u16;
    frame.set_cursor_position(Position::new(inner.x + col, inner.y + row));
}

/// First `max` chars of `s` on one line.
fn excerpt(s: &str, max: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        flat
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
