/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for notification TTLs and polling search results.
    Tick,
    /// Raw terminal input (keyboard/paste).
    Input(crossterm::event::Event),
    /// Notification to display to the user.
    Notification(Notification),
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RunSearch,
    ToggleAnnotate,
    ClearSearch,
    ShowHelp,
    CloseHelp,
    Quit,
}

/// Which part of the search view has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Text,
    Query,
    Results,
}

impl Focus {
    pub const ALL: [Focus; 3] = [Focus::Text, Focus::Query, Focus::Results];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Text => "Text",
            Focus::Query => "Letters",
            Focus::Results => "Results",
        }
    }

    /// Whether typed characters go into a text field.
    pub fn is_editing(self) -> bool {
        matches!(self, Focus::Text | Focus::Query)
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

impl Notification {
    /// A notification whose id is assigned by `AppState` on arrival.
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            id: 0,
            message: message.into(),
            level,
            ttl_ticks: 100,
        }
    }
}
