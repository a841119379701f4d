use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::pipeline::SearchPipeline;

use super::events::{AppEvent, Notification, NotificationLevel};

/// Centralized handle to the backend.
///
/// Created once at startup from the loaded config and passed by ref to the
/// views that need it.
pub struct Services {
    pub pipeline: SearchPipeline,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Initialize services from config.
    ///
    /// A missing morphology endpoint or key is not fatal: extraction still
    /// works and the user is told once annotation is requested.
    pub fn init(config: &AppConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let pipeline = SearchPipeline::new(&config.morphology);
        log::info!(
            "Search pipeline initialized (annotation available: {})",
            pipeline.can_annotate()
        );
        Self { pipeline, event_tx }
    }

    /// Queue a notification for the overlay.
    pub fn notify(&self, message: impl Into<String>, level: NotificationLevel) {
        let _ = self
            .event_tx
            .send(AppEvent::Notification(Notification::new(message, level)));
    }
}
