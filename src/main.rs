use miette::IntoDiagnostic;

use wordsift::config::AppConfig;
use wordsift::core::logging;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // File-only logging: stdout belongs to the terminal UI.
    let _log_guard = logging::init_tui();
    log::info!("{} v{} starting", wordsift::NAME, wordsift::VERSION);

    let config = AppConfig::load();
    if !config.morphology.is_configured() {
        log::warn!("Morphology endpoint or API key missing; annotation disabled");
    }

    wordsift::tui::run(config).await.into_diagnostic()?;

    log::info!("Shutting down");
    Ok(())
}
