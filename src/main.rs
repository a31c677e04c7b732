use anyhow::Result;
use std::time::Duration;
use telemetry_tui::api::ApiClient;
use telemetry_tui::app::App;
use telemetry_tui::config::Config;
use telemetry_tui::event::EventHandler;
use telemetry_tui::session::Session;
use telemetry_tui::{logging, tui};

#[tokio::main]
async fn main() -> Result<()> {
    // Load config
    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {:#}", e);
        std::process::exit(1);
    });

    // Logs go to a file; the terminal belongs to the UI.
    logging::init(&config.log_file)?;
    tracing::info!("Starting against {}", config.api.base_url);

    let session = Session::load(&config.session_file);
    tracing::info!(
        "Session file {} ({})",
        session.path().display(),
        if session.is_active() { "active" } else { "logged out" }
    );
    let client = ApiClient::new(&config.api, session)?;

    // Setup terminal
    let mut terminal = tui::init()?;
    tui::install_panic_hook();

    let mut app = App::new(client);
    let tick_rate = Duration::from_millis(250);
    let mut events = EventHandler::new(tick_rate);

    let res = app.run(&mut terminal, &mut events, config.credentials).await;

    // Restore terminal
    tui::restore()?;

    if let Err(err) = res {
        tracing::error!("Exited with error: {:#}", err);
        println!("{err:?}");
    }

    Ok(())
}
