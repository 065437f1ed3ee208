// Random Roster entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open database
// 4. Restore saved groups and theme
// 5. Create mpsc channels
// 6. Spawn app logic task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use roster_core::config;
use roster_core::persist::Database;
use roster_tui::app;
use roster_tui::tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Random Roster starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: namespace={}, theme={:?}",
        config.storage.namespace, config.ui.theme
    );

    // 3. Open database
    let db_path = config.db_path();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create data directory {}", parent.display())
            })?;
        }
    }
    let db = Database::open(&db_path).context("failed to open database")?;
    info!("Database opened at {}", db_path.display());

    // 4. Restore saved groups and theme. A failed read stops startup rather than
    //    letting the first mutation overwrite whatever is stored.
    let mut app_state = app::AppState::new(config.clone(), Box::new(db));
    match app_state.load_from_storage() {
        Ok(true) => info!("Restored {} groups", app_state.store.groups().len()),
        Ok(false) => info!("No saved groups, starting empty"),
        Err(e) => {
            error!("Failed to restore saved groups: {:#}", e);
            return Err(e.context("failed to restore saved groups"));
        }
    }

    // 5. Create channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 6. Spawn app logic task
    let theme = app_state.theme;
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. Run the TUI (blocks until the user quits)
    let view_state = tui::ViewState::new(theme, config.randomizer.clone());
    let tick = Duration::from_millis(config.ui.tick_ms);
    if let Err(e) = tui::run(ui_rx, cmd_tx, view_state, tick).await {
        error!("TUI error: {:#}", e);
    }

    // 8. Cleanup: give the app task a moment to finish its last write
    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Random Roster shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("random-roster.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roster_tui=info,roster_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
