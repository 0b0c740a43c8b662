use anyhow::{Context, Result};
use codehelper::app::{App, TAB_ID};
use codehelper::{logging, Config};
use codehelper_agent::{Coordinator, CredentialStore, GeminiClient};
use codehelper_page::{NavigationScope, PageWatcher};
use directories::ProjectDirs;
use ratatui::crossterm::event;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "codehelper", "codehelper") {
        proj_dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config/default.toml")
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let credentials = CredentialStore::default_location()?;
    let _log_guard = logging::init(&credentials.dir().join("logs"))?;

    let config_path = get_config_path();
    let mut config = Config::load_or_default(&config_path);
    config.apply_env();
    tracing::info!("Using config {}", config_path.display());

    let selectors = config.selectors.compile().map_err(|e| {
        tracing::error!("{}", e);
        anyhow::anyhow!("{} ({})", e.user_message(), e)
    })?;

    let rt = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let _enter = rt.enter();

    let cancel = CancellationToken::new();
    let (ui_tx, ui_rx) = mpsc::unbounded_channel();
    let coordinator = Coordinator::new(
        GeminiClient::new(config.ai.clone()),
        credentials.clone(),
        NavigationScope::new(config.page.scope.clone()),
        selectors,
    );
    let handle = coordinator.spawn(ui_tx, cancel.clone());

    if let Some(watcher) = config
        .page
        .url
        .as_deref()
        .and_then(|url| PageWatcher::for_url(TAB_ID, url, config.page.watch_interval()))
    {
        rt.spawn(watcher.run(handle.navigation.clone(), cancel.clone()));
    }

    let mut app = App::new(config, credentials);
    app.connect(handle.messages.clone(), handle.navigation.clone(), ui_rx);
    app.init();

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app);
    ratatui::restore();

    cancel.cancel();
    if let Err(e) = rt.block_on(handle.task) {
        tracing::warn!("Coordinator task ended abnormally: {}", e);
    }
    tracing::info!("Shut down");

    result
}

fn run(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            match app.handle_event(event) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => app.report_error("Input error", e),
            }
        }

        app.process_events();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
