use std::sync::Arc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::catalog::{Catalog, FetchPolicy, HttpCatalog, OfflineCatalog};
use crate::config::Settings;
use crate::session::Session;
use crate::store::{FileStore, MemoryStore, Store};
use crate::transport::RodioTransport;

mod event_loop;
mod fetcher;
mod logging;
mod settings;

pub use settings::load_settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, warning) = settings::load_settings();

    let log_file = settings.log_file();
    if let Err(e) = logging::init_logging(&log_file, &settings.log.level) {
        eprintln!("encore: cannot open log file {}: {e}", log_file.display());
    }
    if let Some(msg) = warning {
        log::warn!("{msg}");
    }
    log::info!("encore {} starting", env!("CARGO_PKG_VERSION"));

    let store = open_store(&settings);
    let timeout = Duration::from_millis(settings.catalog.timeout_ms);
    let transport = RodioTransport::open(timeout)?;
    let fetcher = fetcher::Fetcher::spawn(build_catalog(&settings))?;

    let mut session = Session::new(transport, store);
    session.set_volume(settings.playback.initial_volume)?;
    session.request_chart(settings.catalog.chart_limit);

    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut session,
            &fetcher,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        log::error!("event loop failed: {e}");
    }
    log::info!("encore exiting");
    run_result
}

/// File-backed store in the data directory, or an in-memory one when the
/// directory cannot be created.
fn open_store(settings: &Settings) -> Box<dyn Store> {
    let dir = settings.data_dir();
    match FileStore::open(dir.clone()) {
        Ok(store) => {
            log::info!("storing playlists in {}", store.dir().display());
            Box::new(store)
        }
        Err(e) => {
            log::warn!("cannot use data dir {}: {e}; nothing will be saved", dir.display());
            Box::new(MemoryStore::new())
        }
    }
}

fn build_catalog(settings: &Settings) -> Arc<dyn Catalog> {
    let catalog = &settings.catalog;
    if !catalog.enabled {
        log::info!("remote catalog disabled; using built-in samples");
        return Arc::new(OfflineCatalog);
    }
    let policy = FetchPolicy {
        retries: catalog.retries,
        backoff: Duration::from_millis(catalog.retry_backoff_ms),
    };
    Arc::new(
        HttpCatalog::new(
            &catalog.base_url,
            Duration::from_millis(catalog.timeout_ms),
            policy,
        )
        .with_page_limit(catalog.page_limit),
    )
}
