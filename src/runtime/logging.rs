use std::fs::{self, OpenOptions};
use std::path::Path;
use std::str::FromStr;

/// Route `log` output to `path`. The terminal belongs to the TUI, so nothing
/// is written to stderr.
pub fn init_logging(path: &Path, level: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut clog = colog::default_builder();
    clog.filter(
        None,
        log::LevelFilter::from_str(level).unwrap_or(log::LevelFilter::Info),
    );
    clog.write_style(env_logger::WriteStyle::Never);
    clog.target(env_logger::Target::Pipe(Box::new(file)));
    // A second init (tests) keeps the first logger.
    let _ = clog.try_init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));

    Ok(())
}
