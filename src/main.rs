mod app;
mod catalog;
mod config;
mod error;
mod library;
mod runtime;
mod session;
mod store;
mod transport;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match std::env::args().nth(1).as_deref() {
        Some("--print-config") => {
            let (settings, warning) = runtime::load_settings();
            if let Some(msg) = warning {
                eprintln!("encore: {msg}");
            }
            print!("{}", settings.to_toml()?);
            Ok(())
        }
        Some("--version") => {
            println!("encore {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(other) => Err(format!("unknown argument '{other}' (try --print-config)").into()),
        None => runtime::run(),
    }
}
