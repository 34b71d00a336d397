use std::fs;
use std::sync::Arc;

use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use purr::adapters::{DesktopNotifier, LoopbackSessionFactory, TerminalWindow};
use purr::app::App;
use purr::cli;
use purr::error::FatalError;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = cli::parse(std::env::args().skip(1));
    if args.version {
        println!("{}", cli::version());
        return Ok(());
    }

    init_logging(args.verbose)?;

    crossterm::terminal::enable_raw_mode()?;
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        default_panic(info);
    }));

    let (window, window_rx) = TerminalWindow::create();
    let notifier = Arc::new(DesktopNotifier::new());
    let factory = Arc::new(LoopbackSessionFactory::new(args.state.clone()));
    let mut app = App::new(window, window_rx, notifier, factory);

    let result = app.run().await;
    crossterm::terminal::disable_raw_mode()?;

    match result {
        // closing the window is the normal way out
        Err(FatalError::WindowDestroyed) => Ok(()),
        Err(err) => Err(err.into()),
        Ok(()) => Ok(()),
    }
}

/// Log to a file; stdout belongs to the frame renderer.
fn init_logging(verbose: bool) -> Result<()> {
    let dir = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("purr");
    fs::create_dir_all(&dir)?;
    let file = fs::File::create(dir.join("purr.log"))?;

    let default = if verbose { "purr=debug" } else { "purr=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
