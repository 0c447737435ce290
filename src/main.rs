use std::env;
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use evpad::cli::{main_cli, Args, Commands};
use evpad::daemon;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();

    let args = Args::parse();
    if let Some(Commands::Devices { .. }) = args.cmd {
        if let Err(e) = main_cli(args) {
            return Err(e.to_string().into());
        }
        return Ok(());
    }

    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting evpad v{}", VERSION);

    // Setup CTRL+C handler
    let running = Arc::new(AtomicBool::new(true));
    let signal = running.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Unable to listen for shutdown signal: {e}");
            return;
        }
        log::info!("Shutting down");
        signal.store(false, Ordering::SeqCst);
    });

    // The driver loop blocks on device readiness
    let options = args.manager_options();
    let result = tokio::task::spawn_blocking(move || daemon::run(options, running)).await;
    match result {
        Ok(Ok(())) => log::info!("evpad stopped"),
        Ok(Err(e)) => {
            log::error!("Driver loop failed: {e}");
            return Err(Box::new(e) as Box<dyn Error + Send + Sync>);
        }
        Err(e) => {
            log::error!("Error in joining the driver task: {e}");
            return Err(Box::new(e) as Box<dyn Error + Send + Sync>);
        }
    }

    Ok(())
}
