use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use application::{PrinterBinding, ScriptRegistry};
use infrastructure::config::PrinterSettings;
use infrastructure::{FileScriptHost, SimulatedSdk};

/// Connects a printer binding to the simulated SDK and holds the session
/// until Ctrl-C.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Override printer host
    #[arg(long)]
    host: Option<String>,

    /// Override printer port
    #[arg(long)]
    port: Option<u16>,

    /// Override SDK script URL
    #[arg(long)]
    sdk_url: Option<String>,

    /// Override directory SDK scripts are served from
    #[arg(long)]
    script_root: Option<String>,
}

async fn run() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,printer_agent=debug,application=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Loading configuration from {}", args.config_dir);
    let mut settings = PrinterSettings::load(&args.config_dir)?;
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(sdk_url) = args.sdk_url {
        settings.sdk_url = sdk_url;
    }
    if let Some(script_root) = args.script_root {
        settings.script_root = script_root;
    }

    let sdk = Arc::new(SimulatedSdk::new());
    let host = Arc::new(FileScriptHost::new(&settings.script_root, sdk));
    let scripts = Arc::new(ScriptRegistry::new(host));

    let mut binding = PrinterBinding::new(&settings.connection_options(), scripts)?
        .with_device(settings.device_id.clone(), settings.device_type());

    let mut status_rx = binding.subscribe();
    let watcher = tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let state = status_rx.borrow_and_update().clone();
            match &state.error {
                Some(message) => error!(status = %state.status, "{}: {}", state.status.label(), message),
                None => info!(status = %state.status, "{}", state.status.label()),
            }
        }
    });

    info!(host = %settings.host, port = settings.port, "Connecting printer");
    let outcome = binding.connect().await;
    if outcome.is_ok() {
        info!("Printer ready, press Ctrl-C to disconnect");
        tokio::signal::ctrl_c().await?;
    }

    binding.shutdown().await;
    watcher.abort();
    outcome?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("printer-agent failed: {:?}", e);
        std::process::exit(1);
    }
}
