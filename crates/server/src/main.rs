//! Screenplay Server
//!
//! Serves the account/project domain over HTTP, plus the browser UI.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use screenplay_server::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "screenplay-server")]
#[command(about = "HTTP binding and browser UI for the screenplay domain")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "screenplay-server.toml")]
    config: PathBuf,

    /// Listen address (overrides config and environment)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Port to listen on (overrides the port of the listen address)
    #[arg(short, long)]
    port: Option<u16>,

    /// Do not serve the browser UI
    #[arg(long)]
    no_ui: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = ServerConfig::load(&cli.config)?.with_env_overrides()?;
    if let Some(listen) = cli.listen {
        cfg.listen = listen;
    }
    if let Some(port) = cli.port {
        cfg.listen.set_port(port);
    }
    if cli.no_ui {
        cfg.serve_ui = false;
    }

    info!("Screenplay server v{}", env!("CARGO_PKG_VERSION"));

    tokio::select! {
        result = screenplay_server::serve(cfg) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    Ok(())
}
