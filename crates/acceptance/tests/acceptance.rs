//! Acceptance suite entry point
//!
//! Runs the feature files against one backend.
//! Run with: cargo test --package screenplay-acceptance --test acceptance -- --backend http-in-process

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use screenplay_acceptance::playwright::Browser;
use screenplay_acceptance::{run_suite, Backend, HarnessResult, RunnerConfig};

#[derive(Parser, Debug)]
#[command(name = "screenplay-acceptance")]
#[command(about = "Run the screenplay acceptance suite against one backend")]
struct Args {
    /// Configuration file (TOML); command line flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend: domain, http-in-process, http-executable, ui
    #[arg(short, long)]
    backend: Option<Backend>,

    /// Path to the feature files directory
    #[arg(short, long)]
    features: Option<PathBuf>,

    /// Run only scenarios carrying this tag (repeatable)
    #[arg(short, long)]
    tag: Vec<String>,

    /// Path to the screenplay-server binary
    #[arg(long)]
    server_binary: Option<PathBuf>,

    /// Port to run the server on (0 = auto)
    #[arg(long)]
    port: Option<u16>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long)]
    browser: Option<Browser>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Output directory for results
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> HarnessResult<RunnerConfig> {
        let mut config = match &self.config {
            Some(path) => RunnerConfig::load(path)?,
            None => RunnerConfig::default(),
        };

        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(features) = self.features {
            config.features_dir = features;
        }
        if !self.tag.is_empty() {
            config.tags = self.tag;
        }
        if let Some(binary) = self.server_binary {
            config.server.binary_path = binary;
        }
        if let Some(port) = self.port {
            config.server.port = if port == 0 { None } else { Some(port) };
        }
        if let Some(browser) = self.browser {
            config.playwright.browser = browser;
        }
        if self.headed {
            config.playwright.headless = false;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };

    match rt.block_on(async_main(args)) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> HarnessResult<bool> {
    let config = args.into_config()?;
    let result = run_suite(&config).await?;
    Ok(result.success())
}
