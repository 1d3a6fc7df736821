//! Server management: the HTTP backends the suite runs against
//!
//! [`InProcessServer`] serves the router on a tokio task of the test process.
//! [`ServerHandle`] spawns the `screenplay-server` binary. Both wait for
//! `GET /health` with a bounded poll before they are handed out.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use screenplay_domain::Domain;
use screenplay_server::{AppServer, ServerConfig};

use crate::config::target_dir;
use crate::error::{HarnessError, HarnessResult};

const HEALTH_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for spawning the server binary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerProcessConfig {
    /// Path to the screenplay-server binary
    pub binary_path: PathBuf,

    /// Port to listen on (None = find free port)
    pub port: Option<u16>,

    /// Timeout for server startup
    pub startup_timeout_ms: u64,

    /// Serve the browser UI (needed by the UI backend)
    pub serve_ui: bool,
}

impl Default for ServerProcessConfig {
    fn default() -> Self {
        Self {
            binary_path: target_dir().join("debug").join("screenplay-server"),
            port: None,
            startup_timeout_ms: 30_000,
            serve_ui: true,
        }
    }
}

impl ServerProcessConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

/// Handle to a running server process
pub struct ServerHandle {
    child: Child,
    base_url: String,
}

impl ServerHandle {
    /// Spawn the screenplay-server binary and wait until it is healthy
    pub async fn spawn(config: ServerProcessConfig) -> HarnessResult<Self> {
        let port = match config.port {
            Some(port) => port,
            None => find_free_port()?,
        };
        let base_url = format!("http://127.0.0.1:{}", port);

        info!("Spawning screenplay server on port {}", port);

        let mut cmd = Command::new(&config.binary_path);
        cmd.env(screenplay_server::config::ENV_ADDR, format!("127.0.0.1:{}", port))
            .env(
                screenplay_server::config::ENV_UI,
                if config.serve_ui { "1" } else { "0" },
            )
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().map_err(|e| {
            HarnessError::ServerStartup(format!(
                "Failed to spawn {}: {}",
                config.binary_path.display(),
                e
            ))
        })?;

        let mut handle = ServerHandle {
            child,
            base_url,
        };

        if let Err(e) = wait_for_healthy(&handle.base_url, config.startup_timeout()).await {
            let _ = handle.stop();
            return Err(e);
        }

        info!("Server is healthy at {}", handle.base_url);
        Ok(handle)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stop the server: SIGTERM first, then kill
    pub fn stop(&mut self) -> HarnessResult<()> {
        if let Ok(Some(_)) = self.child.try_wait() {
            return Ok(());
        }
        info!("Stopping server (pid: {})", self.child.id());

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                std::thread::sleep(Duration::from_millis(500));
            }
        }

        let _ = self.child.kill();
        self.child.wait()?;
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// The HTTP server running on a task of the current runtime
pub struct InProcessServer {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl InProcessServer {
    /// Serve `domain` on a free loopback port, UI included
    pub async fn start(domain: Domain) -> HarnessResult<Self> {
        Self::start_with(domain, ServerConfig::default()).await
    }

    /// Serve `domain` with a custom configuration; the listen address is
    /// always replaced by a free loopback port
    pub async fn start_with(domain: Domain, mut cfg: ServerConfig) -> HarnessResult<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        cfg.listen = addr;

        let (tx, rx) = oneshot::channel::<()>();
        let app = AppServer::with_domain(domain, cfg);
        let task = tokio::spawn(app.serve_with_shutdown(listener, async {
            let _ = rx.await;
        }));

        let base_url = format!("http://{}", addr);
        debug!("In-process server listening on {}", base_url);

        let server = Self {
            base_url,
            shutdown: Some(tx),
            task: Some(task),
        };
        wait_for_healthy(&server.base_url, Duration::from_secs(5)).await?;
        Ok(server)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shut down gracefully and wait for the server task to finish
    pub async fn stop(mut self) -> HarnessResult<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(e) => warn!("In-process server task failed: {}", e),
            }
        }
        Ok(())
    }
}

impl Drop for InProcessServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Poll `GET /health` until it succeeds or `limit` elapses
pub async fn wait_for_healthy(base_url: &str, limit: Duration) -> HarnessResult<()> {
    let health_url = format!("{}/health", base_url.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let start = Instant::now();
    let mut attempts = 0;

    while start.elapsed() < limit {
        attempts += 1;

        match client.get(&health_url).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            Ok(resp) => warn!("Health check returned {}", resp.status()),
            Err(e) => {
                if attempts == 1 {
                    info!("Waiting for server to start...");
                }
                // Connection refused is expected while the server is starting
                if !e.is_connect() {
                    warn!("Health check error: {}", e);
                }
            }
        }

        sleep(HEALTH_POLL_INTERVAL).await;
    }

    Err(HarnessError::ServerHealthCheck(attempts))
}

/// Find a free loopback port
pub fn find_free_port() -> HarnessResult<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
