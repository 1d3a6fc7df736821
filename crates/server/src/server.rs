//! HTTP server implementation

use crate::config::ServerConfig;
use crate::static_files::StaticFiles;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post},
    Json, Router,
};
use screenplay_domain::{Domain, DomainError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// HTTP front for a single domain instance
#[derive(Clone)]
pub struct AppServer {
    state: Arc<AppState>,
}

struct AppState {
    domain: RwLock<Domain>,
    static_files: StaticFiles,
    cfg: ServerConfig,
}

#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Serialize)]
struct AuthenticationResponse {
    authenticated: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Start a server with the given configuration and run until it fails
pub async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
    AppServer::new(cfg).serve().await
}

impl AppServer {
    /// Create a server around an empty domain
    pub fn new(cfg: ServerConfig) -> Self {
        Self::with_domain(Domain::new(), cfg)
    }

    /// Create a server around an existing domain
    pub fn with_domain(domain: Domain, cfg: ServerConfig) -> Self {
        Self {
            state: Arc::new(AppState {
                domain: RwLock::new(domain),
                static_files: StaticFiles::new(),
                cfg,
            }),
        }
    }

    /// Create router
    pub fn router(&self) -> Router {
        let api = Router::new()
            .route("/health", get(health_handler))
            .route("/accounts", post(create_account_handler))
            .route("/accounts/:name", get(get_account_handler))
            .route("/accounts/:name/activate", post(activate_handler))
            .route("/accounts/:name/authenticate", post(authenticate_handler))
            .route(
                "/accounts/:name/authentication-status",
                get(authentication_status_handler),
            )
            .route(
                "/accounts/:name/projects",
                get(get_projects_handler).post(create_project_handler),
            )
            .route("/clear", delete(clear_handler));

        let router = if self.state.cfg.serve_ui {
            api.route("/", get(|| async { Redirect::to("/ui/signup") }))
                .route("/ui", get(ui_index_handler))
                .route("/ui/*path", get(ui_index_handler))
                .route("/static/*path", get(static_handler))
        } else {
            api
        };

        router
            .fallback(not_found_handler)
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve forever
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.state.cfg.listen;
        let listener = TcpListener::bind(addr).await?;
        info!("Screenplay server listening on http://{}", listener.local_addr()?);
        self.log_endpoints();
        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }

    fn log_endpoints(&self) {
        info!("API endpoints:");
        info!("  GET    /health");
        info!("  POST   /accounts");
        info!("  GET    /accounts/{{name}}");
        info!("  POST   /accounts/{{name}}/activate");
        info!("  POST   /accounts/{{name}}/authenticate");
        info!("  GET    /accounts/{{name}}/authentication-status");
        info!("  GET    /accounts/{{name}}/projects");
        info!("  POST   /accounts/{{name}}/projects");
        info!("  DELETE /clear");
        if self.state.cfg.serve_ui {
            info!("Browser UI under /ui");
        }
    }
}

impl Default for AppServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "screenplay-server"
    }))
}

async fn create_account_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid JSON: {}", rejection.body_text()),
            )
        }
    };

    if req.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "name is required".to_string());
    }

    let mut domain = state.domain.write().await;
    match domain.create_account(&req.name) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => domain_error_response(e),
    }
}

async fn get_account_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let domain = state.domain.read().await;
    match domain.get_account(&name) {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

async fn activate_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let mut domain = state.domain.write().await;
    match domain.activate(&name) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => domain_error_response(e),
    }
}

async fn authenticate_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let mut domain = state.domain.write().await;
    match domain.authenticate(&name) {
        Ok(()) => (StatusCode::OK, Json(AuthenticationResponse { authenticated: true })).into_response(),
        Err(e) => domain_error_response(e),
    }
}

async fn authentication_status_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let domain = state.domain.read().await;
    Json(AuthenticationResponse {
        authenticated: domain.is_authenticated(&name),
    })
}

async fn get_projects_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let domain = state.domain.read().await;
    match domain.get_projects(&name) {
        Ok(projects) => (StatusCode::OK, Json(projects)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

async fn create_project_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let mut domain = state.domain.write().await;
    match domain.create_project(&name) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => domain_error_response(e),
    }
}

async fn clear_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.domain.write().await.clear_all();
    StatusCode::NO_CONTENT
}

async fn ui_index_handler(State(state): State<Arc<AppState>>) -> Response {
    state.static_files.serve("index.html").await
}

async fn static_handler(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    state.static_files.serve(&path).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found".to_string())
}

fn domain_error_response(err: DomainError) -> Response {
    let status = match &err {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::ActivationRequired(_) => StatusCode::BAD_REQUEST,
    };
    debug!(status = %status, "domain error: {}", err);
    error_response(status, err.to_string())
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}
