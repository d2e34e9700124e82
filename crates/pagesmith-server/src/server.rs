//! Development server implementation.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Request, State,
    },
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use pagesmith_build::{Pipeline, Task};

use crate::watcher::{watch_rules, FileWatcher, WatchEvent};
use crate::websocket::{
    inject_client_tag, reload_client_script, ReloadHub, ReloadMessage, CLIENT_SCRIPT_PATH,
    RELOAD_ENDPOINT,
};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}")]
    AddressError(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Shared server state.
struct ServerState {
    pipeline: Pipeline,
    hub: ReloadHub,
}

/// Development server: serves the page-set output tree, re-runs the owning
/// task when a source changes, and notifies connected browsers.
pub struct DevServer {
    config: DevServerConfig,
    pipeline: Pipeline,
}

impl DevServer {
    pub fn new(config: DevServerConfig, pipeline: Pipeline) -> Self {
        Self { config, pipeline }
    }

    /// Start watching and serving. Runs until the listener fails.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::AddressError(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let site = self.pipeline.config().clone();
        let serve_root = site.output_root();
        let source_root = site.source_root();

        std::fs::create_dir_all(&serve_root)
            .map_err(|e| ServerError::WatchError(format!("{}: {}", serve_root.display(), e)))?;

        let state = Arc::new(ServerState {
            pipeline: self.pipeline,
            hub: ReloadHub::new(),
        });

        let (watcher, mut rx) = FileWatcher::new(&source_root, watch_rules(&site))
            .map_err(|e| ServerError::WatchError(format!("{}: {}", source_root.display(), e)))?;

        tracing::info!("Watching {}", source_root.display());

        // One consumer, so rebuilds run one at a time in arrival order.
        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state, &serve_root);

        tracing::info!("Serving {} at http://{}", serve_root.display(), addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Live-reload endpoints in front of the output tree.
fn router(state: Arc<ServerState>, serve_root: &Path) -> Router {
    Router::new()
        .route(RELOAD_ENDPOINT, get(ws_handler))
        .route(CLIENT_SCRIPT_PATH, get(client_script_handler))
        .fallback_service(ServeDir::new(serve_root))
        .layer(middleware::from_fn(inject_reload_script))
        .with_state(state)
}

/// Message that lets browsers pick up a task's new output.
fn reload_message(task: Task) -> ReloadMessage {
    if task.is_style() {
        ReloadMessage::InjectCss
    } else {
        ReloadMessage::Reload
    }
}

/// Re-run the task owning a changed source, then notify browsers.
async fn handle_watch_event(state: &Arc<ServerState>, event: WatchEvent) {
    tracing::info!(
        "{} {:?}, running {}",
        event.path.display(),
        event.kind,
        event.task
    );

    let pipeline = state.pipeline.clone();
    let task = event.task;

    match tokio::task::spawn_blocking(move || pipeline.run(task)).await {
        Ok(Ok(_)) => state.hub.send(reload_message(task)),
        Ok(Err(e)) => tracing::error!("[{}] {}", task, e),
        Err(e) => tracing::error!("[{}] task panicked: {}", task, e),
    }
}

/// Add the live-reload client to every HTML response.
async fn inject_reload_script(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"));

    if !is_html {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to buffer HTML response: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let html = inject_client_tag(&String::from_utf8_lossy(&bytes));
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, Body::from(html))
}

/// Handler for the live-reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward hub messages to one browser until it disconnects.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hub.subscribe();

    if send_message(&mut socket, &ReloadMessage::Connected).await.is_err() {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if send_message(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ReloadMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

/// Handler for the live-reload client script.
async fn client_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        reload_client_script(),
    )
}
