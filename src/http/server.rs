//! HTTP server setup and request handlers.
//!
//! # Responsibilities
//! - Create the Axum router with all route handlers
//! - Wire up middleware (tracing, body size limit)
//! - Normalize inbound webhook requests into snapshots
//! - Serve the rendered inspection page
//!
//! # Design Decisions
//! - The store is injected through AppState; handlers hold no globals
//! - Meta-routes (/ and /clear) are never recorded; only /webhook records
//! - Method mismatches on meta-routes fall through to the 404 payload

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::capture::snapshot::{iso8601_now, RequestSnapshot};
use crate::capture::store::RequestLog;
use crate::config::AppConfig;
use crate::render::render_page;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub log: Arc<RequestLog>,
    pub max_body_bytes: usize,
}

/// HTTP server for the webhook inspector.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around the given request log.
    pub fn new(config: &AppConfig, log: Arc<RequestLog>) -> Self {
        let state = AppState {
            log,
            max_body_bytes: config.capture.max_body_bytes,
        };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(index_handler).fallback(not_found_handler))
            .route("/clear", post(clear_handler).fallback(not_found_handler))
            .route("/webhook", any(webhook_handler))
            .fallback(not_found_handler)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.capture.max_body_bytes))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until ctrl-c.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run the server until the given future resolves. Lets tests stop the
    /// server without sending a process signal.
    pub async fn run_until<F>(self, listener: TcpListener, signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::debug!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookAck {
    message: &'static str,
    timestamp: String,
    method: String,
    url: String,
}

#[derive(Serialize)]
struct ClearAck {
    message: &'static str,
}

#[derive(Serialize)]
struct NotFoundPayload {
    error: &'static str,
    message: &'static str,
    timestamp: String,
}

/// GET / — render the current log. Never recorded.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let entries = state.log.read_all();
    tracing::debug!(entries = entries.len(), "Rendering inspection page");
    Html(render_page(&entries))
}

/// POST /clear — reset the log. Never recorded.
async fn clear_handler(State(state): State<AppState>) -> Json<ClearAck> {
    state.log.clear();
    Json(ClearAck {
        message: "Requests cleared",
    })
}

/// ALL /webhook — record the request and acknowledge it.
async fn webhook_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(%error, "Rejecting oversized or unreadable body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let snapshot = RequestSnapshot::capture(&parts.method, &parts.uri, &parts.headers, peer, &bytes);
    let ack = WebhookAck {
        message: "Webhook received successfully",
        timestamp: snapshot.timestamp.clone(),
        method: snapshot.method.clone(),
        url: snapshot.url.clone(),
    };
    state.log.insert(snapshot);

    Json(ack).into_response()
}

/// Any unmatched route. Never recorded.
async fn not_found_handler() -> (StatusCode, Json<NotFoundPayload>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundPayload {
            error: "Endpoint not found",
            message: "Send webhooks to /webhook endpoint",
            timestamp: iso8601_now(),
        }),
    )
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
