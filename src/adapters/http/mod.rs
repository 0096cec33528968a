//! HTTP adapter. Axum router exposing the agent over A2A JSON-RPC.
//!
//! Routes:
//! - `POST /a2a/budget`: JSON-RPC (`message/send`, `execute`)
//! - `GET /health`: fixed liveness payload

pub mod error;
pub mod handlers;
pub mod rpc;

use crate::ports::AgentPort;
use axum::Router;
use axum::routing::{get, post};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<dyn AgentPort>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/a2a/budget", post(handlers::a2a_endpoint))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP server bound to one address.
pub struct HttpServer {
    listener: TcpListener,
    state: AppState,
}

impl HttpServer {
    pub async fn bind(addr: SocketAddr, state: AppState) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        info!(%addr, "budget agent listening");
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("budget agent stopped");
        Ok(())
    }
}
