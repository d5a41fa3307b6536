//! Application startup and lifecycle management.
//!
//! The store and host-identity collaborators are constructed once here and
//! handed to every handler through [`AppState`].

use crate::config::{CandidateConfig, StoreBackend};
use crate::handlers;
use crate::services::{
    DocumentStore, HostIdentity, InMemoryStore, MongoStore, StaticHostIdentity,
    SystemHostIdentity,
};
use axum::{
    middleware::from_fn,
    routing::{any, get},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub host: Arc<dyn HostIdentity>,
    pub collection: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        host: Arc<dyn HostIdentity>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            host,
            collection: collection.into(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/gtg", any(handlers::check_health))
        .route("/healthz", any(handlers::check_health))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/candidates", any(handlers::list_candidates))
        .route("/candidates/*path", any(handlers::handle_candidate))
        .fallback(handlers::candidate_fallback)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, connecting the configured store backend.
    pub async fn build(config: CandidateConfig) -> Result<Self, AppError> {
        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Mongodb => {
                let mongo = config.store.mongodb.as_ref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "mongodb backend selected without MongoDB settings"
                    ))
                })?;
                Arc::new(MongoStore::connect(&mongo.uri, &mongo.database).await?)
            }
            StoreBackend::Memory => {
                tracing::info!("Using in-memory candidate store");
                Arc::new(InMemoryStore::new())
            }
        };

        let host: Arc<dyn HostIdentity> = match &config.host.identity_override {
            Some(identity) => Arc::new(StaticHostIdentity::new(identity.clone())),
            None => Arc::new(SystemHostIdentity),
        };

        Self::build_with(config, store, host).await
    }

    /// Build the application around already-constructed collaborators.
    pub async fn build_with(
        config: CandidateConfig,
        store: Arc<dyn DocumentStore>,
        host: Arc<dyn HostIdentity>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(store, host, config.store.collection.clone());

        // Port 0 picks a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Candidate service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
