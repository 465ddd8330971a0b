//! HTTP exposure of the trip ledger

pub mod extract;
pub mod handlers;
pub mod router;

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::LedgerConfig;
use crate::core::error::{LedgerError, LedgerResult};
use crate::core::events::EventBus;
use crate::core::store::TripRepository;
use crate::storage::InMemoryTripRepository;
use crate::sync::StatusSynchronizer;
use crate::trips::{TripOverrides, TripService};

pub use router::build_router;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub trips: TripService,
    pub overrides: TripOverrides,
    pub sync: StatusSynchronizer,
    pub config: Arc<LedgerConfig>,
}

impl AppState {
    /// Wire every component around one repository and one event bus
    pub fn new(config: LedgerConfig, repository: Arc<dyn TripRepository>) -> Self {
        let config = Arc::new(config);
        let events = EventBus::new(config.event_capacity);
        let trips = TripService::new(repository, events, config.clone());
        let overrides = TripOverrides::from_service(&trips);
        let sync = StatusSynchronizer::new(trips.clone());

        Self {
            trips,
            overrides,
            sync,
            config,
        }
    }

    /// State backed by [`InMemoryTripRepository`]
    pub fn in_memory(config: LedgerConfig) -> Self {
        Self::new(config, Arc::new(InMemoryTripRepository::new()))
    }

    pub fn router(&self) -> axum::Router {
        build_router(self.clone(), self.config.server.request_timeout())
    }
}

/// Serve the application with graceful shutdown
///
/// Binds `config.server.bind` and runs until SIGTERM or Ctrl+C.
pub async fn serve(state: AppState) -> LedgerResult<()> {
    let addr = state.config.server.bind.clone();
    let app = state.router();

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        LedgerError::Internal(format!("failed to bind {}: {}", addr, e))
    })?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LedgerError::Internal(e.to_string()))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
