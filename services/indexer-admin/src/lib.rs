//! Indexer Admin - dashboard for indexer configurations
//!
//! Lists index configurations with their live running status, and exports,
//! imports, edits and deletes them through the indexer's configuration API.

pub mod alert;
pub mod api;
pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod model;
pub mod session;
pub mod table;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{load_config, Config};
pub use error::{AdminError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::RestConfigApi;
use crate::app::AppShell;
use crate::dashboard::DashboardState;
use crate::io::ReqwestHttpClient;
use crate::session::{PollIntervals, TableSession};
use crate::table::IndexTable;

/// Run the dashboard with the given configuration until ctrl-c
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let api = Arc::new(RestConfigApi::new(config.api.base_url.clone(), http));
    let shell = Arc::new(AppShell::new());
    let table = Arc::new(IndexTable::new(api, shell.clone()));
    let cancel = CancellationToken::new();

    let session = TableSession::start(
        Arc::clone(&table),
        PollIntervals::from(&config.polling),
    )
    .await;
    tracing::info!("Index table session started against {}", config.api.base_url);

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
        cancel_for_signal.cancel();
    });

    if config.dashboard.enabled {
        let router = dashboard::build_router(DashboardState {
            shell,
            table,
            export_file_name: config.export_file_name.clone(),
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], config.dashboard.port));
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            AdminError::Dashboard(format!(
                "Failed to bind dashboard to port {}: {}",
                config.dashboard.port, e
            ))
        })?;
        tracing::info!("Dashboard listening on http://{}", addr);

        let cancel_for_dashboard = cancel.clone();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_for_dashboard.cancelled().await;
            })
            .await?;
        tracing::debug!("Dashboard stopped");
    } else {
        tracing::info!("Dashboard disabled, polling only");
        cancel.cancelled().await;
    }

    session.shutdown().await;
    tracing::info!("Indexer admin stopped");
    Ok(())
}
