//! Index table: config list, running status, connectivity and operator actions

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};

use crate::alert::{Alert, AlertSink};
use crate::api::ConfigApi;
use crate::model::{ImportCounts, IndexConfig, IndexId, RunningStatus};
use crate::AdminError;

/// Appended to the dashboarding tool's host to link a dashboard by id
pub const DASHBOARD_VIEW_PATH: &str = "/app/dashboards#/view/";

/// Connection state towards the configuration API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    Online,
    Offline,
}

/// Outcome of one running-status poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningPoll {
    /// Every previously tracked id is still present
    Unchanged,
    /// An id disappeared and the config list was reloaded
    Reloaded,
    Failed,
}

/// Confirmation dialog for deleting one index configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePopup {
    pub id: IndexId,
    pub index_name: String,
    /// `(dashboard id, title)` pairs
    pub dashboards: Vec<(String, String)>,
    pub successful_run: bool,
    pub delete_data: bool,
}

impl DeletePopup {
    fn for_config(config: &IndexConfig) -> Self {
        Self {
            id: config.id(),
            index_name: config.name().to_string(),
            dashboards: config.dashboards(),
            successful_run: config.successful_run(),
            delete_data: false,
        }
    }

    /// Dashboard titles that lose their data source. Only an index that has
    /// completed a successful run can back a dashboard.
    pub fn affected_dashboards(&self) -> Vec<&str> {
        if !self.successful_run {
            return Vec::new();
        }
        self.dashboards
            .iter()
            .map(|(_, title)| title.as_str())
            .collect()
    }

    /// Whether purging the indexed data can be requested
    pub fn offers_delete_data(&self) -> bool {
        self.successful_run
    }
}

/// Computed status shown in a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Running,
    Ready,
    New,
}

/// A dashboard using an index, with a link when the dashboard host is known
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardLink {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
}

/// Everything a row needs to render one index configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowView {
    pub row_number: usize,
    pub status: RowStatus,
    pub running: Option<serde_json::Value>,
    pub used_in: Vec<DashboardLink>,
    pub config: IndexConfig,
}

impl RowView {
    fn build(
        row_number: usize,
        config: &IndexConfig,
        running: &RunningStatus,
        dashboard_address: Option<&str>,
    ) -> Self {
        let running = running.get(&config.id()).cloned();
        let status = if running.is_some() {
            RowStatus::Running
        } else if config.successful_run() {
            RowStatus::Ready
        } else {
            RowStatus::New
        };

        let used_in = config
            .dashboards()
            .into_iter()
            .map(|(id, title)| DashboardLink {
                url: dashboard_address.map(|address| format!("{}{}", address, id)),
                id,
                title,
            })
            .collect();

        Self {
            row_number,
            status,
            running,
            used_in,
            config: config.clone(),
        }
    }
}

/// Table body: either a placeholder or one row per config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableBody {
    Empty,
    Rows { rows: Vec<RowView> },
}

/// Serializable view of the delete dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePopupView {
    pub id: IndexId,
    pub index_name: String,
    pub affected_dashboards: Vec<String>,
    pub offers_delete_data: bool,
    pub delete_data: bool,
}

impl From<&DeletePopup> for DeletePopupView {
    fn from(popup: &DeletePopup) -> Self {
        Self {
            id: popup.id.clone(),
            index_name: popup.index_name.clone(),
            affected_dashboards: popup
                .affected_dashboards()
                .into_iter()
                .map(str::to_string)
                .collect(),
            offers_delete_data: popup.offers_delete_data(),
            delete_data: popup.delete_data,
        }
    }
}

/// Point-in-time view of the table for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub connectivity: Connectivity,
    pub dashboard_address: Option<String>,
    pub body: TableBody,
    pub delete_popup: Option<DeletePopupView>,
    pub import_file: Option<String>,
}

#[derive(Debug, Default)]
struct TableState {
    configs: Vec<IndexConfig>,
    running: RunningStatus,
    dashboard_address: Option<String>,
    delete_popup: Option<DeletePopup>,
    import_file: Option<String>,
    /// A config fetch has failed since the last successful one
    configs_unreachable: bool,
}

/// The index table view.
///
/// Owns the config list and running-status map, refreshed independently,
/// and reports the outcome of every mutating action to its alert sink.
pub struct IndexTable {
    api: Arc<dyn ConfigApi>,
    alerts: Arc<dyn AlertSink>,
    state: RwLock<TableState>,
    connectivity: watch::Sender<Connectivity>,
}

impl IndexTable {
    pub fn new(api: Arc<dyn ConfigApi>, alerts: Arc<dyn AlertSink>) -> Self {
        let (connectivity, _) = watch::channel(Connectivity::Online);
        Self {
            api,
            alerts,
            state: RwLock::new(TableState::default()),
            connectivity,
        }
    }

    /// Fetch the dashboard address and the config list
    pub async fn start(&self) {
        tracing::debug!("Starting index table");
        self.load_dashboard_address().await;
        self.load_indexes().await;
    }

    pub fn connectivity(&self) -> Connectivity {
        *self.connectivity.borrow()
    }

    /// Watch connectivity transitions
    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.connectivity.subscribe()
    }

    pub async fn configs(&self) -> Vec<IndexConfig> {
        self.state.read().await.configs.clone()
    }

    pub async fn running(&self) -> RunningStatus {
        self.state.read().await.running.clone()
    }

    pub async fn dashboard_address(&self) -> Option<String> {
        self.state.read().await.dashboard_address.clone()
    }

    pub async fn delete_popup(&self) -> Option<DeletePopup> {
        self.state.read().await.delete_popup.clone()
    }

    pub async fn import_file(&self) -> Option<String> {
        self.state.read().await.import_file.clone()
    }

    pub async fn config_by_name(&self, name: &str) -> Option<IndexConfig> {
        self.state
            .read()
            .await
            .configs
            .iter()
            .find(|c| c.name() == name)
            .cloned()
    }

    fn go_online(&self) -> bool {
        self.connectivity.send_if_modified(|c| {
            let changed = *c == Connectivity::Offline;
            *c = Connectivity::Online;
            changed
        })
    }

    fn go_offline(&self) -> bool {
        let changed = self.connectivity.send_if_modified(|c| {
            let changed = *c == Connectivity::Online;
            *c = Connectivity::Offline;
            changed
        });
        if changed {
            tracing::warn!("Configuration API offline, running-status polling stopped");
        }
        changed
    }

    pub async fn load_dashboard_address(&self) {
        match self.api.kibana_host().await {
            Ok(host) => {
                let address = format!("{}{}", host.trim_end_matches('/'), DASHBOARD_VIEW_PATH);
                tracing::debug!("Dashboard address: {}", address);
                self.state.write().await.dashboard_address = Some(address);
            }
            Err(e) => {
                tracing::debug!("Failed to load dashboard address: {}", e);
                self.go_offline();
            }
        }
    }

    /// Replace the config list with the server's, handling reconnects
    pub async fn load_indexes(&self) {
        match self.api.configs().await {
            Ok(configs) => {
                tracing::debug!("Loaded {} index configs", configs.len());
                {
                    let mut state = self.state.write().await;
                    state.configs = configs;
                    state.configs_unreachable = false;
                }

                if self.go_online() {
                    tracing::info!("Reconnected to configuration API");
                    self.alerts
                        .add_alert(Alert::success(
                            "Reconnected",
                            "Reconnected to api server",
                            5,
                        ))
                        .await;
                    self.load_dashboard_address().await;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load index configs: {}", e);
                let first_failure =
                    !std::mem::replace(&mut self.state.write().await.configs_unreachable, true);
                self.go_offline();

                if first_failure {
                    self.alerts
                        .add_alert(Alert::danger(
                            "Connection lost",
                            "Connection to api server lost",
                            9,
                        ))
                        .await;
                }
            }
        }
    }

    /// Refresh running status; reload configs when a tracked id vanished
    pub async fn load_running(&self) -> RunningPoll {
        match self.api.running().await {
            Ok(running) => {
                let vanished = {
                    let mut state = self.state.write().await;
                    let vanished = !state.running.is_subset_of(&running);
                    state.running = running;
                    vanished
                };

                if vanished {
                    tracing::debug!("Running index finished, reloading configs");
                    self.load_indexes().await;
                    RunningPoll::Reloaded
                } else {
                    RunningPoll::Unchanged
                }
            }
            Err(e) => {
                tracing::debug!("Failed to load running status: {}", e);
                self.go_offline();
                RunningPoll::Failed
            }
        }
    }

    /// The export bundle, pretty-printed with four-space indentation
    pub async fn export(&self) -> crate::Result<String> {
        let bundle = self.api.export_configs().await?;
        pretty_json(&bundle)
    }

    /// Import the text of a selected file as a config bundle.
    ///
    /// The file slot is cleared whatever the outcome. Returns the server's
    /// counts on success.
    pub async fn import(&self, file_name: &str, contents: &str) -> Option<ImportCounts> {
        self.state.write().await.import_file = Some(file_name.to_string());
        tracing::debug!("Importing configs from {}", file_name);

        let result = match encode_bundle(contents) {
            Ok(configs) => self.api.import_configs(configs).await,
            Err(e) => Err(e),
        };

        self.state.write().await.import_file = None;
        self.finish_import(file_name, result).await
    }

    /// Save one edited config as a single-element bundle; the import
    /// endpoint upserts by id.
    pub async fn save_config(&self, contents: &str) -> Option<ImportCounts> {
        let result = match serde_json::from_str::<serde_json::Value>(contents) {
            Ok(config) if config.is_object() => {
                self.api.import_configs(vec![config.to_string()]).await
            }
            Ok(_) => Err(AdminError::Dashboard(
                "index config must be a JSON object".to_string(),
            )),
            Err(e) => Err(e.into()),
        };
        self.finish_import("edited config", result).await
    }

    async fn finish_import(
        &self,
        source: &str,
        result: crate::Result<ImportCounts>,
    ) -> Option<ImportCounts> {
        match result {
            Ok(counts) => {
                tracing::info!(
                    "Imported {}: {} new, {} changed",
                    source,
                    counts.created,
                    counts.changed
                );
                self.load_indexes().await;
                self.alerts
                    .add_alert(Alert::success(
                        "Import successful",
                        format!(
                            "Successful import:\n\tnew: {},\n\tchanged: {}",
                            counts.created, counts.changed
                        ),
                        9,
                    ))
                    .await;
                Some(counts)
            }
            Err(e) => {
                tracing::warn!("Import of {} failed: {}", source, e);
                self.alerts
                    .add_alert(Alert::danger("Import failed", e.to_string(), 20))
                    .await;
                None
            }
        }
    }

    /// Open the delete dialog for the config with `id`
    pub async fn show_delete_popup(&self, id: &IndexId) -> Option<DeletePopup> {
        let mut state = self.state.write().await;
        let popup = DeletePopup::for_config(state.configs.iter().find(|c| &c.id() == id)?);
        state.delete_popup = Some(popup.clone());
        Some(popup)
    }

    /// Toggle the "also delete indexed data" switch
    pub async fn set_delete_data(&self, checked: bool) {
        if let Some(popup) = self.state.write().await.delete_popup.as_mut() {
            if popup.offers_delete_data() {
                popup.delete_data = checked;
            }
        }
    }

    pub async fn cancel_delete(&self) {
        self.state.write().await.delete_popup = None;
    }

    /// Close the dialog and delete its config
    pub async fn confirm_delete(&self) {
        let Some(popup) = self.state.write().await.delete_popup.take() else {
            return;
        };

        tracing::info!(
            "Deleting index '{}' ({}), delete data: {}",
            popup.index_name,
            popup.id,
            popup.delete_data
        );
        match self.api.delete_config(&popup.id, popup.delete_data).await {
            Ok(()) => self.load_indexes().await,
            Err(e) => {
                tracing::warn!("Delete of '{}' failed: {}", popup.index_name, e);
                self.alerts
                    .add_alert(Alert::danger("Delete request error", e.to_string(), 300))
                    .await;
            }
        }
    }

    pub async fn snapshot(&self) -> TableSnapshot {
        let state = self.state.read().await;
        let body = if state.configs.is_empty() {
            TableBody::Empty
        } else {
            TableBody::Rows {
                rows: state
                    .configs
                    .iter()
                    .enumerate()
                    .map(|(i, config)| {
                        RowView::build(
                            i,
                            config,
                            &state.running,
                            state.dashboard_address.as_deref(),
                        )
                    })
                    .collect(),
            }
        };

        TableSnapshot {
            connectivity: self.connectivity(),
            dashboard_address: state.dashboard_address.clone(),
            body,
            delete_popup: state.delete_popup.as_ref().map(DeletePopupView::from),
            import_file: state.import_file.clone(),
        }
    }
}

/// Parse a bundle as a JSON array and encode each element on its own
pub fn encode_bundle(contents: &str) -> crate::Result<Vec<String>> {
    let configs: Vec<serde_json::Value> = serde_json::from_str(contents)?;
    Ok(configs.iter().map(|c| c.to_string()).collect())
}

/// Serialize with four-space indentation
pub fn pretty_json(value: &serde_json::Value) -> crate::Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| AdminError::Dashboard(e.to_string()))
}
