//! BDD test world for the indexer admin dashboard

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cucumber::World;
use indexer_admin::api::ConfigApi;
use indexer_admin::app::AppShell;
use indexer_admin::model::{ImportCounts, IndexConfig, IndexId, RunningStatus};
use indexer_admin::table::IndexTable;
use indexer_admin::AdminError;

/// What the fake API server currently holds
#[derive(Debug)]
pub struct ServerState {
    pub up: bool,
    pub configs: Vec<IndexConfig>,
    pub running: RunningStatus,
    pub export: serde_json::Value,
    pub import_counts: ImportCounts,
    pub reject_deletes: Option<String>,
    pub config_fetches: usize,
    pub deletes: Vec<(IndexId, bool)>,
    pub imports: Vec<Vec<String>>,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            up: true,
            configs: Vec::new(),
            running: RunningStatus::new(),
            export: serde_json::json!([]),
            import_counts: ImportCounts {
                created: 0,
                changed: 0,
            },
            reject_deletes: None,
            config_fetches: 0,
            deletes: Vec::new(),
            imports: Vec::new(),
        }
    }
}

/// An in-memory configuration API that can be taken down and brought back
#[derive(Debug, Default)]
pub struct FakeApiServer {
    pub state: Mutex<ServerState>,
}

impl FakeApiServer {
    fn reachable(&self) -> indexer_admin::Result<std::sync::MutexGuard<'_, ServerState>> {
        let state = self.state.lock().unwrap();
        if state.up {
            Ok(state)
        } else {
            Err(AdminError::Http("connection refused".to_string()))
        }
    }
}

#[async_trait]
impl ConfigApi for FakeApiServer {
    async fn kibana_host(&self) -> indexer_admin::Result<String> {
        let _state = self.reachable()?;
        Ok("http://kibana:5601".to_string())
    }

    async fn configs(&self) -> indexer_admin::Result<Vec<IndexConfig>> {
        let mut state = self.state.lock().unwrap();
        state.config_fetches += 1;
        if !state.up {
            return Err(AdminError::Http("connection refused".to_string()));
        }
        Ok(state.configs.clone())
    }

    async fn running(&self) -> indexer_admin::Result<RunningStatus> {
        Ok(self.reachable()?.running.clone())
    }

    async fn delete_config(&self, id: &IndexId, delete_data: bool) -> indexer_admin::Result<()> {
        let mut state = self.reachable()?;
        state.deletes.push((id.clone(), delete_data));
        if let Some(reason) = &state.reject_deletes {
            return Err(AdminError::Status {
                url: format!("configs/{}", id),
                status: 500,
                body: reason.clone(),
            });
        }
        state.configs.retain(|c| &c.id() != id);
        Ok(())
    }

    async fn export_configs(&self) -> indexer_admin::Result<serde_json::Value> {
        Ok(self.reachable()?.export.clone())
    }

    async fn import_configs(&self, configs: Vec<String>) -> indexer_admin::Result<ImportCounts> {
        let mut state = self.reachable()?;
        state.imports.push(configs);
        Ok(state.import_counts)
    }
}

#[derive(Default, World)]
pub struct IndexerAdminWorld {
    pub server: Arc<FakeApiServer>,
    pub shell: Arc<AppShell>,
    pub table: Option<Arc<IndexTable>>,
    pub ids: HashMap<String, IndexId>,

    // Dashboard responses
    pub response_status: Option<u16>,
    pub response_headers: Vec<(String, String)>,
    pub response_body: Option<String>,
}

impl std::fmt::Debug for IndexerAdminWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexerAdminWorld")
            .field("server", &self.server)
            .field("response_status", &self.response_status)
            .finish_non_exhaustive()
    }
}

impl IndexerAdminWorld {
    /// The table under test, created on first use
    pub fn table(&mut self) -> Arc<IndexTable> {
        let server = Arc::clone(&self.server);
        let shell = Arc::clone(&self.shell);
        Arc::clone(
            self.table
                .get_or_insert_with(|| Arc::new(IndexTable::new(server, shell))),
        )
    }

    /// Id of the config created under `name`
    pub fn id_of(&self, name: &str) -> IndexId {
        self.ids
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("Unknown index: {}", name))
    }

    pub fn server(&self) -> std::sync::MutexGuard<'_, ServerState> {
        self.server.state.lock().unwrap()
    }
}
