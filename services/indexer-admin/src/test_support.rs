//! Scripted test doubles shared by unit tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::alert::{Alert, AlertSink};
use crate::api::ConfigApi;
use crate::model::{ImportCounts, IndexConfig, IndexId, RunningStatus};
use crate::AdminError;

pub fn id(n: u64) -> IndexId {
    IndexId::from(n)
}

pub fn config(n: u64, name: &str) -> IndexConfig {
    IndexConfig::new(id(n), name)
}

/// Canned responses for one endpoint. Responses are consumed in order and
/// the last one repeats.
#[derive(Debug)]
pub struct Script<T> {
    queue: Mutex<VecDeque<Result<T, String>>>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    fn new(default: T) -> Self {
        Self {
            queue: Mutex::new(VecDeque::from([Ok(default)])),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, response: Result<T, String>) {
        self.script(vec![response]);
    }

    pub fn script(&self, responses: Vec<Result<T, String>>) {
        *self.queue.lock().unwrap() = responses.into();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> crate::Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.queue.lock().unwrap();
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response
            .unwrap_or_else(|| Err("no scripted response".to_string()))
            .map_err(AdminError::Http)
    }
}

/// A [`ConfigApi`] answering from scripts and recording mutations
#[derive(Debug)]
pub struct ScriptedApi {
    pub kibana: Script<String>,
    pub configs: Script<Vec<IndexConfig>>,
    pub running: Script<RunningStatus>,
    pub export: Script<serde_json::Value>,
    pub import: Script<ImportCounts>,
    pub delete: Script<()>,
    deletes: Mutex<Vec<(IndexId, bool)>>,
    imports: Mutex<Vec<Vec<String>>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            kibana: Script::new("http://kibana:5601".to_string()),
            configs: Script::new(Vec::new()),
            running: Script::new(RunningStatus::new()),
            export: Script::new(serde_json::json!([])),
            import: Script::new(ImportCounts {
                created: 0,
                changed: 0,
            }),
            delete: Script::new(()),
            deletes: Mutex::new(Vec::new()),
            imports: Mutex::new(Vec::new()),
        }
    }

    pub fn deletes(&self) -> Vec<(IndexId, bool)> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn imports(&self) -> Vec<Vec<String>> {
        self.imports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfigApi for ScriptedApi {
    async fn kibana_host(&self) -> crate::Result<String> {
        self.kibana.next()
    }

    async fn configs(&self) -> crate::Result<Vec<IndexConfig>> {
        self.configs.next()
    }

    async fn running(&self) -> crate::Result<RunningStatus> {
        self.running.next()
    }

    async fn delete_config(&self, id: &IndexId, delete_data: bool) -> crate::Result<()> {
        self.deletes.lock().unwrap().push((id.clone(), delete_data));
        self.delete.next()
    }

    async fn export_configs(&self) -> crate::Result<serde_json::Value> {
        self.export.next()
    }

    async fn import_configs(&self, configs: Vec<String>) -> crate::Result<ImportCounts> {
        self.imports.lock().unwrap().push(configs);
        self.import.next()
    }
}

/// An [`AlertSink`] that keeps every alert
#[derive(Debug, Default)]
pub struct RecordingSink {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingSink {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.alerts().into_iter().map(|a| a.title).collect()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn add_alert(&self, alert: Alert) {
        self.alerts.lock().unwrap().push(alert);
    }
}
