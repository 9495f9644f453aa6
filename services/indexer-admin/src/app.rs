//! App shell: the session's alert log and the route table

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::alert::{Alert, AlertSink};

/// An alert as stored in the shell's log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEntry {
    /// Position in the log, starting at 1
    pub seq: u64,
    pub raised_epoch_ms: u64,
    #[serde(flatten)]
    pub alert: Alert,
}

impl AlertEntry {
    /// Whether the toast for this alert has run its course at `now_ms`
    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms >= self.raised_epoch_ms + u64::from(self.alert.duration_sec) * 1000
    }
}

/// Views reachable from the navigation bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// Edit an existing index by name, or create one
    Edit(Option<String>),
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["index"] => Route::Edit(None),
            ["index", name] => Route::Edit(Some((*name).to_string())),
            _ => Route::NotFound,
        }
    }
}

/// Holds the alerts raised during a dashboard session.
///
/// Appending is the only mutation; expiry is left to whoever renders the
/// toasts.
#[derive(Debug, Default)]
pub struct AppShell {
    alerts: RwLock<Vec<AlertEntry>>,
}

impl AppShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// All alerts with a sequence number greater than `after`
    pub async fn alerts_after(&self, after: u64) -> Vec<AlertEntry> {
        self.alerts
            .read()
            .await
            .iter()
            .filter(|entry| entry.seq > after)
            .cloned()
            .collect()
    }

    /// Alerts whose toast should still be visible at `now_ms`
    pub async fn active_alerts(&self, now_ms: u64) -> Vec<AlertEntry> {
        self.alerts
            .read()
            .await
            .iter()
            .filter(|entry| !entry.expired(now_ms))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.alerts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.alerts.read().await.is_empty()
    }
}

#[async_trait]
impl AlertSink for AppShell {
    async fn add_alert(&self, alert: Alert) {
        tracing::debug!("Alert [{}] {}: {}", alert.variant, alert.title, alert.message);
        let mut alerts = self.alerts.write().await;
        let seq = alerts.len() as u64 + 1;
        alerts.push(AlertEntry {
            seq,
            raised_epoch_ms: current_epoch_ms(),
            alert,
        });
    }
}

pub fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
