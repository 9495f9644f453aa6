//! Typed client for the indexer configuration API

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::io::{HttpClient, HttpResponse};
use crate::model::{ImportCounts, IndexConfig, IndexId, RunningStatus};
use crate::AdminError;

/// Operations the dashboard performs against the indexer configuration API.
///
/// Every call is single-shot: no retry, no backoff. Callers decide what a
/// failure means.
#[async_trait]
pub trait ConfigApi: Send + Sync {
    /// Base address of the dashboarding tool (`GET kibanaHost`)
    async fn kibana_host(&self) -> crate::Result<String>;

    /// All index configurations (`GET configs`)
    async fn configs(&self) -> crate::Result<Vec<IndexConfig>>;

    /// Running-state per index id (`GET running`)
    async fn running(&self) -> crate::Result<RunningStatus>;

    /// Delete a configuration, optionally purging its indexed data
    async fn delete_config(&self, id: &IndexId, delete_data: bool) -> crate::Result<()>;

    /// Full configuration bundle (`GET export/configs`)
    async fn export_configs(&self) -> crate::Result<serde_json::Value>;

    /// Upsert a bundle of JSON-encoded configurations (`POST import/configs`)
    async fn import_configs(&self, configs: Vec<String>) -> crate::Result<ImportCounts>;
}

/// [`ConfigApi`] over HTTP against a base URL
pub struct RestConfigApi {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for RestConfigApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfigApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RestConfigApi {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into();
        tracing::debug!("Created RestConfigApi at {}", base_url);
        Self { base_url, http }
    }

    /// Join `path` onto the base URL with exactly one `/` between them
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> crate::Result<T> {
        let url = self.url(path);
        let response = checked(&url, self.http.get(&url).await?)?;
        Ok(serde_json::from_str(&response.body)?)
    }
}

fn checked(url: &str, response: HttpResponse) -> crate::Result<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(AdminError::Status {
            url: url.to_string(),
            status: response.status,
            body: response.body,
        })
    }
}

#[async_trait]
impl ConfigApi for RestConfigApi {
    async fn kibana_host(&self) -> crate::Result<String> {
        let url = self.url("kibanaHost");
        let response = checked(&url, self.http.get(&url).await?)?;
        // Served either as a JSON string or as plain text
        match serde_json::from_str::<String>(&response.body) {
            Ok(host) => Ok(host),
            Err(_) => Ok(response.body.trim().to_string()),
        }
    }

    async fn configs(&self) -> crate::Result<Vec<IndexConfig>> {
        self.get_json("configs").await
    }

    async fn running(&self) -> crate::Result<RunningStatus> {
        self.get_json("running").await
    }

    async fn delete_config(&self, id: &IndexId, delete_data: bool) -> crate::Result<()> {
        let url = self.url(&format!("configs/{}", id));
        let delete_data = if delete_data { "true" } else { "false" };
        checked(
            &url,
            self.http.delete(&url, &[("deleteData", delete_data)]).await?,
        )?;
        Ok(())
    }

    async fn export_configs(&self) -> crate::Result<serde_json::Value> {
        self.get_json("/export/configs").await
    }

    async fn import_configs(&self, configs: Vec<String>) -> crate::Result<ImportCounts> {
        let url = self.url("/import/configs");
        let body = serde_json::Value::from(configs);
        let response = checked(&url, self.http.post_json(&url, &body).await?)?;
        Ok(serde_json::from_str(&response.body)?)
    }
}
