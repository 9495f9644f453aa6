//! Client-side API fetch helpers
//!
//! These types mirror the server-side JSON response structures
//! and are shared between SSR and client-side hydration.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Table snapshot as returned by /api/table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshotResponse {
    pub connectivity: String,
    pub dashboard_address: Option<String>,
    pub body: TableBodyResponse,
    pub delete_popup: Option<DeletePopupResponse>,
    pub import_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableBodyResponse {
    Empty,
    Rows { rows: Vec<RowResponse> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowResponse {
    pub row_number: usize,
    pub status: String,
    pub running: Option<serde_json::Value>,
    pub used_in: Vec<DashboardLinkResponse>,
    /// The config record exactly as the backend sent it
    pub config: serde_json::Value,
}

impl RowResponse {
    pub fn id(&self) -> String {
        id_text(&self.config["id"])
    }

    pub fn name(&self) -> String {
        self.config["name"].as_str().unwrap_or_default().to_string()
    }

    pub fn last_update(&self) -> String {
        match &self.config["lastUpdate"] {
            serde_json::Value::Null => String::new(),
            value => id_text(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardLinkResponse {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletePopupResponse {
    pub id: serde_json::Value,
    pub index_name: String,
    pub affected_dashboards: Vec<String>,
    pub offers_delete_data: bool,
    pub delete_data: bool,
}

/// Alert log entry as returned by /api/alerts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEntryResponse {
    pub seq: u64,
    pub raised_epoch_ms: u64,
    pub variant: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "durationSec")]
    pub duration_sec: u32,
}

/// Ids arrive as JSON numbers or strings; paths use their plain text
pub fn id_text(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Serialize with four-space indentation, as the export does
pub fn pretty(value: &serde_json::Value) -> String {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(out).unwrap_or_default(),
        Err(_) => value.to_string(),
    }
}

/// Template shown when creating a new index
pub fn new_config_template() -> serde_json::Value {
    serde_json::json!({ "name": "", "dashboards": {} })
}

/// Outcome of a browser-side fetch, as rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fetched<T> {
    Loaded(T),
    Unreachable,
    /// Server-side render; the browser fetches after hydration
    Pending,
}

impl<T> Fetched<T> {
    pub fn from_result(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => Fetched::Loaded(value),
            Err(_) if cfg!(feature = "hydrate") => Fetched::Unreachable,
            Err(_) => Fetched::Pending,
        }
    }
}

/// Percent-encoded `/index/{name}` route of the edit view
pub fn edit_path(name: &str) -> String {
    format!("/index/{}", urlencoding::encode(name))
}

#[cfg(feature = "hydrate")]
fn url(path: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or("no window")?;
    let origin = window.location().origin().map_err(|e| format!("{:?}", e))?;
    Ok(format!("{}{}", origin, path))
}

/// GET a JSON resource from the dashboard server
pub async fn fetch_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(&url(path)?)
            .send()
            .await
            .map_err(|e| format!("{}", e))?;

        resp.json().await.map_err(|e| format!("{}", e))
    }

    // In SSR mode the server renders the placeholder; hydration fetches
    #[cfg(not(feature = "hydrate"))]
    {
        Err(format!("{} is only fetched in the browser", path))
    }
}

/// POST to the dashboard server, with an optional JSON body
pub async fn post(path: &str, json: Option<serde_json::Value>) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let builder = gloo_net::http::Request::post(&url(path)?);
        let resp = match json {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(body.to_string())
                .map_err(|e| format!("{}", e))?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| format!("{}", e))?;

        if resp.ok() {
            Ok(())
        } else {
            Err(format!("{} returned {}", path, resp.status()))
        }
    }

    #[cfg(not(feature = "hydrate"))]
    {
        let _ = json;
        Err(format!("{} is only posted from the browser", path))
    }
}

/// POST the text of a selected file to /api/import
pub async fn import_file(file_name: String, contents: String) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(&url("/api/import")?)
            .header("x-file-name", &file_name)
            .body(contents)
            .map_err(|e| format!("{}", e))?
            .send()
            .await
            .map_err(|e| format!("{}", e))?;

        if resp.ok() {
            Ok(())
        } else {
            Err(format!("Import of {} returned {}", file_name, resp.status()))
        }
    }

    #[cfg(not(feature = "hydrate"))]
    {
        let _ = contents;
        Err(format!("{} can only be imported from the browser", file_name))
    }
}
