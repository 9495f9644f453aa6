//! Web dashboard: server-rendered views, JSON API and operator actions

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::app::{current_epoch_ms, AlertEntry, AppShell};
use crate::model::IndexId;
use crate::table::{
    pretty_json, Connectivity, DeletePopupView, IndexTable, RowStatus, RowView, TableBody,
};

/// Header carrying the name of the file posted to `/api/import`
pub const FILE_NAME_HEADER: &str = "x-file-name";

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub shell: Arc<AppShell>,
    pub table: Arc<IndexTable>,
    pub export_file_name: String,
}

/// Build the dashboard axum router
pub fn build_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/index", get(new_index_handler).post(save_index_handler))
        .route("/index/{name}", get(edit_index_handler))
        .route("/api/table", get(table_handler))
        .route("/api/alerts", get(alerts_handler))
        .route("/api/configs/{id}/delete", post(open_delete_handler))
        .route("/api/delete/data", post(delete_data_handler))
        .route("/api/delete/confirm", post(confirm_delete_handler))
        .route("/api/delete/cancel", post(cancel_delete_handler))
        .route("/api/export", get(export_handler))
        .route("/api/import", post(import_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct AlertsQuery {
    after: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DeleteDataRequest {
    checked: bool,
}

#[derive(Debug, Deserialize)]
struct SaveIndexForm {
    config: String,
}

async fn home_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let snapshot = dashboard.table.snapshot().await;
    let alerts = dashboard.shell.active_alerts(current_epoch_ms()).await;
    let last_seq = dashboard.shell.len().await;

    let status = connectivity_badge(snapshot.connectivity);
    let rows = match &snapshot.body {
        TableBody::Empty => {
            r#"<tr><td colspan="6" style="padding: 0.5rem; text-align: center;">No index configs</td></tr>"#
                .to_string()
        }
        TableBody::Rows { rows } => rows.iter().map(render_row).collect(),
    };
    let import_file = snapshot
        .import_file
        .as_deref()
        .map(|name| format!("<span>Importing {}...</span>", escape(name)))
        .unwrap_or_default();
    let popup = snapshot
        .delete_popup
        .as_ref()
        .map(render_delete_popup)
        .unwrap_or_default();
    let rendered_rows = serde_json::to_string(&snapshot.body)
        .map(|json| {
            format!(
                "<script>renderedRows = rowSignature({});</script>",
                script_json(&json)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<section style="display: flex; gap: 1rem; align-items: center; margin-bottom: 1rem;">
        <span>API server: <span id="connectivity">{status}</span></span>
        <a href="/api/export">Export</a>
        <label>Import <input type="file" id="import-file" onchange="importFile(this)"></label>
        {import_file}
    </section>
    <table style="width: 100%; border-collapse: collapse;">
        <thead>
            <tr style="border-bottom: 2px solid #dee2e6;">
                <th style="padding: 0.5rem; text-align: left;">#</th>
                <th style="padding: 0.5rem; text-align: left;">Name</th>
                <th style="padding: 0.5rem; text-align: left;">Status</th>
                <th style="padding: 0.5rem; text-align: left;">Last update</th>
                <th style="padding: 0.5rem; text-align: left;">Used in</th>
                <th style="padding: 0.5rem; text-align: left;"></th>
            </tr>
        </thead>
        <tbody id="index-body">{rows}</tbody>
    </table>
    {rendered_rows}
    {popup}"#
    );

    Html(page("Indexes", &body, &alerts, last_seq))
}

async fn new_index_handler(State(dashboard): State<DashboardState>) -> Response {
    let template = serde_json::json!({ "name": "", "dashboards": {} });
    edit_page(&dashboard, "New index", &template).await
}

async fn edit_index_handler(
    State(dashboard): State<DashboardState>,
    Path(name): Path<String>,
) -> Response {
    let Some(config) = dashboard.table.config_by_name(&name).await else {
        return (
            StatusCode::NOT_FOUND,
            Html(page(
                "Not found",
                &format!("<p>No index config named {}</p>", escape(&name)),
                &[],
                dashboard.shell.len().await,
            )),
        )
            .into_response();
    };
    edit_page(&dashboard, &format!("Edit {}", name), config.as_value()).await
}

async fn edit_page(dashboard: &DashboardState, title: &str, config: &serde_json::Value) -> Response {
    let text = match pretty_json(config) {
        Ok(text) => text,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };
    let body = format!(
        r#"<form method="post" action="/index">
        <textarea name="config" rows="24" style="width: 100%; font-family: monospace;">{}</textarea>
        <p><button type="submit">Save</button> <a href="/">Cancel</a></p>
    </form>"#,
        escape(&text)
    );
    let alerts = dashboard.shell.active_alerts(current_epoch_ms()).await;
    Html(page(title, &body, &alerts, dashboard.shell.len().await)).into_response()
}

async fn save_index_handler(
    State(dashboard): State<DashboardState>,
    Form(form): Form<SaveIndexForm>,
) -> impl IntoResponse {
    dashboard.table.save_config(&form.config).await;
    Redirect::to("/")
}

async fn table_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    Json(dashboard.table.snapshot().await)
}

async fn alerts_handler(
    State(dashboard): State<DashboardState>,
    Query(query): Query<AlertsQuery>,
) -> impl IntoResponse {
    Json(dashboard.shell.alerts_after(query.after.unwrap_or(0)).await)
}

async fn open_delete_handler(
    State(dashboard): State<DashboardState>,
    Path(id): Path<String>,
) -> Response {
    match dashboard.table.show_delete_popup(&IndexId::new(id)).await {
        Some(_) => Redirect::to("/").into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_data_handler(
    State(dashboard): State<DashboardState>,
    Json(request): Json<DeleteDataRequest>,
) -> impl IntoResponse {
    dashboard.table.set_delete_data(request.checked).await;
    StatusCode::NO_CONTENT
}

async fn confirm_delete_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    dashboard.table.confirm_delete().await;
    Redirect::to("/")
}

async fn cancel_delete_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    dashboard.table.cancel_delete().await;
    Redirect::to("/")
}

async fn export_handler(State(dashboard): State<DashboardState>) -> Response {
    match dashboard.table.export().await {
        Ok(text) => (
            [
                (
                    header::CONTENT_TYPE,
                    "application/json;charset=UTF-8".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", dashboard.export_file_name),
                ),
            ],
            text,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("Export failed: {}", e);
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

async fn import_handler(
    State(dashboard): State<DashboardState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let file_name = headers
        .get(FILE_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("upload")
        .to_string();

    match dashboard.table.import(&file_name, &body).await {
        Some(counts) => Json(counts).into_response(),
        None => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

fn connectivity_badge(connectivity: Connectivity) -> String {
    let (label, color, bg) = match connectivity {
        Connectivity::Online => ("Online", "#155724", "#d4edda"),
        Connectivity::Offline => ("Offline", "#721c24", "#f8d7da"),
    };
    badge(label, color, bg)
}

fn status_badge(status: RowStatus) -> String {
    let (label, color, bg) = match status {
        RowStatus::Running => ("Running", "#004085", "#cce5ff"),
        RowStatus::Ready => ("Ready", "#155724", "#d4edda"),
        RowStatus::New => ("New", "#383d41", "#e2e3e5"),
    };
    badge(label, color, bg)
}

fn badge(label: &str, color: &str, bg: &str) -> String {
    format!(
        r#"<span style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: {}; background-color: {};">{}</span>"#,
        color, bg, label
    )
}

fn render_row(row: &RowView) -> String {
    let name = escape(row.config.name());
    let running = row
        .running
        .as_ref()
        .map(|entry| format!(r#" title="{}""#, escape(&entry.to_string())))
        .unwrap_or_default();
    let used_in: Vec<String> = row
        .used_in
        .iter()
        .map(|link| match &link.url {
            Some(url) => format!(
                r#"<a href="{}" target="_blank">{}</a>"#,
                escape(url),
                escape(&link.title)
            ),
            None => escape(&link.title),
        })
        .collect();

    format!(
        r#"<tr data-row="{}" style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;"><a href="/index/{}">{}</a></td>
                    <td style="padding: 0.5rem;"{}>{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">
                        <form method="post" action="/api/configs/{}/delete" style="margin: 0;"><button type="submit">Delete</button></form>
                    </td>
                </tr>"#,
        row.row_number,
        row.row_number + 1,
        urlencoding::encode(row.config.name()),
        name,
        running,
        status_badge(row.status),
        escape(row.config.last_update().as_deref().unwrap_or("")),
        used_in.join(", "),
        urlencoding::encode(row.config.id().as_str()),
    )
}

fn render_delete_popup(popup: &DeletePopupView) -> String {
    let dashboards = if popup.affected_dashboards.is_empty() {
        String::new()
    } else {
        let items: String = popup
            .affected_dashboards
            .iter()
            .map(|title| format!("<li>{}</li>", escape(title)))
            .collect();
        format!("<p>The following dashboards use this index:</p><ul>{items}</ul>")
    };
    let delete_data = if popup.offers_delete_data {
        format!(
            r#"<p><label><input type="checkbox" id="delete-data" onchange="setDeleteData(this.checked)"{}> Also delete indexed data</label></p>"#,
            if popup.delete_data { " checked" } else { "" }
        )
    } else {
        String::new()
    };

    format!(
        r#"<div id="delete-popup" style="position: fixed; inset: 0; background: rgba(0,0,0,0.4); display: flex; align-items: center; justify-content: center;">
        <div style="background: #fff; padding: 1.5rem; border-radius: 0.5rem; min-width: 320px;">
            <h2>Delete {}?</h2>
            {dashboards}
            {delete_data}
            <div style="display: flex; gap: 0.5rem;">
                <form method="post" action="/api/delete/confirm"><button type="submit">Delete</button></form>
                <form method="post" action="/api/delete/cancel"><button type="submit">Cancel</button></form>
            </div>
        </div>
    </div>"#,
        escape(&popup.index_name)
    )
}

fn render_toast(entry: &AlertEntry) -> String {
    let (color, bg) = match entry.alert.variant {
        crate::alert::AlertVariant::Success => ("#155724", "#d4edda"),
        crate::alert::AlertVariant::Danger => ("#721c24", "#f8d7da"),
        crate::alert::AlertVariant::Warning => ("#856404", "#fff3cd"),
        crate::alert::AlertVariant::Info => ("#0c5460", "#d1ecf1"),
    };
    format!(
        r#"<div class="toast" data-expires="{}" style="padding: 0.75rem; margin-bottom: 0.5rem; border-radius: 0.25rem; color: {}; background-color: {};"><strong>{}</strong><pre style="margin: 0; font-family: inherit; white-space: pre-wrap;">{}</pre></div>"#,
        entry.raised_epoch_ms + u64::from(entry.alert.duration_sec) * 1000,
        color,
        bg,
        escape(&entry.alert.title),
        escape(&entry.alert.message)
    )
}

fn page(title: &str, body: &str, alerts: &[AlertEntry], last_seq: usize) -> String {
    let toasts: String = alerts.iter().map(render_toast).collect();
    let title = escape(title);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Indexer Admin - {title}</title>
    <script>
        let lastSeq = {last_seq};
        const colors = {{
            'success': ['#155724', '#d4edda'],
            'danger': ['#721c24', '#f8d7da'],
            'warning': ['#856404', '#fff3cd'],
            'info': ['#0c5460', '#d1ecf1'],
        }};
        function escapeHtml(text) {{
            const div = document.createElement('div');
            div.textContent = text;
            return div.innerHTML;
        }}
        function pollAlerts() {{
            fetch('/api/alerts?after=' + lastSeq)
                .then(r => r.json())
                .then(entries => {{
                    const stack = document.getElementById('toasts');
                    entries.forEach(e => {{
                        lastSeq = Math.max(lastSeq, e.seq);
                        const [color, bg] = colors[e.variant] || colors['info'];
                        stack.insertAdjacentHTML('beforeend', `<div class="toast" data-expires="${{e.raised_epoch_ms + e.durationSec * 1000}}" style="padding: 0.75rem; margin-bottom: 0.5rem; border-radius: 0.25rem; color: ${{color}}; background-color: ${{bg}};"><strong>${{escapeHtml(e.title)}}</strong><pre style="margin: 0; font-family: inherit; white-space: pre-wrap;">${{escapeHtml(e.message)}}</pre></div>`);
                    }});
                }});
            const now = Date.now();
            document.querySelectorAll('.toast').forEach(t => {{
                if (Number(t.dataset.expires) <= now) t.remove();
            }});
        }}
        let renderedRows = null;
        // Everything a row shows apart from its status badge
        function rowSignature(body) {{
            const rows = body.kind === 'rows' ? body.rows : [];
            return JSON.stringify(rows.map(row => [row.config, row.used_in]));
        }}
        function refreshTable() {{
            const tbody = document.getElementById('index-body');
            if (!tbody || document.getElementById('delete-popup')) return;
            fetch('/api/table')
                .then(r => r.json())
                .then(data => {{
                    document.getElementById('connectivity').textContent =
                        data.connectivity === 'online' ? 'Online' : 'Offline';
                    if (renderedRows !== null && rowSignature(data.body) !== renderedRows) {{
                        location.reload();
                        return;
                    }}
                    const labels = {{ 'running': 'Running', 'ready': 'Ready', 'new': 'New' }};
                    const rows = data.body.kind === 'rows' ? data.body.rows : [];
                    rows.forEach(row => {{
                        const tr = tbody.querySelector(`tr[data-row="${{row.row_number}}"]`);
                        if (tr) tr.children[2].textContent = labels[row.status];
                    }});
                }});
        }}
        function setDeleteData(checked) {{
            fetch('/api/delete/data', {{
                method: 'POST',
                headers: {{ 'Content-Type': 'application/json' }},
                body: JSON.stringify({{ checked }}),
            }});
        }}
        function importFile(input) {{
            const file = input.files[0];
            if (!file) return;
            file.text().then(text => fetch('/api/import', {{
                method: 'POST',
                headers: {{ '{file_name_header}': file.name }},
                body: text,
            }})).then(() => location.reload());
        }}
        setInterval(pollAlerts, 1000);
        setInterval(refreshTable, 1000);
    </script>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <nav style="display: flex; gap: 1rem; align-items: baseline;">
        <h1 style="margin-right: auto;">Indexer Admin</h1>
        <a href="/">Indexes</a>
        <a href="/index">New index</a>
    </nav>
    <div id="toasts" style="position: fixed; top: 1rem; right: 1rem; width: 320px;">{toasts}</div>
    {body}
</body>
</html>"#,
        file_name_header = FILE_NAME_HEADER,
    )
}

/// JSON embedded in an inline script; `</` would close the script element
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
