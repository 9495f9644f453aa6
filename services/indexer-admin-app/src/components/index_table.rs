//! Index configuration table with export, import and delete controls

use crate::api::{
    edit_path, fetch_json, post, Fetched, RowResponse, TableBodyResponse, TableSnapshotResponse,
};
use crate::components::delete_popup::DeletePopup;
use crate::components::status_badge::StatusBadge;
use leptos::prelude::*;

/// Fetches /api/table every second and renders one row per config
#[component]
pub fn IndexTable() -> impl IntoView {
    let (refresh, set_refresh) = signal(0u64);
    let snapshot = Resource::new(
        move || refresh.get(),
        |_| async move {
            Fetched::from_result(fetch_json::<TableSnapshotResponse>("/api/table").await)
        },
    );
    let reload = Callback::new(move |_: ()| set_refresh.update(|n| *n += 1));

    #[cfg(feature = "hydrate")]
    {
        if let Ok(handle) =
            set_interval_with_handle(move || reload.run(()), std::time::Duration::from_secs(1))
        {
            on_cleanup(move || handle.clear());
        }
    }

    view! {
        <section>
            <Suspense fallback=move || view! { <p>"Loading index configs..."</p> }>
                {move || {
                    snapshot.get().map(|data| match data {
                        Fetched::Pending => view! { <p>"Loading index configs..."</p> }.into_any(),
                        Fetched::Unreachable => view! { <p>"API server unreachable."</p> }.into_any(),
                        Fetched::Loaded(data) => view! {
                            <Controls
                                connectivity=data.connectivity
                                import_file=data.import_file
                                on_done=reload
                            />
                            <table style="width: 100%; border-collapse: collapse;">
                                <thead>
                                    <tr style="border-bottom: 2px solid #dee2e6;">
                                        <th style="padding: 0.5rem; text-align: left;">"#"</th>
                                        <th style="padding: 0.5rem; text-align: left;">"Name"</th>
                                        <th style="padding: 0.5rem; text-align: left;">"Status"</th>
                                        <th style="padding: 0.5rem; text-align: left;">"Last update"</th>
                                        <th style="padding: 0.5rem; text-align: left;">"Used in"</th>
                                        <th style="padding: 0.5rem; text-align: left;"></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {match data.body {
                                        TableBodyResponse::Empty => view! {
                                            <tr>
                                                <td colspan="6" style="padding: 0.5rem; text-align: center;">
                                                    "No index configs"
                                                </td>
                                            </tr>
                                        }.into_any(),
                                        TableBodyResponse::Rows { rows } => rows
                                            .into_iter()
                                            .map(|row| view! { <IndexRow row=row on_done=reload /> })
                                            .collect::<Vec<_>>()
                                            .into_any(),
                                    }}
                                </tbody>
                            </table>
                            {data.delete_popup.map(|popup| view! {
                                <DeletePopup popup=popup on_done=reload />
                            })}
                        }.into_any(),
                    })
                }}
            </Suspense>
        </section>
    }
}

/// Connectivity badge plus export and import controls
#[component]
fn Controls(
    connectivity: String,
    import_file: Option<String>,
    on_done: Callback<()>,
) -> impl IntoView {
    view! {
        <section style="display: flex; gap: 1rem; align-items: center; margin-bottom: 1rem;">
            <span>"API server: " <StatusBadge status=connectivity /></span>
            <a href="/api/export" rel="external">"Export"</a>
            <label>
                "Import "
                <input
                    type="file"
                    on:change=move |ev| {
                        #[cfg(feature = "hydrate")]
                        {
                            use wasm_bindgen::JsCast;

                            let Some(input) = ev
                                .target()
                                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                            else {
                                return;
                            };
                            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                                return;
                            };
                            input.set_value("");
                            leptos::task::spawn_local(async move {
                                let name = file.name();
                                let text = wasm_bindgen_futures::JsFuture::from(file.text())
                                    .await
                                    .ok()
                                    .and_then(|v| v.as_string())
                                    .unwrap_or_default();
                                if let Err(e) = crate::api::import_file(name, text).await {
                                    leptos::logging::warn!("{}", e);
                                }
                                on_done.run(());
                            });
                        }
                        #[cfg(not(feature = "hydrate"))]
                        let _ = (ev, on_done);
                    }
                />
            </label>
            {import_file.map(|name| view! { <span>"Importing " {name} "..."</span> })}
        </section>
    }
}

/// One index configuration
#[component]
fn IndexRow(row: RowResponse, on_done: Callback<()>) -> impl IntoView {
    let id = row.id();
    let name = row.name();
    let edit_href = edit_path(&name);
    let running = row.running.as_ref().map(|entry| entry.to_string());
    let last_update = row.last_update();
    let used_in = row
        .used_in
        .into_iter()
        .map(|link| match link.url {
            Some(url) => view! { <a href=url target="_blank">{link.title}</a> " " }.into_any(),
            None => view! { <span>{link.title} " "</span> }.into_any(),
        })
        .collect::<Vec<_>>();

    let open_delete = move |_: leptos::ev::MouseEvent| {
        let path = format!("/api/configs/{}/delete", urlencoding::encode(&id));
        leptos::task::spawn_local(async move {
            if let Err(e) = post(&path, None).await {
                leptos::logging::warn!("{}", e);
            }
            on_done.run(());
        });
    };

    view! {
        <tr style="border-bottom: 1px solid #dee2e6;">
            <td style="padding: 0.5rem;">{row.row_number + 1}</td>
            <td style="padding: 0.5rem;"><a href=edit_href>{name}</a></td>
            <td style="padding: 0.5rem;" title=running>
                <StatusBadge status=row.status />
            </td>
            <td style="padding: 0.5rem;">{last_update}</td>
            <td style="padding: 0.5rem;">{used_in}</td>
            <td style="padding: 0.5rem;">
                <button on:click=open_delete>"Delete"</button>
            </td>
        </tr>
    }
}
