//! Delete confirmation dialog

use crate::api::{id_text, post, DeletePopupResponse};
use leptos::prelude::*;

/// Dialog for the pending deletion; `on_done` runs after any action
#[component]
pub fn DeletePopup(
    popup: DeletePopupResponse,
    #[prop(into)] on_done: Callback<()>,
) -> impl IntoView {
    let id = id_text(&popup.id);
    let dashboards = (!popup.affected_dashboards.is_empty()).then(|| {
        view! {
            <p>"The following dashboards use this index:"</p>
            <ul>
                {popup
                    .affected_dashboards
                    .into_iter()
                    .map(|title| view! { <li>{title}</li> })
                    .collect::<Vec<_>>()}
            </ul>
        }
    });
    let delete_data = popup.offers_delete_data.then(|| {
        view! {
            <p>
                <label>
                    <input
                        type="checkbox"
                        prop:checked=popup.delete_data
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            leptos::task::spawn_local(async move {
                                let body = serde_json::json!({ "checked": checked });
                                if let Err(e) = post("/api/delete/data", Some(body)).await {
                                    leptos::logging::warn!("{}", e);
                                }
                            });
                        }
                    />
                    " Also delete indexed data"
                </label>
            </p>
        }
    });

    let act = move |path: &'static str| {
        leptos::task::spawn_local(async move {
            if let Err(e) = post(path, None).await {
                leptos::logging::warn!("{}", e);
            }
            on_done.run(());
        });
    };

    view! {
        <div
            id="delete-popup"
            style="position: fixed; inset: 0; background: rgba(0,0,0,0.4); display: flex; align-items: center; justify-content: center;"
        >
            <div style="background: #fff; padding: 1.5rem; border-radius: 0.5rem; min-width: 320px;">
                <h2>"Delete " {popup.index_name} "?"</h2>
                {dashboards}
                {delete_data}
                <div style="display: flex; gap: 0.5rem;" data-id=id>
                    <button on:click=move |_| act("/api/delete/confirm")>"Delete"</button>
                    <button on:click=move |_| act("/api/delete/cancel")>"Cancel"</button>
                </div>
            </div>
        </div>
    }
}
