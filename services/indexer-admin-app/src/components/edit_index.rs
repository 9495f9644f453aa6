//! Edit view for a single index configuration

use crate::api::{
    fetch_json, new_config_template, pretty, Fetched, TableBodyResponse, TableSnapshotResponse,
};
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

/// Shows the named config (or a template) as JSON; saving posts the form
/// back to the server, which upserts it through the import endpoint
#[component]
pub fn EditIndex() -> impl IntoView {
    let params = use_params_map();
    let name = move || params.read().get("name");

    let config = Resource::new(name, |name| async move {
        let Some(name) = name else {
            return Fetched::Loaded(Some(pretty(&new_config_template())));
        };
        let snapshot =
            match Fetched::from_result(fetch_json::<TableSnapshotResponse>("/api/table").await) {
                Fetched::Loaded(snapshot) => snapshot,
                Fetched::Unreachable => return Fetched::Unreachable,
                Fetched::Pending => return Fetched::Pending,
            };
        Fetched::Loaded(match snapshot.body {
            TableBodyResponse::Empty => None,
            TableBodyResponse::Rows { rows } => rows
                .into_iter()
                .find(|row| row.name() == name)
                .map(|row| pretty(&row.config)),
        })
    });

    // A server-rendered view has no record yet; fetch it once hydrated
    Effect::new(move |_| {
        if matches!(config.get(), Some(Fetched::Pending)) {
            config.refetch();
        }
    });

    view! {
        <section>
            <h2>
                {move || match name() {
                    Some(name) => format!("Edit {}", name),
                    None => "New index".to_string(),
                }}
            </h2>
            <Suspense fallback=move || view! { <p>"Loading config..."</p> }>
                {move || {
                    config.get().map(|text| match text {
                        Fetched::Pending => view! { <p>"Loading config..."</p> }.into_any(),
                        Fetched::Unreachable => view! { <p>"API server unreachable."</p> }.into_any(),
                        Fetched::Loaded(None) => view! { <p>"No index config with that name."</p> }.into_any(),
                        Fetched::Loaded(Some(text)) => view! {
                            <form method="post" action="/index">
                                <textarea
                                    name="config"
                                    rows="24"
                                    style="width: 100%; font-family: monospace;"
                                >
                                    {text}
                                </textarea>
                                <p>
                                    <button type="submit">"Save"</button>
                                    " "
                                    <a href="/">"Cancel"</a>
                                </p>
                            </form>
                        }.into_any(),
                    })
                }}
            </Suspense>
        </section>
    }
}
