//! Main App component

use crate::components::edit_index::EditIndex;
use crate::components::index_table::IndexTable;
use crate::components::toasts::Toasts;
use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Indexer Admin" />
        <Router>
            <main style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
                <nav style="display: flex; gap: 1rem; align-items: baseline;">
                    <h1 style="margin-right: auto;">"Indexer Admin"</h1>
                    <a href="/">"Indexes"</a>
                    <a href="/index">"New index"</a>
                </nav>
                <Toasts />
                <Routes fallback=|| view! { <p>"Page not found."</p> }>
                    <Route path=path!("/") view=IndexTable />
                    <Route path=path!("/index") view=EditIndex />
                    <Route path=path!("/index/:name") view=EditIndex />
                </Routes>
            </main>
        </Router>
    }
}
