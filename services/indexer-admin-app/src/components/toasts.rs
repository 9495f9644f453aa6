//! Toast stack fed by the shell's alert log

use std::time::Duration;

use crate::api::{fetch_json, AlertEntryResponse};
use leptos::prelude::*;

fn toast_colors(variant: &str) -> (&'static str, &'static str) {
    match variant {
        "success" => ("#155724", "#d4edda"),
        "danger" => ("#721c24", "#f8d7da"),
        "warning" => ("#856404", "#fff3cd"),
        _ => ("#0c5460", "#d1ecf1"),
    }
}

/// Polls /api/alerts for new entries and shows each for its duration
#[component]
pub fn Toasts() -> impl IntoView {
    let (toasts, set_toasts) = signal(Vec::<AlertEntryResponse>::new());
    let (last_seq, set_last_seq) = signal(0u64);

    let poll = move || {
        leptos::task::spawn_local(async move {
            let after = last_seq.get_untracked();
            let Ok(entries) =
                fetch_json::<Vec<AlertEntryResponse>>(&format!("/api/alerts?after={}", after))
                    .await
            else {
                return;
            };
            for entry in entries {
                set_last_seq.set(last_seq.get_untracked().max(entry.seq));
                let seq = entry.seq;
                set_timeout(
                    move || set_toasts.update(|t| t.retain(|e| e.seq != seq)),
                    Duration::from_secs(u64::from(entry.duration_sec)),
                );
                set_toasts.update(|t| t.push(entry));
            }
        });
    };

    #[cfg(feature = "hydrate")]
    {
        if let Ok(handle) = set_interval_with_handle(poll, Duration::from_secs(1)) {
            on_cleanup(move || handle.clear());
        }
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = poll;

    view! {
        <div style="position: fixed; top: 1rem; right: 1rem; width: 320px;">
            <For
                each=move || toasts.get()
                key=|entry| entry.seq
                children=move |entry| {
                    let (color, bg) = toast_colors(&entry.variant);
                    let style = format!(
                        "padding: 0.75rem; margin-bottom: 0.5rem; border-radius: 0.25rem; \
                         color: {}; background-color: {};",
                        color, bg
                    );
                    view! {
                        <div style=style>
                            <strong>{entry.title}</strong>
                            <pre style="margin: 0; font-family: inherit; white-space: pre-wrap;">
                                {entry.message}
                            </pre>
                        </div>
                    }
                }
            />
        </div>
    }
}
