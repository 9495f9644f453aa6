//! Status badge component

use leptos::prelude::*;

/// Badge colors for a row status or connectivity state
pub fn badge_colors(status: &str) -> (&'static str, &'static str) {
    match status {
        "running" => ("#004085", "#cce5ff"),
        "ready" | "online" => ("#155724", "#d4edda"),
        "offline" => ("#721c24", "#f8d7da"),
        _ => ("#383d41", "#e2e3e5"),
    }
}

/// Capitalized label for a wire status such as `ready`
pub fn badge_label(status: &str) -> String {
    let mut chars = status.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A colored badge: Running (blue), Ready/Online (green), Offline (red), New (gray)
#[component]
pub fn StatusBadge(status: String) -> impl IntoView {
    let (color, bg) = badge_colors(&status);

    let style = format!(
        "display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; \
         font-size: 0.85em; font-weight: 600; color: {}; background-color: {};",
        color, bg
    );

    view! {
        <span style=style>{badge_label(&status)}</span>
    }
}
