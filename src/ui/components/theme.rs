//! Theme toggle button.

use dioxus::prelude::*;

/// Toggle between light and dark. The wasm bundle binds the click handler
/// by id and swaps the icon class to match the active theme.
#[component]
pub fn ThemeToggle(toggle_id: String, icon_id: String) -> Element {
    rsx! {
        button {
            id: "{toggle_id}",
            r#type: "button",
            class: "btn btn-link nav-link",
            "aria-label": "Toggle theme",
            title: "Toggle theme",
            i { id: "{icon_id}", class: "bi bi-sun-fill" }
        }
    }
}
