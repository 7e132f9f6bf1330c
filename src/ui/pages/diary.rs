//! Diary page: the preview page carrying every element the behaviours use.

use dioxus::prelude::*;

use crate::config::{PageConfig, PAGE_CONFIG_ELEMENT_ID};
use crate::ui::components::{
    AlertBox, DeleteLink, DeleteModal, FlashMessage, FlashMessages, Footer, ThemeToggle,
};

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const BOOTSTRAP_ICONS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.3/font/bootstrap-icons.min.css";

/// Loads the wasm bundle (its start function installs the page behaviours)
/// and publishes the exports as globals for inline `onclick` attributes.
const BOOT_SCRIPT: &str = r#"
import init, { confirmDelete, showAlert, toggleTheme } from '/pkg/pawlog_ui.js';
await init();
Object.assign(window, { confirmDelete, showAlert, toggleTheme });
"#;

/// Sample diary entries shown on the preview page: (id, date, note)
pub const SAMPLE_ENTRIES: &[(u32, &str, &str)] = &[
    (1, "2026-10-17", "Morning walk, 3 km"),
    (2, "2026-10-18", "Vet check-up, weight 12.4 kg"),
    (3, "2026-10-19", "New food brand, ate everything"),
];

/// Embed the config as JSON inside a `<script>` without letting it close the tag.
pub fn config_json_for_script(config: &PageConfig) -> String {
    config.to_json().replace("</", "<\\/")
}

#[component]
pub fn DiaryPage(config: PageConfig, flashes: Vec<FlashMessage>) -> Element {
    let ids = config.ids.clone();
    let config_json = config_json_for_script(&config);

    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "Diary - Pawlog" }
            link { rel: "stylesheet", href: BOOTSTRAP_CSS }
            link { rel: "stylesheet", href: BOOTSTRAP_ICONS }
            script {
                r#type: "application/json",
                id: PAGE_CONFIG_ELEMENT_ID,
                dangerous_inner_html: "{config_json}"
            }
            script { r#type: "module", dangerous_inner_html: BOOT_SCRIPT }
        }
        body {
            nav { class: "navbar border-bottom",
                div { class: "container",
                    a { class: "navbar-brand", href: "/", "Pawlog" }
                    ThemeToggle {
                        toggle_id: ids.theme_toggle.clone(),
                        icon_id: ids.theme_icon.clone(),
                    }
                }
            }
            main { class: "container py-4",
                FlashMessages { id: ids.flash_message.clone(), messages: flashes }
                AlertBox {
                    container_id: ids.alert_container.clone(),
                    message_id: ids.alert_message.clone(),
                }
                h1 { class: "h3 mb-3", "Diary" }
                table { class: "table align-middle",
                    thead {
                        tr {
                            th { "Date" }
                            th { "Note" }
                            th {}
                        }
                    }
                    tbody {
                        for (id, date, note) in SAMPLE_ENTRIES.iter() {
                            tr { key: "{id}",
                                td { "{date}" }
                                td { "{note}" }
                                td { class: "text-end",
                                    DeleteLink { url: format!("/entries/{}/delete", id) }
                                }
                            }
                        }
                    }
                }
                // Inline handler, same as the server templates call it
                div {
                    dangerous_inner_html: r#"<button type="button" class="btn btn-primary" onclick="showAlert('Saved.')">Save</button>"#
                }
            }
            DeleteModal {
                modal_id: ids.delete_modal.clone(),
                confirm_id: ids.confirm_delete.clone(),
            }
            Footer { year_id: ids.year.clone() }
        }
    }
}
