//! Delete link and the confirmation modal it opens.

use dioxus::prelude::*;

/// A destructive link. Clicking it opens the confirmation modal instead of
/// navigating; the modal's confirm button follows `url`.
#[component]
pub fn DeleteLink(
    /// Target of the delete action
    url: String,
    #[props(default = "Delete".to_string())] label: String,
) -> Element {
    rsx! {
        a {
            class: "btn btn-outline-danger btn-sm",
            href: "{url}",
            "data-confirm-delete": "",
            i { class: "bi bi-trash" }
            " {label}"
        }
    }
}

/// Bootstrap modal asking for confirmation. Hidden until a delete link is clicked.
#[component]
pub fn DeleteModal(modal_id: String, confirm_id: String) -> Element {
    rsx! {
        div {
            id: "{modal_id}",
            class: "modal fade",
            tabindex: "-1",
            "aria-labelledby": "{modal_id}Label",
            "aria-hidden": "true",
            div { class: "modal-dialog modal-dialog-centered",
                div { class: "modal-content",
                    div { class: "modal-header",
                        h5 { id: "{modal_id}Label", class: "modal-title", "Confirm deletion" }
                        button {
                            r#type: "button",
                            class: "btn-close",
                            "data-bs-dismiss": "modal",
                            "aria-label": "Close",
                        }
                    }
                    div { class: "modal-body",
                        "Are you sure you want to delete this? This cannot be undone."
                    }
                    div { class: "modal-footer",
                        button {
                            r#type: "button",
                            class: "btn btn-secondary",
                            "data-bs-dismiss": "modal",
                            "Cancel"
                        }
                        button {
                            id: "{confirm_id}",
                            r#type: "button",
                            class: "btn btn-danger",
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}
