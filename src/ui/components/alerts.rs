//! Flashed messages and the transient alert box.

use dioxus::prelude::*;

/// Flash categories, as used by the server when flashing a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FlashCategory {
    Success,
    #[default]
    Info,
    Warning,
    Danger,
}

impl FlashCategory {
    pub fn parse(s: &str) -> Self {
        match s {
            "success" => FlashCategory::Success,
            "warning" => FlashCategory::Warning,
            "danger" | "error" => FlashCategory::Danger,
            _ => FlashCategory::Info,
        }
    }

    /// Bootstrap alert class
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashCategory::Success => "alert-success",
            FlashCategory::Info => "alert-info",
            FlashCategory::Warning => "alert-warning",
            FlashCategory::Danger => "alert-danger",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlashMessage {
    pub category: FlashCategory,
    pub text: String,
}

/// Messages flashed by the previous request. The whole group fades together
/// once the wasm bundle's dismiss timer fires.
#[component]
pub fn FlashMessages(id: String, messages: Vec<FlashMessage>) -> Element {
    if messages.is_empty() {
        return rsx! {};
    }

    rsx! {
        div { id: "{id}", class: "flash-messages fade show",
            for message in messages.iter() {
                div {
                    class: format!("alert {} mb-2", message.category.css_class()),
                    role: "alert",
                    {message.text.clone()}
                }
            }
        }
    }
}

/// Hidden alert box filled in by `showAlert(message)`.
#[component]
pub fn AlertBox(container_id: String, message_id: String) -> Element {
    rsx! {
        div {
            id: "{container_id}",
            class: "alert alert-info d-none",
            role: "status",
            "aria-live": "polite",
            span { id: "{message_id}" }
        }
    }
}
