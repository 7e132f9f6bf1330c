//! Shared Dioxus components carrying the markup the page behaviours bind to.

pub mod alerts;
pub mod delete_modal;
pub mod footer;
pub mod theme;

pub use alerts::{AlertBox, FlashCategory, FlashMessage, FlashMessages};
pub use delete_modal::{DeleteLink, DeleteModal};
pub use footer::Footer;
pub use theme::ThemeToggle;
