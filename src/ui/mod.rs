//! Web UI: Dioxus components for the page markup and, with the `server`
//! feature, the preview server's handlers.
//!
//! - components/ - Markup the page behaviours bind to (toggle, modal, alerts, footer)
//! - pages/ - Full pages rendered with Dioxus SSR

pub mod components;
pub mod pages;

use crate::platform::find_cookie;
use crate::theme::Theme;
use components::{FlashCategory, FlashMessage};

/// Flash shown after a delete, matching the pet diary's delete routes.
pub const ENTRY_DELETED_FLASH: &str = "Entry deleted successfully.";

/// Build the flash list from `?flash=<msg>&category=<cat>`.
pub fn flashes_from_query(flash: Option<&str>, category: Option<&str>) -> Vec<FlashMessage> {
    match flash.map(str::trim) {
        Some(text) if !text.is_empty() => vec![FlashMessage {
            category: category.map(FlashCategory::parse).unwrap_or_default(),
            text: text.to_string(),
        }],
        _ => Vec::new(),
    }
}

/// Redirect target carrying a flash message.
pub fn flash_redirect_target(path: &str, message: &str, category: &str) -> String {
    format!(
        "{}?flash={}&category={}",
        path,
        urlencoding::encode(message),
        urlencoding::encode(category)
    )
}

/// Theme to pre-render on `<html>` from the request's `Cookie` header, so a
/// returning visitor never sees the wrong theme before the wasm bundle loads.
pub fn theme_from_cookie_header(header: Option<&str>, key: &str) -> Option<Theme> {
    header
        .and_then(|h| find_cookie(h, key))
        .and_then(|value| Theme::parse(&value))
}

/// Wrap rendered `<head>`/`<body>` markup into a full HTML document.
pub fn html_doc(body: &str, theme: Option<Theme>, root_attribute: &str) -> String {
    let theme_attr = theme
        .map(|t| format!(" {}=\"{}\"", root_attribute, t.as_str()))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"{}>\n{}</html>",
        theme_attr, body
    )
}

#[cfg(feature = "server")]
pub use server::{delete_entry, diary_page, healthz, router, AppState, FlashQuery};

#[cfg(feature = "server")]
mod server {
    use std::path::Path;
    use std::sync::Arc;

    use axum::{
        extract::{Path as UrlPath, Query, State},
        http::{header, HeaderMap},
        response::{Html, IntoResponse, Redirect},
        routing::get,
        Router,
    };
    use dioxus::prelude::*;
    use serde::Deserialize;
    use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

    use super::pages::DiaryPage;
    use super::{
        flash_redirect_target, flashes_from_query, html_doc, theme_from_cookie_header,
        ENTRY_DELETED_FLASH,
    };
    use crate::config::PageConfig;

    #[derive(Clone)]
    pub struct AppState {
        pub page: Arc<PageConfig>,
    }

    impl AppState {
        pub fn new(page: PageConfig) -> Self {
            Self {
                page: Arc::new(page),
            }
        }
    }

    /// Query params carrying a flashed message across a redirect
    #[derive(Debug, Default, Deserialize)]
    pub struct FlashQuery {
        pub flash: Option<String>,
        pub category: Option<String>,
    }

    /// GET / - Diary page
    pub async fn diary_page(
        State(state): State<AppState>,
        Query(query): Query<FlashQuery>,
        headers: HeaderMap,
    ) -> impl IntoResponse {
        let config = (*state.page).clone();
        let flashes = flashes_from_query(query.flash.as_deref(), query.category.as_deref());
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok());
        let theme = theme_from_cookie_header(cookie, &config.theme.storage_key);
        let root_attribute = config.theme.root_attribute.clone();

        let html = dioxus::ssr::render_element(rsx! {
            DiaryPage { config, flashes }
        });
        Html(html_doc(&html, theme, &root_attribute))
    }

    /// GET /entries/{id}/delete - Confirmed delete: flash and go back to the diary
    pub async fn delete_entry(UrlPath(id): UrlPath<u32>) -> Redirect {
        tracing::info!("Deleting diary entry {}", id);
        Redirect::to(&flash_redirect_target("/", ENTRY_DELETED_FLASH, "success"))
    }

    /// GET /healthz
    pub async fn healthz() -> &'static str {
        "ok"
    }

    pub fn router(state: AppState, pkg_dir: &Path) -> Router {
        Router::new()
            .route("/", get(diary_page))
            .route("/entries/{id}/delete", get(delete_entry))
            .route("/healthz", get(healthz))
            .nest_service("/pkg", ServeDir::new(pkg_dir))
            .layer(CompressionLayer::new())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flashes_from_query() {
        let flashes = flashes_from_query(Some("Entry deleted successfully."), Some("success"));
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].category, FlashCategory::Success);
        assert_eq!(flashes[0].text, "Entry deleted successfully.");

        assert!(flashes_from_query(None, Some("success")).is_empty());
        assert!(flashes_from_query(Some("   "), None).is_empty());
        assert_eq!(
            flashes_from_query(Some("Hi"), None)[0].category,
            FlashCategory::Info
        );
    }

    #[test]
    fn test_flash_redirect_target_is_encoded() {
        assert_eq!(
            flash_redirect_target("/", "Entry deleted successfully.", "success"),
            "/?flash=Entry%20deleted%20successfully.&category=success"
        );
    }

    #[test]
    fn test_theme_from_cookie_header() {
        assert_eq!(
            theme_from_cookie_header(Some("session=x; theme=dark"), "theme"),
            Some(Theme::Dark)
        );
        assert_eq!(theme_from_cookie_header(Some("theme=blue"), "theme"), None);
        assert_eq!(theme_from_cookie_header(None, "theme"), None);
    }

    #[test]
    fn test_html_doc_theme_attribute() {
        assert_eq!(
            html_doc("<body></body>", Some(Theme::Dark), "data-bs-theme"),
            "<!DOCTYPE html>\n<html lang=\"en\" data-bs-theme=\"dark\">\n<body></body></html>"
        );
        assert!(html_doc("", None, "data-bs-theme").contains("<html lang=\"en\">"));
    }

    #[test]
    fn test_flash_category_parse() {
        assert_eq!(FlashCategory::parse("danger"), FlashCategory::Danger);
        assert_eq!(FlashCategory::parse("error"), FlashCategory::Danger);
        assert_eq!(FlashCategory::parse("whatever"), FlashCategory::Info);
        assert_eq!(FlashCategory::Success.css_class(), "alert-success");
    }
}
