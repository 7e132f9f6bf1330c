//! Browser entry point (wasm32, `web` feature).
//!
//! Installs the page behaviours when the module loads and exposes the global
//! functions server templates call inline:
//! `confirmDelete(event, url)`, `showAlert(message)`, `toggleTheme()`.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::config::{PageConfig, PAGE_CONFIG_ELEMENT_ID};
use crate::page::PageBehaviours;
use crate::platform::web::{web_services, WebEvent};
use crate::platform::PageServices;

thread_local! {
    static PAGE: RefCell<Option<PageBehaviours>> = const { RefCell::new(None) };
}

/// Read the config block the server embedded, falling back to defaults.
fn page_config(services: &PageServices) -> PageConfig {
    let Some(element) = services.document.element_by_id(PAGE_CONFIG_ELEMENT_ID) else {
        return PageConfig::default();
    };
    match PageConfig::from_json(&element.text_content()) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid page config: {}", e);
            PageConfig::default()
        }
    }
}

/// Route `tracing` events to the browser console.
///
/// No tracing subscriber runs in the browser, so events fall through to `log`
/// (the `tracing/log` feature) and `console_log` writes them out.
fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // Already installed when the module is re-initialised
    let _ = console_log::init_with_level(level);
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    init_logging();

    let Some(services) = web_services() else {
        return;
    };
    let config = page_config(&services);
    let page = PageBehaviours::install(services, &config);
    PAGE.with(|slot| *slot.borrow_mut() = Some(page));
}

fn with_page(f: impl FnOnce(&PageBehaviours)) {
    PAGE.with(|slot| {
        if let Some(page) = slot.borrow().as_ref() {
            f(page);
        }
    });
}

#[wasm_bindgen(js_name = confirmDelete)]
pub fn confirm_delete(event: web_sys::Event, url: String) {
    let event = WebEvent(event);
    with_page(|page| page.confirm_delete(&event, &url));
}

#[wasm_bindgen(js_name = showAlert)]
pub fn show_alert(message: String) {
    with_page(|page| {
        page.show_alert(&message);
    });
}

#[wasm_bindgen(js_name = toggleTheme)]
pub fn toggle_theme() -> String {
    let mut theme = String::new();
    with_page(|page| theme = page.toggle_theme().as_str().to_string());
    theme
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn logging_reaches_the_console_logger() {
        init_logging();
        init_logging();
        assert!(log::max_level() >= log::LevelFilter::Info);
        assert!(log::log_enabled!(log::Level::Warn));
    }

    #[wasm_bindgen_test]
    fn missing_config_block_uses_defaults() {
        let Some(services) = web_services() else {
            panic!("test runs in a browser window");
        };
        assert_eq!(page_config(&services), PageConfig::default());
    }
}
