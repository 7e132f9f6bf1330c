//! `web-sys` backend for the browser (wasm32, `web` feature).
//!
//! Every lookup is guarded: a missing window, document or element degrades to
//! a no-op, never a panic.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use super::{
    ClickHandler, ColorSchemeSource, Cookie, CookieJar, Document, DomEvent, Element, ElementRef,
    KeyValueStore, Navigator, PageServices, Scheduler, SystemClock, TimerHandle,
};
use crate::error::{UiError, UiResult};

const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// Build services for the current browser window, if there is one.
pub fn web_services() -> Option<PageServices> {
    let window = web_sys::window()?;
    let document = window.document()?;
    Some(PageServices {
        document: Rc::new(WebDocument(document.clone())),
        storage: Rc::new(WebStorage(window.clone())),
        cookies: Rc::new(WebCookies(document)),
        clock: Rc::new(SystemClock),
        scheduler: Rc::new(WebScheduler(window.clone())),
        navigator: Rc::new(WebNavigator(window.clone())),
        color_scheme: Rc::new(WebColorScheme(window)),
    })
}

// ============ Events & elements ============

pub struct WebEvent(pub web_sys::Event);

impl DomEvent for WebEvent {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }
}

pub struct WebElement(pub web_sys::Element);

impl Element for WebElement {
    fn text_content(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        let _ = self.0.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.0.class_list().remove_1(class);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = self.0.set_attribute(name, value);
    }

    fn remove_attribute(&self, name: &str) {
        let _ = self.0.remove_attribute(name);
    }

    fn set_click_handler(&self, mut handler: ClickHandler) {
        let Some(html) = self.0.dyn_ref::<web_sys::HtmlElement>() else {
            return;
        };
        // Assigning onclick replaces the previous handler, like `el.onclick = fn`
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            handler(&WebEvent(event));
        })
        .into_js_value();
        html.set_onclick(Some(callback.unchecked_ref()));
    }

    fn clear_click_handler(&self) {
        if let Some(html) = self.0.dyn_ref::<web_sys::HtmlElement>() {
            html.set_onclick(None);
        }
    }
}

pub struct WebDocument(pub web_sys::Document);

impl Document for WebDocument {
    fn element_by_id(&self, id: &str) -> Option<ElementRef> {
        self.0
            .get_element_by_id(id)
            .map(|element| Rc::new(WebElement(element)) as ElementRef)
    }

    fn root(&self) -> Option<ElementRef> {
        self.0
            .document_element()
            .map(|element| Rc::new(WebElement(element)) as ElementRef)
    }

    fn elements_with_attribute(&self, attribute: &str) -> Vec<ElementRef> {
        let Ok(nodes) = self.0.query_selector_all(&format!("[{}]", attribute)) else {
            tracing::debug!("Invalid attribute selector {:?}", attribute);
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(|element| Rc::new(WebElement(element)) as ElementRef)
            .collect()
    }
}

// ============ Persistence ============

pub struct WebStorage(web_sys::Window);

impl WebStorage {
    fn storage(&self) -> UiResult<web_sys::Storage> {
        match self.0.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            _ => Err(UiError::StorageUnavailable),
        }
    }
}

impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> UiResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| UiError::Storage(js_err(e)))
    }

    fn set(&self, key: &str, value: &str) -> UiResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| UiError::Storage(js_err(e)))
    }
}

pub struct WebCookies(web_sys::Document);

impl WebCookies {
    fn html_document(&self) -> UiResult<&web_sys::HtmlDocument> {
        self.0
            .dyn_ref::<web_sys::HtmlDocument>()
            .ok_or_else(|| UiError::Cookie("document is not an HTML document".to_string()))
    }
}

impl CookieJar for WebCookies {
    fn get(&self, name: &str) -> UiResult<Option<String>> {
        let header = self
            .html_document()?
            .cookie()
            .map_err(|e| UiError::Cookie(js_err(e)))?;
        Ok(super::find_cookie(&header, name))
    }

    fn set(&self, cookie: &Cookie) -> UiResult<()> {
        self.html_document()?
            .set_cookie(&cookie.to_header_value())
            .map_err(|e| UiError::Cookie(js_err(e)))
    }
}

// ============ Timers, navigation, colour scheme ============

pub struct WebScheduler(web_sys::Window);

impl Scheduler for WebScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> UiResult<TimerHandle> {
        // The closure is owned here until it fires or the timer is cancelled,
        // whichever comes first. Dropping the handle leaves it scheduled.
        let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let fired = Rc::clone(&slot);
        let mut task = Some(task);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Some(task) = task.take() {
                task();
            }
            let done = fired.borrow_mut().take();
            drop(done);
        });

        let timeout_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let id = self
            .0
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout_ms,
            )
            .map_err(|e| UiError::Timer(js_err(e)))?;
        *slot.borrow_mut() = Some(callback);

        let window = self.0.clone();
        Ok(TimerHandle::new(move || {
            window.clear_timeout_with_handle(id);
            let cancelled = slot.borrow_mut().take();
            drop(cancelled);
        }))
    }
}

pub struct WebNavigator(web_sys::Window);

impl Navigator for WebNavigator {
    fn navigate(&self, url: &str) -> UiResult<()> {
        self.0
            .location()
            .set_href(url)
            .map_err(|e| UiError::Navigation {
                url: url.to_string(),
                reason: js_err(e),
            })
    }
}

pub struct WebColorScheme(web_sys::Window);

impl WebColorScheme {
    fn query(&self) -> Option<web_sys::MediaQueryList> {
        self.0.match_media(PREFERS_DARK_QUERY).ok().flatten()
    }
}

impl ColorSchemeSource for WebColorScheme {
    fn prefers_dark(&self) -> Option<bool> {
        self.query().map(|list| list.matches())
    }

    fn on_change(&self, mut listener: Box<dyn FnMut(bool)>) {
        let Some(list) = self.query() else {
            return;
        };
        let closure = Closure::<dyn FnMut(web_sys::MediaQueryListEvent)>::new(
            move |event: web_sys::MediaQueryListEvent| listener(event.matches()),
        );
        if list
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!("Failed to subscribe to colour scheme changes");
        }
        // Lives for the page
        closure.forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn window() -> web_sys::Window {
        web_sys::window().unwrap()
    }

    fn button(id: &str) -> web_sys::Element {
        let document = window().document().unwrap();
        let element = document.create_element("button").unwrap();
        element.set_id(id);
        document.body().unwrap().append_child(&element).unwrap();
        element
    }

    #[wasm_bindgen_test]
    fn cookie_round_trip_through_document() {
        let cookies = WebCookies(window().document().unwrap());
        let cookie = Cookie {
            name: "pawlog_test_theme".to_string(),
            value: "dark".to_string(),
            path: "/".to_string(),
            max_age_secs: 60,
        };

        cookies.set(&cookie).unwrap();
        assert_eq!(
            cookies.get("pawlog_test_theme").unwrap().as_deref(),
            Some("dark")
        );
        assert_eq!(cookies.get("pawlog_test_missing").unwrap(), None);
    }

    #[wasm_bindgen_test]
    fn storage_round_trip() {
        let storage = WebStorage(window());
        storage.set("pawlog_test_key", "light").unwrap();
        assert_eq!(
            storage.get("pawlog_test_key").unwrap().as_deref(),
            Some("light")
        );
    }

    #[wasm_bindgen_test]
    fn onclick_replaces_previous_handler() {
        let raw = button("pawlog-test-button");
        let element = WebElement(raw.clone());
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let counter = Rc::clone(&first);
        element.set_click_handler(Box::new(move |_: &dyn DomEvent| counter.set(counter.get() + 1)));
        let counter = Rc::clone(&second);
        element.set_click_handler(Box::new(move |_: &dyn DomEvent| counter.set(counter.get() + 1)));

        let html = raw.dyn_into::<web_sys::HtmlElement>().unwrap();
        html.click();
        assert_eq!((first.get(), second.get()), (0, 1));

        element.clear_click_handler();
        html.click();
        assert_eq!(second.get(), 1);
    }

    #[wasm_bindgen_test]
    fn document_finds_elements_by_attribute() {
        let raw = button("pawlog-test-trigger");
        raw.set_attribute("data-pawlog-test", "/entries/1/delete").unwrap();
        let document = WebDocument(window().document().unwrap());

        let found = document.elements_with_attribute("data-pawlog-test");
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].attribute("data-pawlog-test").as_deref(),
            Some("/entries/1/delete")
        );
        assert!(document.element_by_id("pawlog-test-trigger").is_some());
    }

    #[wasm_bindgen_test]
    fn cancelled_timer_releases_task() {
        let scheduler = WebScheduler(window());
        let marker = Rc::new(());
        let held = Rc::clone(&marker);

        let handle = scheduler
            .schedule(Duration::from_secs(60), Box::new(move || drop(held)))
            .unwrap();
        assert_eq!(Rc::strong_count(&marker), 2);

        handle.cancel();
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[wasm_bindgen_test]
    fn colour_scheme_reports_a_preference() {
        assert!(WebColorScheme(window()).prefers_dark().is_some());
    }
}
