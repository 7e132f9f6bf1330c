//! Platform seams between the page behaviours and the browser.
//!
//! Behaviours only talk to the page through these traits, so the same code runs
//! against `web-sys` in the browser and against the in-memory backend in tests.
//! Everything is single-threaded: handles are `Rc`, callbacks are `FnMut`
//! without `Send`.

use std::rc::Rc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::error::UiResult;

pub mod memory;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod web;

/// Shared handle to a page element.
pub type ElementRef = Rc<dyn Element>;

/// Click callback installed on an element.
pub type ClickHandler = Box<dyn FnMut(&dyn DomEvent)>;

/// The subset of a DOM event the behaviours need.
pub trait DomEvent {
    fn prevent_default(&self);
}

pub trait Element {
    fn text_content(&self) -> String;
    fn set_text_content(&self, text: &str);

    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);

    /// Install the element's click handler, replacing any previous one.
    fn set_click_handler(&self, handler: ClickHandler);
    fn clear_click_handler(&self);
}

pub trait Document {
    fn element_by_id(&self, id: &str) -> Option<ElementRef>;

    /// The `<html>` element.
    fn root(&self) -> Option<ElementRef>;

    /// All elements carrying `attribute`, in document order.
    fn elements_with_attribute(&self, attribute: &str) -> Vec<ElementRef>;
}

/// Browser-local key-value storage (`localStorage`).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> UiResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> UiResult<()>;
}

/// A cookie to write through `document.cookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub max_age_secs: u64,
}

impl Cookie {
    /// Render as a `document.cookie` assignment, e.g. `theme=dark; path=/; max-age=31536000`.
    pub fn to_header_value(&self) -> String {
        format!(
            "{}={}; path={}; max-age={}",
            self.name, self.value, self.path, self.max_age_secs
        )
    }
}

/// Find `name` in a `document.cookie` string (`a=1; theme=dark`).
pub fn find_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

pub trait CookieJar {
    fn get(&self, name: &str) -> UiResult<Option<String>>;
    fn set(&self, cookie: &Cookie) -> UiResult<()>;
}

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Handle to a scheduled task. Dropping it leaves the task scheduled.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle for a task that was never scheduled.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> UiResult<TimerHandle>;
}

pub trait Navigator {
    fn navigate(&self, url: &str) -> UiResult<()>;
}

/// OS-level `prefers-color-scheme` signal.
pub trait ColorSchemeSource {
    /// `None` when the platform exposes no preference.
    fn prefers_dark(&self) -> Option<bool>;

    /// Register a listener for preference changes (argument: prefers dark).
    fn on_change(&self, listener: Box<dyn FnMut(bool)>);
}

/// Everything a page behaviour may touch.
#[derive(Clone)]
pub struct PageServices {
    pub document: Rc<dyn Document>,
    pub storage: Rc<dyn KeyValueStore>,
    pub cookies: Rc<dyn CookieJar>,
    pub clock: Rc<dyn Clock>,
    pub scheduler: Rc<dyn Scheduler>,
    pub navigator: Rc<dyn Navigator>,
    pub color_scheme: Rc<dyn ColorSchemeSource>,
}

impl PageServices {
    /// Look up an element, logging when it is absent.
    pub fn element(&self, id: &str) -> Option<ElementRef> {
        let element = self.document.element_by_id(id);
        if element.is_none() {
            tracing::debug!("Element #{} not present, skipping", id);
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_value() {
        let cookie = Cookie {
            name: "theme".to_string(),
            value: "dark".to_string(),
            path: "/".to_string(),
            max_age_secs: 31_536_000,
        };
        assert_eq!(
            cookie.to_header_value(),
            "theme=dark; path=/; max-age=31536000"
        );
    }

    #[test]
    fn test_find_cookie() {
        let header = "session=abc; theme=light;other=1";
        assert_eq!(find_cookie(header, "theme").as_deref(), Some("light"));
        assert_eq!(find_cookie(header, "other").as_deref(), Some("1"));
        assert_eq!(find_cookie(header, "missing"), None);
        assert_eq!(find_cookie("", "theme"), None);
    }

    #[test]
    fn test_find_cookie_does_not_match_prefix() {
        assert_eq!(find_cookie("mytheme=dark", "theme"), None);
    }

    #[test]
    fn test_inert_handle_cancel_is_noop() {
        TimerHandle::inert().cancel();
    }

    #[test]
    fn test_cancel_runs_once() {
        let hits = Rc::new(std::cell::Cell::new(0));
        let counter = hits.clone();
        let handle = TimerHandle::new(move || counter.set(counter.get() + 1));
        handle.cancel();
        assert_eq!(hits.get(), 1);
    }
}
