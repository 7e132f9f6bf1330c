//! In-memory platform backend.
//!
//! A headless stand-in for the browser: elements are plain structs, storage is a
//! map, and time only moves when [`ManualScheduler::advance`] is called. Used by
//! the unit and integration tests to drive the behaviours deterministically.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;
use std::time::Duration;

use chrono::NaiveDate;

use super::{
    ClickHandler, Clock, ColorSchemeSource, Cookie, CookieJar, Document, DomEvent, Element,
    ElementRef, KeyValueStore, Navigator, PageServices, Scheduler, TimerHandle,
};
use crate::config::ElementIds;
use crate::error::{UiError, UiResult};

// ============ Events & elements ============

#[derive(Debug, Default)]
pub struct MemoryEvent {
    default_prevented: Cell<bool>,
}

impl MemoryEvent {
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl DomEvent for MemoryEvent {
    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }
}

#[derive(Default)]
pub struct MemoryElement {
    text: RefCell<String>,
    classes: RefCell<BTreeSet<String>>,
    attributes: RefCell<BTreeMap<String, String>>,
    click_handler: RefCell<Option<ClickHandler>>,
    // Bumped whenever the handler is replaced, so a handler that rebinds
    // itself mid-click is not clobbered when the click finishes.
    handler_generation: Cell<u64>,
}

impl MemoryElement {
    pub fn with_classes(classes: &[&str]) -> Self {
        let element = Self::default();
        for class in classes {
            element.add_class(class);
        }
        element
    }

    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().iter().cloned().collect()
    }

    pub fn has_click_handler(&self) -> bool {
        self.click_handler.borrow().is_some()
    }

    /// Simulate a user click. Returns whether the default action was prevented.
    pub fn click(&self) -> bool {
        let event = MemoryEvent::default();
        let generation = self.handler_generation.get();
        let handler = self.click_handler.borrow_mut().take();
        if let Some(mut handler) = handler {
            handler(&event);
            if self.handler_generation.get() == generation {
                *self.click_handler.borrow_mut() = Some(handler);
            }
        }
        event.default_prevented()
    }
}

impl Element for MemoryElement {
    fn text_content(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text_content(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.attributes.borrow_mut().remove(name);
    }

    fn set_click_handler(&self, handler: ClickHandler) {
        self.handler_generation.set(self.handler_generation.get() + 1);
        *self.click_handler.borrow_mut() = Some(handler);
    }

    fn clear_click_handler(&self) {
        self.handler_generation.set(self.handler_generation.get() + 1);
        *self.click_handler.borrow_mut() = None;
    }
}

// ============ Document ============

pub struct MemoryDocument {
    root: Rc<MemoryElement>,
    elements: RefCell<Vec<(Option<String>, Rc<MemoryElement>)>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self {
            root: Rc::new(MemoryElement::default()),
            elements: RefCell::new(Vec::new()),
        }
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document containing every element the behaviours look for, in the
    /// state the server renders them (flash shown, modal and alert hidden).
    pub fn with_page_markup(ids: &ElementIds) -> Self {
        let document = Self::new();
        document.insert(&ids.year);
        document.insert(&ids.theme_toggle);
        document.insert_element(&ids.theme_icon, MemoryElement::with_classes(&["bi"]));
        document.insert_element(&ids.delete_modal, MemoryElement::with_classes(&["modal"]));
        document.insert(&ids.confirm_delete);
        document.insert_element(
            &ids.flash_message,
            MemoryElement::with_classes(&["alert", "show"]),
        );
        document.insert(&ids.alert_message);
        document.insert_element(
            &ids.alert_container,
            MemoryElement::with_classes(&["alert", "d-none"]),
        );
        document
    }

    pub fn root_element(&self) -> Rc<MemoryElement> {
        self.root.clone()
    }

    pub fn insert(&self, id: &str) -> Rc<MemoryElement> {
        self.insert_element(id, MemoryElement::default())
    }

    pub fn insert_element(&self, id: &str, element: MemoryElement) -> Rc<MemoryElement> {
        let element = Rc::new(element);
        self.elements
            .borrow_mut()
            .push((Some(id.to_string()), element.clone()));
        element
    }

    /// Insert an element without an id (e.g. a delete link in a table row).
    pub fn insert_anonymous(&self, attributes: &[(&str, &str)]) -> Rc<MemoryElement> {
        let element = Rc::new(MemoryElement::default());
        for (name, value) in attributes {
            element.set_attribute(name, value);
        }
        self.elements.borrow_mut().push((None, element.clone()));
        element
    }

    pub fn remove(&self, id: &str) {
        self.elements
            .borrow_mut()
            .retain(|(element_id, _)| element_id.as_deref() != Some(id));
    }

    /// Concrete lookup, for assertions in tests.
    pub fn get(&self, id: &str) -> Option<Rc<MemoryElement>> {
        self.elements
            .borrow()
            .iter()
            .find(|(element_id, _)| element_id.as_deref() == Some(id))
            .map(|(_, element)| element.clone())
    }
}

impl Document for MemoryDocument {
    fn element_by_id(&self, id: &str) -> Option<ElementRef> {
        self.get(id).map(|element| element as ElementRef)
    }

    fn root(&self) -> Option<ElementRef> {
        Some(self.root.clone() as ElementRef)
    }

    fn elements_with_attribute(&self, attribute: &str) -> Vec<ElementRef> {
        self.elements
            .borrow()
            .iter()
            .filter(|(_, element)| element.attribute(attribute).is_some())
            .map(|(_, element)| element.clone() as ElementRef)
            .collect()
    }
}

// ============ Persistence ============

#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    unavailable: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Behave like a browser with storage disabled (private mode, sandboxed iframe).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> UiResult<Option<String>> {
        if self.unavailable.get() {
            return Err(UiError::StorageUnavailable);
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> UiResult<()> {
        if self.unavailable.get() {
            return Err(UiError::StorageUnavailable);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCookies {
    values: RefCell<HashMap<String, String>>,
    written: RefCell<Vec<String>>,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `document.cookie` assignment made so far.
    pub fn written(&self) -> Vec<String> {
        self.written.borrow().clone()
    }
}

impl CookieJar for MemoryCookies {
    fn get(&self, name: &str) -> UiResult<Option<String>> {
        Ok(self.values.borrow().get(name).cloned())
    }

    fn set(&self, cookie: &Cookie) -> UiResult<()> {
        self.values
            .borrow_mut()
            .insert(cookie.name.clone(), cookie.value.clone());
        self.written.borrow_mut().push(cookie.to_header_value());
        Ok(())
    }
}

// ============ Time ============

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

struct ScheduledTask {
    id: u64,
    due: Duration,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct SchedulerState {
    now: Duration,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

/// Virtual-time scheduler: tasks run only inside [`ManualScheduler::advance`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since page load.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    /// Move time forward, running every task that falls due in order.
    /// Tasks scheduled by running tasks are honoured if they fall due in range.
    pub fn advance(&self, by: Duration) {
        let target = self.state.borrow().now + by;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let position = state
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                position.map(|i| {
                    let task = state.tasks.remove(i);
                    state.now = task.due;
                    task
                })
            };
            match next {
                Some(scheduled) => (scheduled.task)(),
                None => break,
            }
        }
        self.state.borrow_mut().now = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> UiResult<TimerHandle> {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            let due = state.now + delay;
            state.tasks.push(ScheduledTask { id, due, task });
            id
        };
        let state = Rc::downgrade(&self.state);
        Ok(TimerHandle::new(move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().tasks.retain(|t| t.id != id);
            }
        }))
    }
}

// ============ Navigation & colour scheme ============

#[derive(Default)]
pub struct RecordingNavigator {
    visits: RefCell<Vec<String>>,
    blocked: Cell<bool>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every navigation, like a browser refusing a `location.href` write.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.set(blocked);
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) -> UiResult<()> {
        if self.blocked.get() {
            return Err(UiError::Navigation {
                url: url.to_string(),
                reason: "navigation blocked".to_string(),
            });
        }
        self.visits.borrow_mut().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryColorScheme {
    prefers_dark: Cell<Option<bool>>,
    listeners: RefCell<Vec<Box<dyn FnMut(bool)>>>,
}

impl MemoryColorScheme {
    pub fn new(prefers_dark: Option<bool>) -> Self {
        Self {
            prefers_dark: Cell::new(prefers_dark),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Flip the OS setting and notify listeners, like a `change` event on the media query.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        self.prefers_dark.set(Some(prefers_dark));
        let mut listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        for listener in listeners.iter_mut() {
            listener(prefers_dark);
        }
        let mut slot = self.listeners.borrow_mut();
        listeners.append(&mut slot);
        *slot = listeners;
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl ColorSchemeSource for MemoryColorScheme {
    fn prefers_dark(&self) -> Option<bool> {
        self.prefers_dark.get()
    }

    fn on_change(&self, listener: Box<dyn FnMut(bool)>) {
        self.listeners.borrow_mut().push(listener);
    }
}

// ============ Whole page ============

/// Concrete handles to every in-memory service, plus the erased [`PageServices`].
#[derive(Clone)]
pub struct MemoryPage {
    pub document: Rc<MemoryDocument>,
    pub storage: Rc<MemoryStorage>,
    pub cookies: Rc<MemoryCookies>,
    pub clock: Rc<FixedClock>,
    pub scheduler: ManualScheduler,
    pub navigator: Rc<RecordingNavigator>,
    pub color_scheme: Rc<MemoryColorScheme>,
}

impl MemoryPage {
    pub fn new(document: MemoryDocument, today: NaiveDate, prefers_dark: Option<bool>) -> Self {
        Self {
            document: Rc::new(document),
            storage: Rc::new(MemoryStorage::new()),
            cookies: Rc::new(MemoryCookies::new()),
            clock: Rc::new(FixedClock(today)),
            scheduler: ManualScheduler::new(),
            navigator: Rc::new(RecordingNavigator::new()),
            color_scheme: Rc::new(MemoryColorScheme::new(prefers_dark)),
        }
    }

    /// Simulate a reload: fresh document, timers and history; same browser
    /// storage, cookies and OS settings.
    pub fn reload(&self, document: MemoryDocument) -> Self {
        let color_scheme = MemoryColorScheme::new(self.color_scheme.prefers_dark());
        Self {
            document: Rc::new(document),
            storage: self.storage.clone(),
            cookies: self.cookies.clone(),
            clock: self.clock.clone(),
            scheduler: ManualScheduler::new(),
            navigator: Rc::new(RecordingNavigator::new()),
            color_scheme: Rc::new(color_scheme),
        }
    }

    pub fn services(&self) -> PageServices {
        PageServices {
            document: self.document.clone(),
            storage: self.storage.clone(),
            cookies: self.cookies.clone(),
            clock: self.clock.clone(),
            scheduler: Rc::new(self.scheduler.clone()),
            navigator: self.navigator.clone(),
            color_scheme: self.color_scheme.clone(),
        }
    }
}
