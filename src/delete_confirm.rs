//! Confirmation modal in front of destructive links.
//!
//! Clicking a delete link never navigates directly: the URL is held as the
//! pending target and the modal's confirm button is bound to it. Only one
//! target is pending at a time; a second click rebinds the button.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};

use crate::config::{ElementIds, ModalConfig};
use crate::platform::{DomEvent, PageServices};

/// Value of the dismiss attribute on controls that close the modal.
const DISMISS_MODAL: &str = "modal";

pub struct DeleteConfirmation {
    services: PageServices,
    config: ModalConfig,
    modal_id: String,
    confirm_id: String,
    pending: RefCell<Option<String>>,
}

impl DeleteConfirmation {
    pub fn new(services: PageServices, config: &ModalConfig, ids: &ElementIds) -> Rc<Self> {
        Rc::new(Self {
            services,
            config: config.clone(),
            modal_id: ids.delete_modal.clone(),
            confirm_id: ids.confirm_delete.clone(),
            pending: RefCell::new(None),
        })
    }

    /// Bind every delete trigger and modal dismiss control in the page.
    /// Returns the number of triggers bound.
    pub fn install(self: &Rc<Self>) -> usize {
        let mut bound = 0;

        for trigger in self
            .services
            .document
            .elements_with_attribute(&self.config.trigger_attribute)
        {
            // Explicit target in the trigger attribute wins over href
            let url = trigger
                .attribute(&self.config.trigger_attribute)
                .filter(|value| !value.is_empty())
                .or_else(|| trigger.attribute("href"));
            let Some(url) = url else {
                debug!("Delete trigger without a target URL, skipping");
                continue;
            };

            let weak: Weak<Self> = Rc::downgrade(self);
            trigger.set_click_handler(Box::new(move |event: &dyn DomEvent| {
                if let Some(controller) = weak.upgrade() {
                    controller.confirm_delete(event, &url);
                }
            }));
            bound += 1;
        }

        for control in self
            .services
            .document
            .elements_with_attribute(&self.config.dismiss_attribute)
        {
            if control.attribute(&self.config.dismiss_attribute).as_deref() != Some(DISMISS_MODAL) {
                continue;
            }
            let weak: Weak<Self> = Rc::downgrade(self);
            control.set_click_handler(Box::new(move |_: &dyn DomEvent| {
                if let Some(controller) = weak.upgrade() {
                    controller.cancel();
                }
            }));
        }

        debug!("Bound {} delete trigger(s)", bound);
        bound
    }

    /// Intercept a delete link: suppress navigation, open the modal and bind
    /// its confirm button to `url`.
    pub fn confirm_delete(self: &Rc<Self>, event: &dyn DomEvent, url: &str) {
        event.prevent_default();

        let replaced = self.pending.borrow_mut().replace(url.to_string());
        if let Some(previous) = replaced {
            debug!("Replacing pending delete target {}", previous);
        }

        self.show_modal();

        if let Some(confirm) = self.services.element(&self.confirm_id) {
            let weak: Weak<Self> = Rc::downgrade(self);
            confirm.set_click_handler(Box::new(move |event: &dyn DomEvent| {
                event.prevent_default();
                if let Some(controller) = weak.upgrade() {
                    controller.confirm();
                }
            }));
        }
    }

    pub fn pending_target(&self) -> Option<String> {
        self.pending.borrow().clone()
    }

    /// Navigate to the pending target. The binding is consumed, so repeated
    /// activations navigate at most once. Returns the URL navigated to.
    ///
    /// If navigation fails the modal is closed and the page is left as it was
    /// before the delete link was clicked.
    pub fn confirm(&self) -> Option<String> {
        let url = self.pending.borrow_mut().take()?;

        if let Some(confirm) = self.services.element(&self.confirm_id) {
            confirm.clear_click_handler();
        }

        info!("Delete confirmed, navigating to {}", url);
        if let Err(e) = self.services.navigator.navigate(&url) {
            warn!("Failed to navigate to {}: {}", url, e);
            self.hide_modal();
            return None;
        }
        Some(url)
    }

    /// Close the modal without confirming. The page is left unchanged.
    pub fn cancel(&self) {
        if self.pending.borrow_mut().take().is_some() {
            debug!("Delete cancelled");
        }
        if let Some(confirm) = self.services.element(&self.confirm_id) {
            confirm.clear_click_handler();
        }
        self.hide_modal();
    }

    fn show_modal(&self) {
        let Some(modal) = self.services.element(&self.modal_id) else {
            return;
        };
        modal.add_class(&self.config.shown_class);
        modal.set_attribute("style", "display: block;");
        modal.set_attribute("aria-modal", "true");
        modal.set_attribute("role", "dialog");
        modal.remove_attribute("aria-hidden");
    }

    fn hide_modal(&self) {
        let Some(modal) = self.services.element(&self.modal_id) else {
            return;
        };
        modal.remove_class(&self.config.shown_class);
        modal.set_attribute("style", "display: none;");
        modal.set_attribute("aria-hidden", "true");
        modal.remove_attribute("aria-modal");
    }
}
