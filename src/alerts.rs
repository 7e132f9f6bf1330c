//! Flash message auto-dismiss and transient alerts.

use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{AlertConfig, ElementIds};
use crate::platform::{PageServices, TimerHandle};

pub struct Alerts {
    services: PageServices,
    config: AlertConfig,
    flash_id: String,
    message_id: String,
    container_id: String,
}

impl Alerts {
    pub fn new(services: PageServices, config: &AlertConfig, ids: &ElementIds) -> Rc<Self> {
        Rc::new(Self {
            services,
            config: config.clone(),
            flash_id: ids.flash_message.clone(),
            message_id: ids.alert_message.clone(),
            container_id: ids.alert_container.clone(),
        })
    }

    /// Fade the flashed message after the flash delay. The element is looked
    /// up when the timer fires, so markup added after load is still covered.
    pub fn schedule_flash_dismiss(self: &Rc<Self>) -> TimerHandle {
        let delay = Duration::from_millis(self.config.flash_delay_ms);
        let this = self.clone();
        self.schedule(delay, move || {
            this.fade_flash();
        })
    }

    /// Swap the flashed message from shown to faded. Returns whether an element was found.
    pub fn fade_flash(&self) -> bool {
        let Some(flash) = self.services.element(&self.flash_id) else {
            return false;
        };
        flash.remove_class(&self.config.shown_class);
        flash.add_class(&self.config.faded_class);
        debug!("Flash message faded");
        true
    }

    /// Show `message` in the alert box and hide the box after the alert delay.
    ///
    /// Calls are not coordinated: each one schedules its own hide, so an
    /// earlier call's timer can hide text written by a later call.
    pub fn show_alert(self: &Rc<Self>, message: &str) -> TimerHandle {
        let Some(target) = self.services.element(&self.message_id) else {
            return TimerHandle::inert();
        };
        target.set_text_content(message);

        let Some(container) = self.services.element(&self.container_id) else {
            return TimerHandle::inert();
        };
        container.remove_class(&self.config.hidden_class);
        container.add_class(&self.config.shown_class);

        let delay = Duration::from_millis(self.config.alert_delay_ms);
        let this = self.clone();
        self.schedule(delay, move || this.hide_alert())
    }

    pub fn hide_alert(&self) {
        if let Some(container) = self.services.element(&self.container_id) {
            container.remove_class(&self.config.shown_class);
            container.add_class(&self.config.hidden_class);
        }
    }

    fn schedule(&self, delay: Duration, task: impl FnOnce() + 'static) -> TimerHandle {
        match self.services.scheduler.schedule(delay, Box::new(task)) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Failed to schedule alert timer: {}", e);
                TimerHandle::inert()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageConfig;
    use crate::platform::memory::{MemoryDocument, MemoryPage};
    use crate::platform::Element;
    use chrono::NaiveDate;

    fn setup(document: MemoryDocument) -> (MemoryPage, Rc<Alerts>) {
        let config = PageConfig::default();
        let page = MemoryPage::new(
            document,
            NaiveDate::from_ymd_opt(2026, 7, 4).unwrap(),
            None,
        );
        let alerts = Alerts::new(page.services(), &config.alerts, &config.ids);
        (page, alerts)
    }

    fn standard() -> (MemoryPage, Rc<Alerts>) {
        setup(MemoryDocument::with_page_markup(&PageConfig::default().ids))
    }

    #[test]
    fn test_flash_fades_at_five_seconds_not_before() {
        let (page, alerts) = standard();
        let _handle = alerts.schedule_flash_dismiss();
        let flash = page.document.get("flash-message").unwrap();

        page.scheduler.advance(Duration::from_millis(4_999));
        assert!(flash.has_class("show"));
        assert!(!flash.has_class("fade"));

        page.scheduler.advance(Duration::from_millis(1));
        assert!(!flash.has_class("show"));
        assert!(flash.has_class("fade"));
    }

    #[test]
    fn test_flash_is_faded_not_removed() {
        let (page, alerts) = standard();
        alerts.schedule_flash_dismiss();
        page.scheduler.advance(Duration::from_secs(5));
        assert!(page.document.get("flash-message").is_some());
    }

    #[test]
    fn test_flash_dismiss_without_flash_is_noop() {
        let (page, alerts) = setup(MemoryDocument::new());
        alerts.schedule_flash_dismiss();
        page.scheduler.advance(Duration::from_secs(5));
        assert!(!alerts.fade_flash());
    }

    #[test]
    fn test_cancelled_flash_dismiss() {
        let (page, alerts) = standard();
        alerts.schedule_flash_dismiss().cancel();
        page.scheduler.advance(Duration::from_secs(10));
        assert!(page.document.get("flash-message").unwrap().has_class("show"));
    }

    #[test]
    fn test_show_alert_sets_text_and_hides_after_delay() {
        let (page, alerts) = standard();
        alerts.show_alert("Saved.");

        let message = page.document.get("alert-message").unwrap();
        let container = page.document.get("alert-container").unwrap();
        assert_eq!(message.text_content(), "Saved.");
        assert!(!container.has_class("d-none"));

        page.scheduler.advance(Duration::from_millis(4_999));
        assert!(!container.has_class("d-none"));

        page.scheduler.advance(Duration::from_millis(1));
        assert!(container.has_class("d-none"));
        assert_eq!(message.text_content(), "Saved.");
    }

    #[test]
    fn test_overlapping_alerts_are_not_coordinated() {
        let (page, alerts) = standard();
        alerts.show_alert("First");
        page.scheduler.advance(Duration::from_secs(3));
        alerts.show_alert("Second");

        // First call's timer fires at 5s and hides the second message early
        page.scheduler.advance(Duration::from_secs(2));
        let container = page.document.get("alert-container").unwrap();
        assert!(container.has_class("d-none"));
        assert_eq!(
            page.document.get("alert-message").unwrap().text_content(),
            "Second"
        );
        assert_eq!(page.scheduler.pending(), 1);
    }

    #[test]
    fn test_show_alert_without_elements_schedules_nothing() {
        let (page, alerts) = setup(MemoryDocument::new());
        alerts.show_alert("Saved.");
        assert_eq!(page.scheduler.pending(), 0);
    }

    #[test]
    fn test_show_alert_without_container_still_sets_text() {
        let document = MemoryDocument::new();
        document.insert("alert-message");
        let (page, alerts) = setup(document);

        alerts.show_alert("Saved.");
        assert_eq!(
            page.document.get("alert-message").unwrap().text_content(),
            "Saved."
        );
        assert_eq!(page.scheduler.pending(), 0);
    }
}
