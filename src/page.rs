//! Page bootstrap: installs every behaviour against one set of services.

use std::rc::Rc;

use tracing::info;

use crate::alerts::Alerts;
use crate::config::PageConfig;
use crate::delete_confirm::DeleteConfirmation;
use crate::platform::{DomEvent, PageServices, TimerHandle};
use crate::theme::{Theme, ThemeController};
use crate::year::stamp_year;

/// Installed behaviours for one page load.
pub struct PageBehaviours {
    pub theme: Rc<ThemeController>,
    pub delete: Rc<DeleteConfirmation>,
    pub alerts: Rc<Alerts>,
    /// Pending flash dismissal, cancellable until it fires
    pub flash_dismiss: Option<TimerHandle>,
}

impl PageBehaviours {
    /// Run everything the page does on load: stamp the year, resolve the
    /// theme, bind delete triggers, schedule the flash fade.
    pub fn install(services: PageServices, config: &PageConfig) -> Self {
        let year = stamp_year(&services, &config.ids.year);

        let theme = ThemeController::new(services.clone(), &config.theme, &config.ids);
        let initial = theme.install();

        let delete = DeleteConfirmation::new(services.clone(), &config.modal, &config.ids);
        let triggers = delete.install();

        let alerts = Alerts::new(services, &config.alerts, &config.ids);
        let flash_dismiss = Some(alerts.schedule_flash_dismiss());

        info!(
            "Page behaviours installed (year: {:?}, theme: {}, delete triggers: {})",
            year,
            initial.as_str(),
            triggers
        );

        Self {
            theme,
            delete,
            alerts,
            flash_dismiss,
        }
    }

    pub fn toggle_theme(&self) -> Theme {
        self.theme.toggle()
    }

    pub fn confirm_delete(&self, event: &dyn DomEvent, url: &str) {
        self.delete.confirm_delete(event, url);
    }

    pub fn show_alert(&self, message: &str) -> TimerHandle {
        self.alerts.show_alert(message)
    }

    /// Stop the pending flash fade, if it has not fired yet.
    pub fn cancel_flash_dismiss(&mut self) {
        if let Some(handle) = self.flash_dismiss.take() {
            handle.cancel();
        }
    }
}
