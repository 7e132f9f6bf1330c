//! Light/dark theme management with persisted preference.
//!
//! Initial theme resolution: explicit stored preference, then the OS
//! `prefers-color-scheme` signal, then the configured fallback (light).
//! Once the user toggles, the choice is stored and OS changes are ignored.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{ElementIds, ThemeConfig};
use crate::platform::{Cookie, DomEvent, PageServices};

/// Theme options
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a stored value. Anything but `light`/`dark` counts as no preference.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Accessible label for the toggle control while this theme is active
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Light => "Switch to dark theme",
            Theme::Dark => "Switch to light theme",
        }
    }
}

pub struct ThemeController {
    services: PageServices,
    config: ThemeConfig,
    toggle_id: String,
    icon_id: String,
    current: Cell<Theme>,
    explicit: Cell<bool>,
}

impl ThemeController {
    pub fn new(services: PageServices, config: &ThemeConfig, ids: &ElementIds) -> Rc<Self> {
        Rc::new(Self {
            services,
            config: config.clone(),
            toggle_id: ids.theme_toggle.clone(),
            icon_id: ids.theme_icon.clone(),
            current: Cell::new(config.fallback),
            explicit: Cell::new(false),
        })
    }

    /// Resolve and apply the initial theme, bind the toggle control and
    /// subscribe to OS preference changes.
    pub fn install(self: &Rc<Self>) -> Theme {
        let theme = self.init();

        if let Some(toggle) = self.services.element(&self.toggle_id) {
            let weak: Weak<Self> = Rc::downgrade(self);
            toggle.set_click_handler(Box::new(move |event: &dyn DomEvent| {
                event.prevent_default();
                if let Some(controller) = weak.upgrade() {
                    controller.toggle();
                }
            }));
        }

        let weak: Weak<Self> = Rc::downgrade(self);
        self.services
            .color_scheme
            .on_change(Box::new(move |prefers_dark: bool| {
                if let Some(controller) = weak.upgrade() {
                    controller.on_system_change(prefers_dark);
                }
            }));

        theme
    }

    /// Resolve the initial theme and apply it to the page.
    pub fn init(&self) -> Theme {
        let stored = self.stored_preference();
        self.explicit.set(stored.is_some());

        let theme = stored
            .or_else(|| {
                self.services
                    .color_scheme
                    .prefers_dark()
                    .map(Theme::from_prefers_dark)
            })
            .unwrap_or(self.config.fallback);

        debug!(
            "Initial theme {} ({})",
            theme.as_str(),
            if stored.is_some() { "stored" } else { "system" }
        );
        self.apply(theme);
        theme
    }

    pub fn current(&self) -> Theme {
        self.current.get()
    }

    pub fn has_explicit_preference(&self) -> bool {
        self.explicit.get()
    }

    /// Flip the theme and remember the choice.
    pub fn toggle(&self) -> Theme {
        let next = self.current.get().toggled();
        self.set(next);
        next
    }

    /// Apply and persist an explicit choice.
    pub fn set(&self, theme: Theme) {
        info!("Theme set to {}", theme.as_str());
        self.explicit.set(true);
        self.apply(theme);
        self.persist(theme);
    }

    /// OS preference changed. Ignored once the user has chosen explicitly.
    pub fn on_system_change(&self, prefers_dark: bool) {
        if self.explicit.get() || self.stored_preference().is_some() {
            debug!("Ignoring OS colour scheme change, explicit preference set");
            return;
        }
        self.apply(Theme::from_prefers_dark(prefers_dark));
    }

    /// Stored explicit preference: local storage first, then the cookie.
    pub fn stored_preference(&self) -> Option<Theme> {
        let key = &self.config.storage_key;

        if self.config.persistence.uses_storage() {
            match self.services.storage.get(key) {
                Ok(Some(value)) => {
                    if let Some(theme) = Theme::parse(&value) {
                        return Some(theme);
                    }
                    debug!("Ignoring unrecognised stored theme {:?}", value);
                }
                Ok(None) => {}
                Err(e) => warn!("Failed to read theme from storage: {}", e),
            }
        }

        if self.config.persistence.uses_cookie() {
            match self.services.cookies.get(key) {
                Ok(Some(value)) => return Theme::parse(&value),
                Ok(None) => {}
                Err(e) => warn!("Failed to read theme cookie: {}", e),
            }
        }

        None
    }

    fn persist(&self, theme: Theme) {
        let key = &self.config.storage_key;

        if self.config.persistence.uses_storage() {
            if let Err(e) = self.services.storage.set(key, theme.as_str()) {
                warn!("Failed to save theme to storage: {}", e);
            }
        }

        if self.config.persistence.uses_cookie() {
            let cookie = Cookie {
                name: key.clone(),
                value: theme.as_str().to_string(),
                path: self.config.cookie_path.clone(),
                max_age_secs: self.config.cookie_max_age_secs,
            };
            if let Err(e) = self.services.cookies.set(&cookie) {
                warn!("Failed to write theme cookie: {}", e);
            }
        }
    }

    fn apply(&self, theme: Theme) {
        self.current.set(theme);

        if let Some(root) = self.services.document.root() {
            root.set_attribute(&self.config.root_attribute, theme.as_str());
        }

        if let Some(icon) = self.services.element(&self.icon_id) {
            let (show, hide) = match theme {
                Theme::Light => (&self.config.light_icon_class, &self.config.dark_icon_class),
                Theme::Dark => (&self.config.dark_icon_class, &self.config.light_icon_class),
            };
            icon.remove_class(hide);
            icon.add_class(show);
        }

        if let Some(toggle) = self.services.element(&self.toggle_id) {
            toggle.set_attribute("aria-label", theme.toggle_label());
            toggle.set_attribute("title", theme.toggle_label());
        }
    }
}
