//! Configuration management
//!
//! `PageConfig` is shared between the preview server (which embeds it in the
//! page as JSON) and the browser bootstrap (which reads it back). Every field
//! has a default so an empty or missing config block still yields a working page.

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Id of the `<script type="application/json">` element carrying the page config.
pub const PAGE_CONFIG_ELEMENT_ID: &str = "pawlog-config";

/// One year, in seconds. Lifetime of the theme cookie.
pub const ONE_YEAR_SECS: u64 = 31_536_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub ids: ElementIds,
    pub theme: ThemeConfig,
    pub alerts: AlertConfig,
    pub modal: ModalConfig,
}

impl PageConfig {
    /// Parse the JSON block embedded by the server.
    pub fn from_json(raw: &str) -> crate::error::UiResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> String {
        // Plain structs of strings and integers always serialize
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Element identifiers the behaviours look up in the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub year: String,
    pub theme_toggle: String,
    pub theme_icon: String,
    pub delete_modal: String,
    pub confirm_delete: String,
    pub flash_message: String,
    pub alert_message: String,
    pub alert_container: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            year: "current_year".to_string(),
            theme_toggle: "theme-toggle".to_string(),
            theme_icon: "theme-icon".to_string(),
            delete_modal: "deleteModal".to_string(),
            confirm_delete: "confirmDeleteBtn".to_string(),
            flash_message: "flash-message".to_string(),
            alert_message: "alert-message".to_string(),
            alert_container: "alert-container".to_string(),
        }
    }
}

/// Where an explicit theme choice is written and read back from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePersistence {
    LocalStorage,
    Cookie,
    /// Write both; read local storage first, then the cookie.
    #[default]
    Both,
}

impl ThemePersistence {
    pub fn uses_storage(self) -> bool {
        matches!(self, ThemePersistence::LocalStorage | ThemePersistence::Both)
    }

    pub fn uses_cookie(self) -> bool {
        matches!(self, ThemePersistence::Cookie | ThemePersistence::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Key used for both the local storage entry and the cookie name
    pub storage_key: String,
    pub persistence: ThemePersistence,
    pub cookie_path: String,
    pub cookie_max_age_secs: u64,
    /// Attribute set on the document root (Bootstrap 5.3 colour modes)
    pub root_attribute: String,
    /// Icon class shown while the light theme is active
    pub light_icon_class: String,
    /// Icon class shown while the dark theme is active
    pub dark_icon_class: String,
    /// Used when neither a stored preference nor an OS signal is available
    pub fallback: Theme,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
            persistence: ThemePersistence::default(),
            cookie_path: "/".to_string(),
            cookie_max_age_secs: ONE_YEAR_SECS,
            root_attribute: "data-bs-theme".to_string(),
            light_icon_class: "bi-sun-fill".to_string(),
            dark_icon_class: "bi-moon-stars-fill".to_string(),
            fallback: Theme::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub flash_delay_ms: u64,
    pub alert_delay_ms: u64,
    pub shown_class: String,
    pub faded_class: String,
    pub hidden_class: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            flash_delay_ms: 5_000,
            alert_delay_ms: 5_000,
            shown_class: "show".to_string(),
            faded_class: "fade".to_string(),
            hidden_class: "d-none".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    pub shown_class: String,
    /// Elements carrying this attribute close the modal without confirming
    pub dismiss_attribute: String,
    /// Anchors carrying this attribute open the modal for their `href`
    pub trigger_attribute: String,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            shown_class: "show".to_string(),
            dismiss_attribute: "data-bs-dismiss".to_string(),
            trigger_attribute: "data-confirm-delete".to_string(),
        }
    }
}

// ============ Server-only config loading ============

#[cfg(feature = "server")]
pub use server::{get_config_dir, load_config, ServerConfig};

#[cfg(feature = "server")]
mod server {
    use anyhow::Result;
    use serde::Deserialize;

    use super::PageConfig;

    #[derive(Debug, Deserialize)]
    pub struct ServerConfig {
        #[serde(default = "default_port")]
        pub port: u16,

        /// Directory holding the wasm-bindgen output served under /pkg
        #[serde(default = "default_pkg_dir")]
        pub pkg_dir: std::path::PathBuf,

        #[serde(default)]
        pub page: PageConfig,
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_pkg_dir() -> std::path::PathBuf {
        std::path::PathBuf::from("pkg")
    }

    /// Get config directory (PAWLOG_CONFIG_DIR or the working directory)
    pub fn get_config_dir() -> std::path::PathBuf {
        if let Ok(dir) = std::env::var("PAWLOG_CONFIG_DIR") {
            return std::path::PathBuf::from(dir);
        }
        std::path::PathBuf::from(".")
    }

    pub fn load_config() -> Result<ServerConfig> {
        let config_dir = get_config_dir();

        let mut builder = ::config::Config::builder()
            .set_default("port", 5000)?
            // Load from pawlog.toml (or .json/.yaml) if it exists
            .add_source(
                ::config::File::with_name(&config_dir.join("pawlog").to_string_lossy())
                    .required(false),
            )
            // Override with environment variables (PAWLOG_PORT, PAWLOG_PAGE__IDS__YEAR, etc.)
            .add_source(
                ::config::Environment::with_prefix("PAWLOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        // Precedence: PAWLOG_PORT > PORT > config file > default
        let port = std::env::var("PAWLOG_PORT").or_else(|_| std::env::var("PORT"));
        if let Ok(port) = port {
            if let Ok(port_num) = port.parse::<u16>() {
                builder = builder.set_override("port", port_num as i64)?;
            }
        }

        let config = builder.build()?;

        Ok(config.try_deserialize()?)
    }
}
