//! Pawlog UI - client-side page behaviours for the Pawlog pet diary
//!
//! This library provides:
//! - Footer year stamp
//! - Light/dark theme toggle persisted in local storage and a cookie
//! - Confirmation modal in front of delete links
//! - Flash message auto-dismiss and transient alerts
//! - Dioxus components for the markup, and a preview server (`server` feature)
//!
//! Behaviours talk to the page only through the traits in [`platform`], so the
//! same code runs in the browser (`web-sys`) and headless in tests.

pub mod alerts;
pub mod config;
pub mod delete_confirm;
pub mod error;
pub mod page;
pub mod platform;
pub mod theme;
pub mod ui;
pub mod year;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod browser;
