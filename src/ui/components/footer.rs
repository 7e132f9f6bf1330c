//! Page footer with the year stamp and build version.

use chrono::Datelike;
use dioxus::prelude::*;

/// Footer. The year is rendered server-side and re-stamped by the wasm
/// bundle, so cached pages still show the current year.
#[component]
pub fn Footer(year_id: String) -> Element {
    let year = chrono::Local::now().year();
    let version = env!("PAWLOG_VERSION");
    let git_sha = env!("PAWLOG_GIT_SHA");

    rsx! {
        footer { class: "container text-center text-muted py-3",
            small {
                "© "
                span { id: "{year_id}", "{year}" }
                " Pawlog · v{version} ({git_sha})"
            }
        }
    }
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use super::*;

    #[test]
    fn test_footer_shows_short_commit_and_version() {
        let git_sha = env!("PAWLOG_GIT_SHA");
        assert!(!git_sha.is_empty() && git_sha.chars().count() <= 7);
        assert!(!git_sha.contains(char::is_whitespace));

        let html = dioxus::ssr::render_element(rsx! {
            Footer { year_id: "current_year".to_string() }
        });
        assert!(html.contains(&format!("v{} ({})", env!("PAWLOG_VERSION"), git_sha)));
        assert!(html.contains("id=\"current_year\""));
    }
}
