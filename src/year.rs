//! Footer year stamp.

use chrono::Datelike;

use crate::platform::PageServices;

/// Write the current calendar year into the element with `id`.
/// Returns the year written, or `None` when the element is absent.
pub fn stamp_year(services: &PageServices, id: &str) -> Option<i32> {
    let element = services.element(id)?;
    let year = services.clock.today().year();
    element.set_text_content(&format!("{:04}", year));
    Some(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::{MemoryDocument, MemoryPage};
    use crate::platform::Element;
    use chrono::NaiveDate;

    fn page_on(date: NaiveDate) -> MemoryPage {
        let document = MemoryDocument::new();
        document.insert("current_year");
        MemoryPage::new(document, date, None)
    }

    #[test]
    fn test_stamps_calendar_year() {
        let page = page_on(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(stamp_year(&page.services(), "current_year"), Some(2026));
        assert_eq!(
            page.document.get("current_year").unwrap().text_content(),
            "2026"
        );
    }

    #[test]
    fn test_new_years_eve_and_day() {
        for (date, expected) in [
            (NaiveDate::from_ymd_opt(1999, 12, 31).unwrap(), "1999"),
            (NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), "2000"),
        ] {
            let page = page_on(date);
            stamp_year(&page.services(), "current_year");
            assert_eq!(
                page.document.get("current_year").unwrap().text_content(),
                expected
            );
        }
    }

    #[test]
    fn test_missing_element_is_noop() {
        let page = MemoryPage::new(
            MemoryDocument::new(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            None,
        );
        assert_eq!(stamp_year(&page.services(), "current_year"), None);
    }
}
