//! Page components.

pub mod diary;

pub use diary::DiaryPage;
