pub mod api;
pub mod app;
pub mod contacts;
pub mod i18n;
pub mod navigation;
pub mod prefs;
pub mod storage;
#[cfg(feature = "gui")]
pub mod ui;
pub mod utils;
