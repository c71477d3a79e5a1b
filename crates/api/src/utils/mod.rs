//! Shared helpers for the app layer

pub mod format;
pub mod logging;
