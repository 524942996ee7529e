//! Settings and timeout defaults

mod settings;
pub mod timeouts;

pub use settings::{DEFAULT_SYSTEM_PROMPT, LogFormat, SETTINGS_FILE, Settings};
