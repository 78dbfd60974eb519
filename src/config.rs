use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Aether";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the Gemini API key (live analysis only).
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_BASE_URL: &str = "AETHER_GEMINI_BASE_URL";
pub const ENV_TEXT_MODEL: &str = "AETHER_TEXT_MODEL";
pub const ENV_VISION_MODEL: &str = "AETHER_VISION_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "AETHER_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_VISION_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Recent analyses shown by `aether history` when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 3;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "aether=info,aether_lib=info"
}

/// Get the application data directory
/// Platform data dir + `Aether/`, or `./Aether` when the platform has none.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Directory used by the CLI to persist analyses.
pub fn store_dir() -> PathBuf {
    app_data_dir().join("store")
}
