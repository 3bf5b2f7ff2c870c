//! # panelhub-adapter-settings-json
//!
//! Persists the user settings document as a pretty-printed JSON file.
//!
//! ## Responsibilities
//! - Implement the `SettingsStore` port defined in `panelhub-app::ports`
//! - Treat a missing file as empty settings
//! - Replace the file atomically (write a sibling temp file, then rename)
//!
//! ## Dependency rule
//! Depends on `panelhub-app` (for port traits) and `panelhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod store;

pub use error::SettingsFileError;
pub use store::JsonSettingsStore;
