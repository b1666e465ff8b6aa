//! Configuration module for the text processor.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the provider,
//! capability switches and window, `AppPaths` for the platform config
//! directory, and TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, CapabilityConfig, ProviderBackend, ProviderConfig, UiConfig};
