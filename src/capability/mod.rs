//! Capability providers: the external surface that actually summarizes,
//! detects languages and translates.
//!
//! This module provides:
//! * [`CapabilityProvider`] — probe + create contract consumed by the controller.
//! * [`Summarizer`] / [`LanguageDetector`] / [`Translator`] — instance handles.
//! * [`ApiProvider`] — OpenAI-compatible REST backend (Ollama, OpenAI, …).
//! * [`MockProvider`] — scripted replies with call recording.
//! * [`UnavailableProvider`] — host with no capabilities.
//! * [`ProviderError`] — error variants for provider operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use text_processor::capability::{self, Capability, SummarizerOptions};
//! use text_processor::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let provider = capability::from_config(&config);
//!
//!     if provider.probe(Capability::Summarizer) {
//!         let summarizer = provider
//!             .create_summarizer(SummarizerOptions::default())
//!             .await
//!             .unwrap();
//!         println!("{}", summarizer.summarize("A long article …").await.unwrap());
//!     }
//! }
//! ```

pub mod api;
pub mod mock;
pub mod prompt;
pub mod provider;
pub mod unavailable;

use std::sync::Arc;

use crate::config::{AppConfig, ProviderBackend};

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use api::ApiProvider;
pub use mock::{MockCall, MockProvider};
pub use provider::{
    Capability, CapabilityProvider, Detection, LanguageDetector, ProviderError, Summarizer,
    SummarizerOptions, Translator, TranslatorOptions, LATEST_MODEL,
};
pub use unavailable::UnavailableProvider;

/// Select the provider implementation described by `config`.
///
/// A `Disabled` backend yields an [`UnavailableProvider`]; every other
/// backend talks to the configured OpenAI-compatible endpoint.
pub fn from_config(config: &AppConfig) -> Arc<dyn CapabilityProvider> {
    match config.provider.backend {
        ProviderBackend::Disabled => {
            log::info!("capability provider disabled in settings");
            Arc::new(UnavailableProvider)
        }
        backend => {
            log::info!(
                "capability provider: {:?} at {} (model {})",
                backend,
                config.provider.base_url,
                config.provider.model
            );
            Arc::new(ApiProvider::from_config(
                &config.provider,
                &config.capabilities,
            ))
        }
    }
}
