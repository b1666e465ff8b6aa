//! Capability-provider contract: probe, create, call.
//!
//! A [`CapabilityProvider`] is the only external dependency of the
//! controller.  It answers whether a named capability exists in the current
//! host, and hands out instances ([`Summarizer`], [`LanguageDetector`],
//! [`Translator`]) that perform a single async call each.
//!
//! All traits are object-safe and `Send + Sync` so they can be held behind
//! `Arc<dyn CapabilityProvider>` / `Box<dyn Summarizer>`.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Model name that asks a provider for its most capable / newest model.
pub const LATEST_MODEL: &str = "latest";

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// The three capabilities a provider may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Summarizer,
    LanguageDetector,
    Translator,
}

impl Capability {
    /// The host-facing capability name used when probing.
    pub fn name(&self) -> &'static str {
        match self {
            Capability::Summarizer => "summarizer",
            Capability::LanguageDetector => "languageDetector",
            Capability::Translator => "translator",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Options / results
// ---------------------------------------------------------------------------

/// Options passed to [`CapabilityProvider::create_summarizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizerOptions {
    pub model: String,
}

impl Default for SummarizerOptions {
    fn default() -> Self {
        Self {
            model: LATEST_MODEL.into(),
        }
    }
}

/// Options passed to [`CapabilityProvider::create_translator`].
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatorOptions {
    pub model: String,
    pub source_language: String,
    pub target_language: String,
}

/// One candidate returned by [`LanguageDetector::detect`].
///
/// Detectors return candidates ordered best first; only the first one is
/// consumed by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub language_code: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(language_code: impl Into<String>, confidence: f32) -> Self {
        Self {
            language_code: language_code.into(),
            confidence,
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// Failures raised by a capability provider or one of its instances.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The provider does not offer this capability.
    #[error("{0} capability is not available")]
    Unavailable(Capability),

    /// HTTP transport or connection error.
    #[error("request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("provider request timed out")]
    Timeout,

    /// The response could not be parsed as expected.
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// The provider returned no usable text.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// The provider refused the request (bad options, HTTP error status, ...).
    #[error("provider rejected the request: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, ProviderError>;
}

#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Candidate languages for `text`, best first.  May be empty.
    async fn detect(&self, text: &str) -> Result<Vec<Detection>, ProviderError>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, ProviderError>;
}

/// Host surface that exposes the three capabilities.
///
/// Callers must [`probe`](Self::probe) a capability before creating an
/// instance of it.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Whether `capability` is present in this host.
    fn probe(&self, capability: Capability) -> bool;

    async fn create_summarizer(
        &self,
        options: SummarizerOptions,
    ) -> Result<Box<dyn Summarizer>, ProviderError>;

    async fn create_language_detector(&self) -> Result<Box<dyn LanguageDetector>, ProviderError>;

    async fn create_translator(
        &self,
        options: TranslatorOptions,
    ) -> Result<Box<dyn Translator>, ProviderError>;
}

// Compile-time assertion: Box<dyn CapabilityProvider> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn CapabilityProvider>) {}
};
