//! Provider stub for hosts that expose no capabilities at all.

use async_trait::async_trait;

use crate::capability::provider::{
    Capability, CapabilityProvider, LanguageDetector, ProviderError, Summarizer,
    SummarizerOptions, Translator, TranslatorOptions,
};

/// Probes every capability as absent; every create call fails with
/// [`ProviderError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableProvider;

#[async_trait]
impl CapabilityProvider for UnavailableProvider {
    fn probe(&self, _capability: Capability) -> bool {
        false
    }

    async fn create_summarizer(
        &self,
        _options: SummarizerOptions,
    ) -> Result<Box<dyn Summarizer>, ProviderError> {
        Err(ProviderError::Unavailable(Capability::Summarizer))
    }

    async fn create_language_detector(&self) -> Result<Box<dyn LanguageDetector>, ProviderError> {
        Err(ProviderError::Unavailable(Capability::LanguageDetector))
    }

    async fn create_translator(
        &self,
        _options: TranslatorOptions,
    ) -> Result<Box<dyn Translator>, ProviderError> {
        Err(ProviderError::Unavailable(Capability::Translator))
    }
}
