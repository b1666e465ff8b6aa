//! Scripted capability provider for tests and offline runs.
//!
//! [`MockProvider`] returns pre-configured replies for each capability and
//! records every create / call it receives, so tests can assert both on the
//! controller's state and on what it asked the provider to do.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::capability::provider::{
    Capability, CapabilityProvider, Detection, LanguageDetector, ProviderError, Summarizer,
    SummarizerOptions, Translator, TranslatorOptions,
};

/// One interaction recorded by [`MockProvider`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    CreateSummarizer(SummarizerOptions),
    Summarize(String),
    CreateLanguageDetector,
    Detect(String),
    CreateTranslator(TranslatorOptions),
    Translate(String),
}

type CallLog = Arc<Mutex<Vec<MockCall>>>;

fn push(log: &CallLog, call: MockCall) {
    log.lock().unwrap_or_else(PoisonError::into_inner).push(call);
}

/// A [`CapabilityProvider`] with fixed replies.
///
/// ```rust
/// use text_processor::capability::{Capability, CapabilityProvider, Detection, MockProvider};
///
/// let provider = MockProvider::new()
///     .with_detections(vec![Detection::new("fr", 0.9)])
///     .without(Capability::Summarizer);
///
/// assert!(!provider.probe(Capability::Summarizer));
/// assert!(provider.probe(Capability::LanguageDetector));
/// ```
#[derive(Clone)]
pub struct MockProvider {
    available: HashSet<Capability>,
    summary: Result<String, ProviderError>,
    detections: Result<Vec<Detection>, ProviderError>,
    translation: Result<String, ProviderError>,
    create_error: Option<(Capability, ProviderError)>,
    calls: CallLog,
}

impl MockProvider {
    /// All capabilities available; replies are placeholder strings and a
    /// single `"en"` detection.
    pub fn new() -> Self {
        Self {
            available: [
                Capability::Summarizer,
                Capability::LanguageDetector,
                Capability::Translator,
            ]
            .into_iter()
            .collect(),
            summary: Ok("summary".into()),
            detections: Ok(vec![Detection::new("en", 1.0)]),
            translation: Ok("translation".into()),
            create_error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Ok(summary.into());
        self
    }

    pub fn with_detections(mut self, detections: Vec<Detection>) -> Self {
        self.detections = Ok(detections);
        self
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Ok(translation.into());
        self
    }

    /// Make the instance call for `capability` fail with `error`.
    pub fn failing(mut self, capability: Capability, error: ProviderError) -> Self {
        match capability {
            Capability::Summarizer => self.summary = Err(error),
            Capability::LanguageDetector => self.detections = Err(error),
            Capability::Translator => self.translation = Err(error),
        }
        self
    }

    /// Make instance creation for `capability` fail with `error` even though
    /// the probe still reports it as present.
    pub fn failing_create(mut self, capability: Capability, error: ProviderError) -> Self {
        self.create_error = Some((capability, error));
        self
    }

    /// Report `capability` as absent.
    pub fn without(mut self, capability: Capability) -> Self {
        self.available.remove(&capability);
        self
    }

    /// Every interaction so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: MockCall) {
        push(&self.calls, call);
    }

    fn check_create(&self, capability: Capability) -> Result<(), ProviderError> {
        if !self.available.contains(&capability) {
            return Err(ProviderError::Unavailable(capability));
        }
        match &self.create_error {
            Some((failing, error)) if *failing == capability => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityProvider for MockProvider {
    fn probe(&self, capability: Capability) -> bool {
        self.available.contains(&capability)
    }

    async fn create_summarizer(
        &self,
        options: SummarizerOptions,
    ) -> Result<Box<dyn Summarizer>, ProviderError> {
        self.record(MockCall::CreateSummarizer(options));
        self.check_create(Capability::Summarizer)?;
        Ok(Box::new(MockSummarizer {
            reply: self.summary.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }

    async fn create_language_detector(&self) -> Result<Box<dyn LanguageDetector>, ProviderError> {
        self.record(MockCall::CreateLanguageDetector);
        self.check_create(Capability::LanguageDetector)?;
        Ok(Box::new(MockLanguageDetector {
            reply: self.detections.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }

    async fn create_translator(
        &self,
        options: TranslatorOptions,
    ) -> Result<Box<dyn Translator>, ProviderError> {
        self.record(MockCall::CreateTranslator(options));
        self.check_create(Capability::Translator)?;
        Ok(Box::new(MockTranslator {
            reply: self.translation.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct MockSummarizer {
    reply: Result<String, ProviderError>,
    calls: CallLog,
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, ProviderError> {
        push(&self.calls, MockCall::Summarize(text.to_string()));
        self.reply.clone()
    }
}

struct MockLanguageDetector {
    reply: Result<Vec<Detection>, ProviderError>,
    calls: CallLog,
}

#[async_trait]
impl LanguageDetector for MockLanguageDetector {
    async fn detect(&self, text: &str) -> Result<Vec<Detection>, ProviderError> {
        push(&self.calls, MockCall::Detect(text.to_string()));
        self.reply.clone()
    }
}

struct MockTranslator {
    reply: Result<String, ProviderError>,
    calls: CallLog,
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        push(&self.calls, MockCall::Translate(text.to_string()));
        self.reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_create_and_call() {
        let provider = MockProvider::new().with_summary("short");
        let summarizer = provider
            .create_summarizer(SummarizerOptions::default())
            .await
            .unwrap();
        assert_eq!(summarizer.summarize("long").await.unwrap(), "short");

        assert_eq!(
            provider.calls(),
            vec![
                MockCall::CreateSummarizer(SummarizerOptions::default()),
                MockCall::Summarize("long".into()),
            ]
        );
    }

    #[tokio::test]
    async fn removed_capability_cannot_be_created() {
        let provider = MockProvider::new().without(Capability::Translator);
        let result = provider
            .create_translator(TranslatorOptions {
                model: "latest".into(),
                source_language: "en".into(),
                target_language: "fr".into(),
            })
            .await;
        assert!(matches!(
            result,
            Err(ProviderError::Unavailable(Capability::Translator))
        ));
    }

    #[tokio::test]
    async fn failing_create_keeps_probe_true() {
        let provider = MockProvider::new()
            .failing_create(Capability::LanguageDetector, ProviderError::Timeout);
        assert!(provider.probe(Capability::LanguageDetector));
        assert!(matches!(
            provider.create_language_detector().await,
            Err(ProviderError::Timeout)
        ));
    }

    #[tokio::test]
    async fn failing_call_returns_error() {
        let provider =
            MockProvider::new().failing(Capability::Translator, ProviderError::EmptyResponse);
        let translator = provider
            .create_translator(TranslatorOptions {
                model: "latest".into(),
                source_language: "en".into(),
                target_language: "es".into(),
            })
            .await
            .unwrap();
        assert_eq!(
            translator.translate("hi").await,
            Err(ProviderError::EmptyResponse)
        );
    }
}
