//! Text operation controller: validates, calls the provider, updates state.
//!
//! [`TextOperationController`] owns the [`SharedSession`] and a
//! [`CapabilityProvider`].  Each of its three operations follows the same
//! shape:
//!
//! ```text
//! lock session ── busy? ──▶ Err(OperationInProgress)
//!      │
//!      ├─ validate preconditions ──▶ Err(..)      (no provider call)
//!      │
//!      └─ is_busy = true, active_operation = op, copy input
//! unlock
//!      │
//!      ├─ create instance + single call (await)
//!      │
//! lock session ── write result ── is_busy = false
//! ```
//!
//! The busy flag is reset by a drop guard, so it is cleared on success, on
//! error, and when the operation's future is dropped mid-flight.

use std::sync::{Arc, MutexGuard, PoisonError};

use thiserror::Error;

use crate::capability::{
    Capability, CapabilityProvider, Detection, ProviderError, SummarizerOptions,
    TranslatorOptions, LATEST_MODEL,
};
use crate::language;

use super::state::{new_shared_session, DetectedLanguage, Operation, SessionRecord, SharedSession};

/// Minimum whitespace-separated words required before summarizing.
pub const MIN_SUMMARY_WORDS: usize = 150;

// ---------------------------------------------------------------------------
// ControllerError
// ---------------------------------------------------------------------------

/// Why an operation did not produce a result.
///
/// Every variant is meant for immediate display to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    #[error("{0} capability is not available")]
    CapabilityUnavailable(Capability),

    #[error("text must be at least {required} words for summarization (got {words})")]
    InputTooShort { words: usize, required: usize },

    #[error("no language detected")]
    NoLanguageDetected,

    #[error("detect the language first before translating")]
    SourceLanguageUnknown,

    #[error("detected language ({0}) is not supported for translation")]
    UnsupportedSourceLanguage(String),

    #[error("target language ({0}) is not supported")]
    UnsupportedTargetLanguage(String),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("{} is already in progress", .0.label())]
    OperationInProgress(Operation),
}

// ---------------------------------------------------------------------------
// OperationCommand
// ---------------------------------------------------------------------------

/// A request to run one controller operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationCommand {
    Summarize,
    DetectLanguage,
    /// Translate the input into the given language code.
    Translate(String),
}

impl OperationCommand {
    pub fn operation(&self) -> Operation {
        match self {
            OperationCommand::Summarize => Operation::Summary,
            OperationCommand::DetectLanguage => Operation::Detection,
            OperationCommand::Translate(_) => Operation::Translation,
        }
    }
}

// ---------------------------------------------------------------------------
// BusyGuard
// ---------------------------------------------------------------------------

/// Clears `is_busy` (and optionally the language picker) when dropped.
struct BusyGuard<'a> {
    session: &'a SharedSession,
    close_menu: bool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut record = lock(self.session);
        record.is_busy = false;
        if self.close_menu {
            record.is_menu_open = false;
        }
    }
}

fn lock(session: &SharedSession) -> MutexGuard<'_, SessionRecord> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// TextOperationController
// ---------------------------------------------------------------------------

/// Owns the session record and runs summarize / detect / translate against a
/// capability provider.
///
/// Only one operation may be in flight; a second invocation while busy is
/// rejected with [`ControllerError::OperationInProgress`].
///
/// ```rust
/// use std::sync::Arc;
/// use text_processor::capability::MockProvider;
/// use text_processor::session::TextOperationController;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let provider = MockProvider::new().with_translation("Bonjour");
/// let controller = TextOperationController::new(Arc::new(provider));
///
/// controller.set_input_text("Hello");
/// controller.detect_language().await.unwrap(); // mock detects "en"
/// controller.translate("fr").await.unwrap();
///
/// assert_eq!(controller.snapshot().output_text, "Bonjour");
/// # }
/// ```
pub struct TextOperationController {
    session: SharedSession,
    provider: Arc<dyn CapabilityProvider>,
}

impl TextOperationController {
    /// Create a controller with a fresh, empty session.
    pub fn new(provider: Arc<dyn CapabilityProvider>) -> Self {
        Self::with_session(new_shared_session(), provider)
    }

    /// Create a controller over an existing session handle.
    pub fn with_session(session: SharedSession, provider: Arc<dyn CapabilityProvider>) -> Self {
        Self { session, provider }
    }

    /// A copy of the current session record.
    pub fn snapshot(&self) -> SessionRecord {
        lock(&self.session).clone()
    }

    pub fn set_input_text(&self, text: impl Into<String>) {
        lock(&self.session).input_text = text.into();
    }

    /// Flip the target-language picker; returns the new state.
    pub fn toggle_menu(&self) -> bool {
        let mut record = lock(&self.session);
        record.is_menu_open = !record.is_menu_open;
        record.is_menu_open
    }

    /// Run the operation named by `command`.
    pub async fn execute(&self, command: OperationCommand) -> Result<(), ControllerError> {
        match command {
            OperationCommand::Summarize => self.summarize().await,
            OperationCommand::DetectLanguage => self.detect_language().await,
            OperationCommand::Translate(target) => self.translate(&target).await,
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Summarize the input text and store the summary as output.
    ///
    /// Requires the `summarizer` capability and at least
    /// [`MIN_SUMMARY_WORDS`] words of input.
    pub async fn summarize(&self) -> Result<(), ControllerError> {
        let (_busy, text, ()) = self.begin(Operation::Summary, false, |record| {
            self.require(Capability::Summarizer)?;
            let words = record.input_text.split_whitespace().count();
            if words < MIN_SUMMARY_WORDS {
                return Err(ControllerError::InputTooShort {
                    words,
                    required: MIN_SUMMARY_WORDS,
                });
            }
            Ok(())
        })?;

        log::debug!("summarizing {} chars", text.len());

        let summary = self.request_summary(&text).await.map_err(|e| {
            log::warn!("summarization failed: {e}");
            ControllerError::from(e)
        })?;

        lock(&self.session).output_text = summary;
        log::info!("summary ready");
        Ok(())
    }

    /// Detect the input's language and remember the top candidate.
    ///
    /// An empty candidate list records [`DetectedLanguage::NoneDetected`] and
    /// fails with [`ControllerError::NoLanguageDetected`].
    pub async fn detect_language(&self) -> Result<(), ControllerError> {
        let (_busy, text, ()) = self.begin(Operation::Detection, false, |_| {
            self.require(Capability::LanguageDetector)
        })?;

        log::debug!("detecting language of {} chars", text.len());

        let detections = self.request_detection(&text).await.map_err(|e| {
            log::warn!("language detection failed: {e}");
            ControllerError::from(e)
        })?;

        let mut record = lock(&self.session);
        match detections.into_iter().next() {
            Some(top) => {
                log::info!(
                    "detected language {} (confidence {:.2})",
                    top.language_code,
                    top.confidence
                );
                record.output_text = format!("Detected Language: {}", top.language_code);
                record.detected_language = DetectedLanguage::Detected(top.language_code);
                Ok(())
            }
            None => {
                log::warn!("language detection returned no candidates");
                record.detected_language = DetectedLanguage::NoneDetected;
                Err(ControllerError::NoLanguageDetected)
            }
        }
    }

    /// Translate the input from the detected language into `target`.
    ///
    /// The picker is closed on every exit except an `OperationInProgress`
    /// rejection.
    pub async fn translate(&self, target: &str) -> Result<(), ControllerError> {
        let (_busy, text, source) = self.begin(Operation::Translation, true, |record| {
            let checked = self.validate_translation(record, target);
            if checked.is_err() {
                record.is_menu_open = false;
            }
            checked
        })?;

        log::debug!("translating from {source} to {target}");

        let translation = self
            .request_translation(&text, &source, target)
            .await
            .map_err(|e| {
                log::warn!("translation failed: {e}");
                ControllerError::from(e)
            })?;

        {
            let mut record = lock(&self.session);
            record.output_text = translation;
            record.is_menu_open = false;
        }
        log::info!("translation {source} -> {target} ready");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Atomically reject-if-busy, validate, and mark the session busy.
    ///
    /// Returns the guard that clears the busy flag, a copy of the input text,
    /// and whatever `validate` produced.
    fn begin<T>(
        &self,
        operation: Operation,
        close_menu: bool,
        validate: impl FnOnce(&mut SessionRecord) -> Result<T, ControllerError>,
    ) -> Result<(BusyGuard<'_>, String, T), ControllerError> {
        let mut record = lock(&self.session);

        if record.is_busy {
            log::debug!(
                "{} rejected: {} in progress",
                operation.label(),
                record.active_operation.label()
            );
            return Err(ControllerError::OperationInProgress(record.active_operation));
        }

        let validated = validate(&mut *record).map_err(|e| {
            log::debug!("{} rejected: {e}", operation.label());
            e
        })?;

        record.is_busy = true;
        record.active_operation = operation;
        let text = record.input_text.clone();
        drop(record);

        let guard = BusyGuard {
            session: &self.session,
            close_menu,
        };
        Ok((guard, text, validated))
    }

    fn require(&self, capability: Capability) -> Result<(), ControllerError> {
        if self.provider.probe(capability) {
            Ok(())
        } else {
            Err(ControllerError::CapabilityUnavailable(capability))
        }
    }

    /// Translation preconditions, in order: capability, known source,
    /// supported source, supported target.  Returns the source code.
    fn validate_translation(
        &self,
        record: &mut SessionRecord,
        target: &str,
    ) -> Result<String, ControllerError> {
        self.require(Capability::Translator)?;

        let source = record
            .detected_language
            .code()
            .ok_or(ControllerError::SourceLanguageUnknown)?
            .to_string();

        if !language::is_supported(&source) {
            record.output_text = format!("Detected language ({source}) is not supported.");
            return Err(ControllerError::UnsupportedSourceLanguage(source));
        }

        if !language::is_supported(target) {
            return Err(ControllerError::UnsupportedTargetLanguage(target.to_string()));
        }

        Ok(source)
    }

    async fn request_summary(&self, text: &str) -> Result<String, ProviderError> {
        let summarizer = self
            .provider
            .create_summarizer(SummarizerOptions {
                model: LATEST_MODEL.into(),
            })
            .await?;
        summarizer.summarize(text).await
    }

    async fn request_detection(&self, text: &str) -> Result<Vec<Detection>, ProviderError> {
        let detector = self.provider.create_language_detector().await?;
        detector.detect(text).await
    }

    async fn request_translation(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ProviderError> {
        let translator = self
            .provider
            .create_translator(TranslatorOptions {
                model: LATEST_MODEL.into(),
                source_language: source.to_string(),
                target_language: target.to_string(),
            })
            .await?;
        translator.translate(text).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
