//! Session record and the types that describe its state.
//!
//! [`SessionRecord`] is the single source of truth for one session: input,
//! output, busy flag, which operation produced the output, the last detected
//! language and whether the target-language picker is open.  The controller
//! mutates it; the UI reads a snapshot of it every frame.
//!
//! [`SharedSession`] is a type alias for `Arc<Mutex<SessionRecord>>`, cheap
//! to clone and safe to share across threads.

use std::sync::{Arc, Mutex};

/// Text shown in place of the output while an operation is in flight.
pub const PROCESSING_TEXT: &str = "Processing...";

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// The kind of operation that is running or last produced the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    #[default]
    None,
    Summary,
    Detection,
    Translation,
}

impl Operation {
    /// A short human-readable label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::None => "Idle",
            Operation::Summary => "Summary",
            Operation::Detection => "Language detection",
            Operation::Translation => "Translation",
        }
    }
}

// ---------------------------------------------------------------------------
// DetectedLanguage
// ---------------------------------------------------------------------------

/// Result of the most recent language detection.
///
/// `NoneDetected` (a detection ran and found nothing) is kept distinct from
/// `NotRun` (no detection has completed yet).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetectedLanguage {
    #[default]
    NotRun,
    NoneDetected,
    Detected(String),
}

impl DetectedLanguage {
    /// The detected language code, if any.
    ///
    /// ```
    /// use text_processor::session::DetectedLanguage;
    ///
    /// assert_eq!(DetectedLanguage::Detected("fr".into()).code(), Some("fr"));
    /// assert_eq!(DetectedLanguage::NoneDetected.code(), None);
    /// assert_eq!(DetectedLanguage::NotRun.code(), None);
    /// ```
    pub fn code(&self) -> Option<&str> {
        match self {
            DetectedLanguage::Detected(code) => Some(code.as_str()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionRecord
// ---------------------------------------------------------------------------

/// Mutable state of one text-processing session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionRecord {
    /// Text the user typed; the input of every operation.
    pub input_text: String,

    /// Result of the last completed operation (or a validation message).
    pub output_text: String,

    /// `true` exactly while a provider call is outstanding.
    pub is_busy: bool,

    /// Operation that is running, or that produced `output_text`.
    pub active_operation: Operation,

    /// Source language for translation, set only by language detection.
    pub detected_language: DetectedLanguage,

    /// Whether the target-language picker is visible.
    pub is_menu_open: bool,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the output pane shows: a placeholder while busy, else the output.
    pub fn display_text(&self) -> &str {
        if self.is_busy {
            PROCESSING_TEXT
        } else {
            &self.output_text
        }
    }
}

// ---------------------------------------------------------------------------
// SharedSession
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`SessionRecord`].
///
/// Lock for a short critical section; do **not** hold the lock across
/// `.await` points.
pub type SharedSession = Arc<Mutex<SessionRecord>>;

/// Construct a new [`SharedSession`] wrapping an empty record.
pub fn new_shared_session() -> SharedSession {
    Arc::new(Mutex::new(SessionRecord::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_empty() {
        let record = SessionRecord::new();
        assert!(record.input_text.is_empty());
        assert!(record.output_text.is_empty());
        assert!(!record.is_busy);
        assert_eq!(record.active_operation, Operation::None);
        assert_eq!(record.detected_language, DetectedLanguage::NotRun);
        assert!(!record.is_menu_open);
    }

    #[test]
    fn display_text_shows_placeholder_while_busy() {
        let mut record = SessionRecord::new();
        record.output_text = "previous".into();
        assert_eq!(record.display_text(), "previous");

        record.is_busy = true;
        assert_eq!(record.display_text(), PROCESSING_TEXT);
    }

    #[test]
    fn none_detected_differs_from_not_run() {
        assert_ne!(DetectedLanguage::NoneDetected, DetectedLanguage::NotRun);
    }

    #[test]
    fn operation_labels() {
        assert_eq!(Operation::None.label(), "Idle");
        assert_eq!(Operation::Summary.label(), "Summary");
        assert_eq!(Operation::Detection.label(), "Language detection");
        assert_eq!(Operation::Translation.label(), "Translation");
    }

    #[test]
    fn shared_session_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedSession>();
    }

    #[test]
    fn shared_session_can_be_cloned_and_mutated() {
        let session = new_shared_session();
        let session2 = Arc::clone(&session);

        session.lock().unwrap().is_menu_open = true;
        assert!(session2.lock().unwrap().is_menu_open);
    }
}
