//! Session orchestration: the state record, the controller that mutates it,
//! and the runner that lets a UI thread trigger operations.
//!
//! # Architecture
//!
//! ```text
//! UI (egui update, every frame)
//!   │  set_input_text / toggle_menu / snapshot      (sync, short lock)
//!   │
//!   └─ OperationCommand (mpsc) ──▶ OperationRunner::run()  ← tokio task
//!                                        │
//!                                        ▼
//!                          TextOperationController::execute
//!                            ├─ summarize        → Summarizer
//!                            ├─ detect_language  → LanguageDetector
//!                            └─ translate(code)  → Translator
//!
//! SharedSession (Arc<Mutex<SessionRecord>>) ←─── read by the UI each frame
//! ```

pub mod controller;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::{ControllerError, OperationCommand, TextOperationController, MIN_SUMMARY_WORDS};
pub use runner::{OperationOutcome, OperationRunner};
pub use state::{
    new_shared_session, DetectedLanguage, Operation, SessionRecord, SharedSession,
    PROCESSING_TEXT,
};
