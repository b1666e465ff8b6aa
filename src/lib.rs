//! Text processor: summarization, language detection and translation of
//! user-entered text through pluggable AI capability providers.
//!
//! * [`session`] — session record, [`TextOperationController`](session::TextOperationController)
//!   and the command runner.
//! * [`capability`] — provider contract plus HTTP, mock and unavailable
//!   implementations.
//! * [`language`] — supported-language allow-list.
//! * [`config`] — TOML settings.
//! * [`app`] — egui front-end.

pub mod app;
pub mod capability;
pub mod config;
pub mod language;
pub mod session;
