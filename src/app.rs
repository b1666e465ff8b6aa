//! Text Processor window: egui/eframe application.
//!
//! # Architecture
//!
//! [`TextProcessorApp`] is the top-level [`eframe::App`].  It holds:
//!
//! * the [`TextOperationController`], for synchronous state (input text,
//!   picker toggle, snapshots of the session record);
//! * `command_tx`: sends [`OperationCommand`]s to the [`OperationRunner`](crate::session::OperationRunner);
//! * `outcome_rx`: receives [`OperationOutcome`]s; failures are shown in
//!   the notice line until dismissed.
//!
//! The window size is tracked every frame and written back to
//! `settings.toml` on exit when it differs from the loaded value.
//!
//! # Layout
//!
//! | Area | Content |
//! |------|---------|
//! | Heading | "Text Processor" |
//! | Output | `display_text()`, "Processing..." while busy |
//! | Buttons | Summarize, Detect Language (disabled while busy), Translate (toggles picker) |
//! | Picker | Supported languages in upper case, shown below the buttons |
//! | Input | Multiline text box |
//! | Notice | Last error, orange, with a dismiss button |

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::language::{self, SUPPORTED_LANGUAGES};
use crate::session::{
    Operation, OperationCommand, OperationOutcome, SessionRecord, TextOperationController,
};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);
const ACCENT_BUSY: egui::Color32 = egui::Color32::from_rgb(156, 163, 175);
const NOTICE: egui::Color32 = egui::Color32::from_rgb(255, 136, 68);

// ---------------------------------------------------------------------------
// TextProcessorApp
// ---------------------------------------------------------------------------

pub struct TextProcessorApp {
    controller: Arc<TextOperationController>,

    /// Local edit buffer for the input box; pushed to the session on change.
    input: String,

    /// Last failure message, shown until dismissed or the next success.
    notice: Option<String>,

    command_tx: mpsc::Sender<OperationCommand>,
    outcome_rx: mpsc::Receiver<OperationOutcome>,

    config: AppConfig,

    /// Window size from the loaded config; settings are rewritten on exit
    /// only when the window was resized.
    loaded_size: (f32, f32),
}

impl TextProcessorApp {
    /// * `controller` — shared with the runner task.
    /// * `command_tx` — sender end of the runner's command channel.
    /// * `outcome_rx` — receiver end of the runner's outcome channel.
    /// * `config`     — loaded application configuration.
    pub fn new(
        controller: Arc<TextOperationController>,
        command_tx: mpsc::Sender<OperationCommand>,
        outcome_rx: mpsc::Receiver<OperationOutcome>,
        config: AppConfig,
    ) -> Self {
        let input = controller.snapshot().input_text;
        let loaded_size = config.ui.window_size;
        Self {
            controller,
            input,
            notice: None,
            command_tx,
            outcome_rx,
            config,
            loaded_size,
        }
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending outcomes (non-blocking).
    fn poll_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            match outcome.result {
                Ok(()) => self.notice = None,
                Err(e) => self.notice = Some(format!("{}: {e}", outcome.operation.label())),
            }
        }
    }

    fn send(&mut self, command: OperationCommand) {
        if let Err(e) = self.command_tx.try_send(command) {
            log::warn!("could not queue command: {e}");
            self.notice = Some("The processor is not responding.".into());
        }
    }

    // ── Window sizing ────────────────────────────────────────────────────

    /// Remember the current inner size so it can be persisted on exit.
    fn track_window_size(&mut self, ctx: &egui::Context) {
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.config.ui.window_size = (rect.width(), rect.height());
        }
    }

    /// The config to write back on exit, if the window was resized.
    fn settings_to_persist(&self) -> Option<&AppConfig> {
        (self.config.ui.window_size != self.loaded_size).then_some(&self.config)
    }

    // ── Panels ───────────────────────────────────────────────────────────

    fn draw_output(&self, ui: &mut egui::Ui, session: &SessionRecord) {
        egui::Frame::group(ui.style())
            .inner_margin(egui::Margin::same(12))
            .show(ui, |ui| {
                ui.set_min_height(200.0);
                ui.set_width(ui.available_width());
                egui::ScrollArea::vertical()
                    .id_salt("output")
                    .max_height(240.0)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(session.display_text()).size(14.0));
                    });
            });
    }

    fn draw_buttons(&mut self, ui: &mut egui::Ui, session: &SessionRecord) {
        let busy = session.is_busy;
        let fill = if busy { ACCENT_BUSY } else { ACCENT };

        ui.horizontal(|ui| {
            let summarize = egui::Button::new(
                egui::RichText::new("Summarize").color(egui::Color32::WHITE),
            )
            .fill(fill)
            .min_size(egui::vec2(128.0, 32.0));
            if ui.add_enabled(!busy, summarize).clicked() {
                self.send(OperationCommand::Summarize);
            }

            let detect = egui::Button::new(
                egui::RichText::new("Detect Language").color(egui::Color32::WHITE),
            )
            .fill(fill)
            .min_size(egui::vec2(128.0, 32.0));
            if ui.add_enabled(!busy, detect).clicked() {
                self.send(OperationCommand::DetectLanguage);
            }

            let translate = egui::Button::new(
                egui::RichText::new("Translate").color(egui::Color32::WHITE),
            )
            .fill(ACCENT)
            .min_size(egui::vec2(128.0, 32.0));
            if ui.add(translate).clicked() {
                self.controller.toggle_menu();
            }
        });

        if session.is_menu_open {
            self.draw_language_picker(ui, session);
        }
    }

    /// Target-language picker; one entry per supported language.
    fn draw_language_picker(&mut self, ui: &mut egui::Ui, session: &SessionRecord) {
        let source = session.detected_language.code().unwrap_or("?");
        ui.horizontal_wrapped(|ui| {
            ui.label(egui::RichText::new(format!("{} →", source.to_uppercase())).weak());
            for code in SUPPORTED_LANGUAGES {
                let entry = ui
                    .add_enabled(!session.is_busy, egui::Button::new(code.to_uppercase()))
                    .on_hover_text(language::display_name(code).unwrap_or(code));
                if entry.clicked() {
                    self.send(OperationCommand::Translate(code.to_string()));
                }
            }
        });
    }

    fn draw_input(&mut self, ui: &mut egui::Ui) {
        let response = ui.add(
            egui::TextEdit::multiline(&mut self.input)
                .hint_text("Paste or type text here")
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.controller.set_input_text(self.input.clone());
        }
    }

    fn draw_notice(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.notice.clone() else {
            return;
        };
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(message).color(NOTICE));
            if ui.small_button("Dismiss").clicked() {
                self.notice = None;
            }
        });
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for TextProcessorApp {
    /// Called every frame by eframe.  Polls outcomes, then renders from a
    /// fresh snapshot of the session.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_outcomes();
        self.track_window_size(ctx);

        let session = self.controller.snapshot();

        // Outcomes and the busy flag change off the UI thread.
        if session.is_busy {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new("Text Processor").strong());
            });
            ui.add_space(12.0);

            self.draw_output(ui, &session);
            ui.add_space(12.0);

            self.draw_buttons(ui, &session);
            ui.add_space(8.0);

            self.draw_input(ui);
            ui.add_space(4.0);

            self.draw_notice(ui);

            if !session.is_busy && session.active_operation != Operation::None {
                ui.with_layout(egui::Layout::bottom_up(egui::Align::Max), |ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} · {}",
                            session.active_operation.label(),
                            self.config.provider.model
                        ))
                        .weak()
                        .size(11.0),
                    );
                });
            }
        });
    }

    /// Persist the window size in the config on exit (best-effort).
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Text Processor closing");
        if let Some(config) = self.settings_to_persist() {
            if let Err(e) = config.save() {
                log::warn!("Failed to save window size: {e}");
            }
        }
    }
}
