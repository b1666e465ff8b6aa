//! Application entry point — Text Processor.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Select the capability provider from config.
//! 5. Build the controller and the command / outcome channels.
//! 6. Spawn the operation runner on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use eframe::egui;
use tokio::sync::mpsc;
use text_processor::{
    app::TextProcessorApp,
    capability,
    config::AppConfig,
    session::{OperationCommand, OperationOutcome, OperationRunner, TextOperationController},
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let mut vp = egui::ViewportBuilder::default()
        .with_title("Text Processor")
        .with_inner_size([width, height])
        .with_min_inner_size([420.0, 360.0]);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Text Processor starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Capability provider
    let provider = capability::from_config(&config);

    // 5. Controller + channels
    let controller = Arc::new(TextOperationController::new(provider));
    let (command_tx, command_rx) = mpsc::channel::<OperationCommand>(16);
    let (outcome_tx, outcome_rx) = mpsc::channel::<OperationOutcome>(16);

    // 6. Runner
    rt.spawn(OperationRunner::new(Arc::clone(&controller)).run(command_rx, outcome_tx));

    // 7. Window (blocks until closed)
    let app = TextProcessorApp::new(controller, command_tx, outcome_rx, config.clone());
    let options = native_options(&config);

    eframe::run_native(
        "Text Processor",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
