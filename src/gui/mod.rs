//! Graphical front end
//!
//! A single window with a start button, a progress bar and a status line.
//! Starting a run disables the button, spawns the engine on a background
//! thread, and relays progress events back to the interface thread over a
//! single-producer/single-consumer channel drained each frame. The button
//! re-enables exactly once, on the terminal event (success or failure).
//! No cancellation: a started run proceeds to completion or failure.

use crate::config::AscensionConfig;
use crate::engine::AscensionEngine;
use crate::error::{AscensionError, Result};
use eframe::egui;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Event relayed from the pipeline thread to the interface thread.
enum GuiEvent {
    Progress { fraction: f32, message: String },
    Finished { accuracy: f64 },
    Failed(String),
}

/// Lifecycle of the single pipeline run the window controls.
enum RunState {
    Idle,
    Running,
    Finished { accuracy: f64 },
    Failed(String),
}

/// Open the window and block until it is closed.
pub fn launch(config: AscensionConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 200.0])
            .with_min_inner_size([320.0, 160.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Ascension",
        options,
        Box::new(|_cc| Ok(Box::new(AscensionApp::new(config)))),
    )
    .map_err(|e| AscensionError::Gui(e.to_string()))
}

struct AscensionApp {
    config: AscensionConfig,
    state: RunState,
    progress: f32,
    status: String,
    events: Option<Receiver<GuiEvent>>,
}

impl AscensionApp {
    fn new(config: AscensionConfig) -> Self {
        Self {
            config,
            state: RunState::Idle,
            progress: 0.0,
            status: "Ready".to_string(),
            events: None,
        }
    }

    fn start_run(&mut self) {
        let (tx, rx) = mpsc::channel();
        self.events = Some(rx);
        self.state = RunState::Running;
        self.progress = 0.0;
        self.status = "Starting".to_string();

        let config = self.config.clone();
        std::thread::spawn(move || run_pipeline(config, tx));
    }

    fn drain_events(&mut self) {
        let Some(rx) = &self.events else { return };
        let mut terminal = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                GuiEvent::Progress { fraction, message } => {
                    self.progress = fraction;
                    self.status = message;
                }
                GuiEvent::Finished { accuracy } => {
                    self.progress = 1.0;
                    self.status = format!("Completed, validation accuracy {:.4}", accuracy);
                    self.state = RunState::Finished { accuracy };
                    terminal = true;
                }
                GuiEvent::Failed(message) => {
                    self.status = message.clone();
                    self.state = RunState::Failed(message);
                    terminal = true;
                }
            }
        }
        if terminal {
            self.events = None;
        }
    }
}

/// Run one pipeline to completion on the background thread, streaming
/// progress and exactly one terminal event over `tx`.
fn run_pipeline(config: AscensionConfig, tx: Sender<GuiEvent>) {
    let progress_tx = tx.clone();
    let outcome = AscensionEngine::new(config)
        .map(|engine| {
            engine.with_progress(move |event| {
                let _ = progress_tx.send(GuiEvent::Progress {
                    fraction: event.fraction as f32,
                    message: event.message.clone(),
                });
            })
        })
        .and_then(|mut engine| engine.run());

    let terminal = match outcome {
        Ok(report) => GuiEvent::Finished {
            accuracy: report.accuracy,
        },
        Err(e) => GuiEvent::Failed(e.to_string()),
    };
    let _ = tx.send(terminal);
}

impl eframe::App for AscensionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Ascension");
            ui.add_space(8.0);

            let running = matches!(self.state, RunState::Running);
            if ui
                .add_enabled(!running, egui::Button::new("Start ascension"))
                .clicked()
            {
                self.start_run();
            }

            ui.add_space(8.0);
            ui.add(egui::ProgressBar::new(self.progress).show_percentage());
            ui.add_space(4.0);

            match &self.state {
                RunState::Failed(message) => {
                    ui.colored_label(egui::Color32::RED, message);
                }
                _ => {
                    ui.label(&self.status);
                }
            }
        });

        // keep draining while the background run is live
        if matches!(self.state, RunState::Running) {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
