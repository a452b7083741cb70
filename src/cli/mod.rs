//! Command-line interface
//!
//! Parses flags, builds the configuration, and dispatches either to the
//! engine in console mode or to the graphical front end. Exit codes:
//! 0 on success, 1 on any pipeline failure, 2 on argument or
//! configuration errors.

use crate::config::AscensionConfig;
use crate::engine::AscensionEngine;
use crate::error::{AscensionError, Result};
use crate::soul::{
    EmotionEngine, MemoryEngine, ReflectionEngine, SoulLoopController, EMOTIONS_FILE_NAME,
    MEMORY_FILE_NAME, REFLECTIONS_FILE_NAME,
};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

/// Configurable train-and-persist pipeline
#[derive(Parser, Debug)]
#[command(name = "ascension")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Configurable train-and-persist pipeline", long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON); defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Launch the graphical front end
    #[arg(long)]
    pub gui: bool,

    /// Run the soul loop for this many iterations instead of the pipeline
    #[arg(long, value_name = "ITERATIONS")]
    pub soul_loop: Option<usize>,
}

/// Resolve the configuration and dispatch to GUI or console mode.
pub fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => AscensionConfig::load_from_file(path)?,
        None => AscensionConfig::default(),
    };
    if cli.gui {
        config.gui = true;
    }

    if let Some(iterations) = cli.soul_loop {
        return run_soul_loop(config, iterations);
    }
    if config.gui {
        return launch_gui(config);
    }
    run_console(config)
}

/// Drive the introspective engines for `iterations` cycles, persisting
/// their stores under `output_dir` afterwards.
fn run_soul_loop(config: AscensionConfig, iterations: usize) -> Result<()> {
    let out = PathBuf::from(&config.output_dir);
    std::fs::create_dir_all(&out).map_err(|e| AscensionError::Persistence(e.to_string()))?;

    let mut controller = SoulLoopController::new(
        MemoryEngine::open(out.join(MEMORY_FILE_NAME))?,
        EmotionEngine::open(out.join(EMOTIONS_FILE_NAME))?,
        ReflectionEngine::open(out.join(REFLECTIONS_FILE_NAME))?,
    );

    println!("{}", "Soul loop".blue().bold());
    controller.run_loop(iterations)?;
    controller.save_all()?;

    println!("  {}", controller.memory().summarise());
    println!("  {}", controller.reflections().summarise());
    match controller.emotions().dominant() {
        Some((name, intensity)) => {
            println!("  dominant emotion: {} ({:.3})", name, intensity)
        }
        None => println!("  no emotions recorded"),
    }
    Ok(())
}

#[cfg(feature = "gui")]
fn launch_gui(config: AscensionConfig) -> Result<()> {
    crate::gui::launch(config)
}

#[cfg(not(feature = "gui"))]
fn launch_gui(_config: AscensionConfig) -> Result<()> {
    Err(crate::error::AscensionError::Config(
        "this binary was built without the 'gui' feature".to_string(),
    ))
}

fn run_console(config: AscensionConfig) -> Result<()> {
    println!("{}", "Ascension pipeline".blue().bold());
    println!("  {} {}", "data".dimmed(), config.data_path);
    println!("  {} {}", "model".dimmed(), config.model_type);
    println!();

    let mut engine = AscensionEngine::new(config)?;
    let report = engine.run()?;

    println!();
    println!("{}", "Results".yellow().bold());
    println!("─────────────────────────────");
    println!("Accuracy:  {:.4}", report.accuracy);
    println!(
        "Samples:   {} × {} features",
        report.n_rows, report.n_features
    );
    println!("Model:     {}", report.model_path.display());
    println!("Log:       {}", engine.log_path().display());

    Ok(())
}
