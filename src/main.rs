//! Autosize - Entry Point

use autosize::model::{AppError, MeasureStrategy};
use autosize::view::ViewArgs;
use clap::Parser;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;
use tracing::info;

/// Autosize - a text area that grows with its content
#[derive(Parser, Debug)]
#[command(name = "autosize")]
#[command(version)]
#[command(about = "Interactive text area that resizes to fit its content")]
pub struct Args {
    /// Minimum visible rows (0 means no minimum)
    #[arg(long)]
    pub min_rows: Option<u32>,

    /// Maximum visible rows before scrolling (0 means no maximum)
    #[arg(long)]
    pub max_rows: Option<u32>,

    /// How the natural content height is measured
    #[arg(long, value_enum)]
    pub strategy: Option<MeasureStrategy>,

    /// Fixed content width in columns (defaults to the terminal width)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub width: Option<u16>,

    /// Initial text
    #[arg(short, long, default_value = "")]
    pub text: String,

    /// Mount the text area only after this many milliseconds
    #[arg(long)]
    pub mount_delay_ms: Option<u64>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = autosize::config::load_config_with_precedence(args.config.clone())?;
        let merged = autosize::config::merge_config(config_file);
        let with_env = autosize::config::apply_env_overrides(merged)?;
        autosize::config::apply_cli_overrides(
            with_env,
            args.min_rows,
            args.max_rows,
            args.strategy,
            args.width,
        )
    };

    let (tx, rx) = mpsc::channel();
    autosize::logging::init_with_capture(&config.log_file_path, tx)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let view_args = ViewArgs {
        config,
        initial_text: args.text,
        mount_delay: args.mount_delay_ms.map(Duration::from_millis),
    };
    autosize::view::run_with_args(view_args, Some(rx))?;

    Ok(())
}
