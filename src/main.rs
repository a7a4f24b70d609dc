//! SSE Lens - Entry Point

use clap::Parser;
use sselens::config::{self, OutputFormat, ResolvedConfig};
use sselens::model::AppError;
use sselens::view::{render_json, render_report, ReportOptions};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

/// Exit status when strict mode collected diagnostics.
const EXIT_DIAGNOSTICS: u8 = 2;

/// SSE Lens - decode raw SSE transcripts and reconstruct the streamed message
#[derive(Parser, Debug)]
#[command(name = "sselens")]
#[command(version)]
#[command(about = "Decode a raw SSE transcript and reconstruct the streamed message")]
pub struct Args {
    /// Path to a transcript or dialogue JSON file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Report format
    #[arg(long, value_parser = ["text", "json"])]
    pub format: Option<String>,

    /// Report tolerated stream irregularities and exit with status 2 if any were found
    #[arg(long)]
    pub strict: bool,

    /// List every decoded event in the report
    #[arg(long)]
    pub events: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("sselens: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Resolve configuration with the full precedence chain:
/// Defaults → Config File → Env Vars → CLI Args
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(config_file);
    let with_env = config::apply_env_overrides(merged)?;

    // Flags only override when explicitly set
    let format_override = args
        .format
        .as_deref()
        .and_then(|format| format.parse::<OutputFormat>().ok());
    let strict_override = args.strict.then_some(true);
    let events_override = args.events.then_some(true);

    Ok(config::apply_cli_overrides(
        with_env,
        format_override,
        strict_override,
        events_override,
    ))
}

fn run(args: Args) -> Result<ExitCode, AppError> {
    let config = resolve_config(&args)?;

    sselens::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let source = sselens::source::detect_input_source(args.file)?;
    info!(source = %source.describe(), "Reading input");
    let raw = source.read_all()?;

    let inspection = sselens::inspect(&raw, config.strictness);

    let report = match config.format {
        OutputFormat::Text => render_report(&inspection, &ReportOptions::from(&config)),
        OutputFormat::Json => {
            let mut json = render_json(&inspection)?;
            json.push('\n');
            json
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(report.as_bytes())?;
    stdout.flush()?;

    let diagnostics = inspection.diagnostics().len();
    if config.strictness.is_strict() && diagnostics > 0 {
        warn!(diagnostics, "Strict mode collected diagnostics");
        eprintln!("sselens: {diagnostics} diagnostic(s) reported in strict mode");
        return Ok(ExitCode::from(EXIT_DIAGNOSTICS));
    }

    info!("Report written");
    Ok(ExitCode::SUCCESS)
}
