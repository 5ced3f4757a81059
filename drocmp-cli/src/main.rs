use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use drocmp_lib::{DecodeOptions, DecodedCapture, Verdict, compare, decode_with};

mod report;


use report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Compare two DOSBox Raw OPL (DRO v2.0) captures.
#[derive(Parser, Debug)]
#[command(name = "drocmp", author, version, about, long_about = None)]
struct Cli {
    /// Remove delay pairs before comparing.
    #[arg(short = 'r', long = "remove-delays")]
    remove_delays: bool,
    /// Also require the total delay lengths to match.
    #[arg(short = 'm', long = "match-delays")]
    match_delays: bool,
    /// Reject captures whose header flags compression.
    #[arg(long)]
    strict: bool,
    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Optional path to a file to write logs to, in addition to stderr.
    #[arg(short, long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
    /// First DRO file.
    file1: PathBuf,
    /// Second DRO file.
    file2: PathBuf,
}

/// Files compared equal under the selected policy.
const EXIT_IDENTICAL: u8 = 0;
/// Files differ, a capture failed to decode, or the arguments were invalid.
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return ExitCode::from(code),
    };

    let _guard = match setup_logging(cli.log_file.as_deref(), &cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    ExitCode::from(execute(&cli, &mut std::io::stdout().lock()))
}

/// Parse the command line, mapping clap's usage errors onto exit status 1.
fn parse_args<I, T>(args: I) -> Result<Cli, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        // --help and --version are not usage errors
        if e.use_stderr() { EXIT_FAILURE } else { EXIT_IDENTICAL }
    })
}

/// Run the comparison, write the report to `out` and return the exit status.
fn execute(cli: &Cli, out: &mut impl Write) -> u8 {
    let result = run(cli).and_then(|report| {
        let rendered = match cli.format {
            OutputFormat::Text => report.render_text(),
            OutputFormat::Json => report.render_json()? + "\n",
        };
        out.write_all(rendered.as_bytes()).context("Failed to write report")?;
        Ok(report.verdict)
    });

    match result {
        Ok(verdict) => exit_status(&verdict),
        Err(e) => {
            eprintln!("Error: {e:#}");
            EXIT_FAILURE
        }
    }
}

fn exit_status(verdict: &Verdict) -> u8 {
    debug!(?verdict, "Comparison finished");
    if verdict.is_identical() { EXIT_IDENTICAL } else { EXIT_FAILURE }
}

fn setup_logging(log_file_path: Option<&Path>, verbosity: &Verbosity<WarnLevel>) -> Result<Option<WorkerGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = if let Some(path) = log_file_path {
        let log_file =
            File::create(path).with_context(|| format!("Failed to create log file at: {}", path.display()))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.tracing_level_filter().to_string()));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn run(cli: &Cli) -> Result<Report> {
    let options = DecodeOptions::default()
        .with_exclude_delay_pairs(cli.remove_delays)
        .with_reject_compressed(cli.strict);

    let first = load(&cli.file1, &options)?;
    let second = load(&cli.file2, &options)?;

    let verdict = compare(&first, &second, cli.match_delays);
    if let Verdict::Differ(difference) = &verdict {
        info!(?difference, "Captures differ");
    }

    Ok(Report::new(
        (cli.file1.as_path(), &first),
        (cli.file2.as_path(), &second),
        verdict,
    ))
}

fn load(path: &Path, options: &DecodeOptions) -> Result<DecodedCapture> {
    let capture = decode_with(path, options).with_context(|| format!("Failed to decode {}", path.display()))?;
    info!(
        path = %path.display(),
        pairs = capture.len(),
        excluded = capture.excluded_pairs,
        total_delay_ms = capture.total_delay_ms,
        hardware = %capture.format_header.hardware_type,
        "Decoded capture"
    );
    Ok(capture)
}
