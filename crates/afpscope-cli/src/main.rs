use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use afpscope_core::{DecodeOptions, DecodeStatus, Report};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("AFPSCOPE_BUILD_COMMIT"),
    ", built ",
    env!("AFPSCOPE_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  afpscope decode session.jsonl -o report.json\n  afpscope decode session.jsonl --stdout --pretty\n  afpscope decode 'captures/*.jsonl' --stdout --summary-only";

#[derive(Parser, Debug)]
#[command(name = "afpscope")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline decoder for AppleTalk Filing Protocol (AFP) message logs.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a JSON Lines message log into a versioned JSON report.
    #[command(after_help = EXAMPLES)]
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path (or glob matching exactly one file) to a .jsonl message log
    input: PathBuf,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if any message is partial or orphaned
    #[arg(long)]
    strict: bool,

    /// List partial and orphaned messages after decoding
    #[arg(long)]
    list_issues: bool,

    /// Omit field trees; keep summaries and statuses
    #[arg(long)]
    summary_only: bool,

    /// Log decoder events at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode(args) => {
            init_tracing(args.verbose);
            cmd_decode(args)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

/// Decoder events go to stderr so stdout stays valid JSON.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    tracing::debug!(input = %resolved_input.display(), "input resolved");
    if args.pretty && args.compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }

    let report_path = if args.stdout {
        None
    } else {
        let path = args.report.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_output(&resolved_input, &path)?;
        Some(path)
    };

    let options = DecodeOptions {
        include_fields: !args.summary_only,
    };
    let rep = afpscope_core::analyze_message_file(&resolved_input, options)
        .with_context(|| format!("Failed to decode message log: {}", resolved_input.display()))
        .map_err(|err| {
            CliError::new(
                format!("{err:#}"),
                Some("expected one JSON object per line with conversation, seq, reply and hex payload".to_string()),
            )
        })?;
    let json = serialize_report(&rep, args.pretty)?;

    match report_path {
        None => print!("{}", json),
        Some(report) => {
            if let Some(parent) = report.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report, json)
                .with_context(|| format!("Failed to write report: {}", report.display()))?;
            if !args.quiet {
                eprintln!(
                    "OK: {} messages decoded -> {}",
                    rep.summary.messages,
                    report.display()
                );
            }
        }
    }

    if args.list_issues && !args.quiet {
        print_issues(&rep);
    }
    if args.strict && rep.summary.has_issues() {
        return Err(CliError::new(
            format!(
                "decode issues detected ({} partial, {} orphaned)",
                rep.summary.partial, rep.summary.orphaned
            ),
            Some("use --list-issues to inspect".to_string()),
        ));
    }
    Ok(())
}

fn ensure_distinct_output(input: &Path, report: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let parent = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A missing output directory is created later and cannot hold the input.
    let Ok(report_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = report
        .file_name()
        .ok_or_else(|| CliError::new(format!("invalid report path: {}", report.display()), None))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("report path must differ from input: {}", report.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(rep)
    } else {
        serde_json::to_string(rep)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn print_issues(rep: &Report) {
    eprintln!("Decode issues:");
    for message in &rep.messages {
        let decoded = &message.decoded;
        let status = match decoded.status {
            DecodeStatus::Complete => continue,
            DecodeStatus::Partial => "partial",
            DecodeStatus::Orphaned => "orphaned",
        };
        match &decoded.error {
            Some(error) => eprintln!(
                "  #{} conv {} seq {} {}: {} ({})",
                message.index, message.conversation.0, message.seq, status, decoded.summary, error
            ),
            None => eprintln!(
                "  #{} conv {} seq {} {}: {}",
                message.index, message.conversation.0, message.seq, status, decoded.summary
            ),
        }
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .jsonl message log".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .jsonl message log".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "jsonl" && ext != "ndjson" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .jsonl or .ndjson file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .jsonl".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if count > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!("multiple files match pattern '{pattern}' ({count} matches); matches: {listed}"),
                Some("pass a single message log, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
