//! Binary entry point for the tugsort CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Print the file with its imports sorted
//! tugsort sort --source src/app.ts --ast app.ast.json
//!
//! # Sort in place, grouping local imports last
//! tugsort sort --source src/app.ts --ast app.ast.json --order '^[./]' --separation --write
//!
//! # Exit 1 if the file is not sorted
//! tugsort check --source src/app.ts --ast app.ast.json --format json
//! ```
//!
//! Errors are emitted as JSON on stdout and the exit code is the error code.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use tugsort::cli::{load_options, run_file, write_back, FileInputs, OptionOverrides};
use tugsort_core::error::{OutputErrorCode, SortError, SortResult};
use tugsort_core::group::LengthMode;
use tugsort_core::options::{AttributesKeyword, CompiledOptions};
use tugsort_core::output::{emit_response, CheckResponse, ErrorResponse, SortResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Deterministic import sorting for JavaScript and TypeScript.
#[derive(Parser, Debug)]
#[command(name = "tugsort", version, about = "Deterministic import sorting")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// JSON options file using the prettier plugin option names.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Sorted code (sort) or a one-line verdict (check).
    #[default]
    Text,
    /// Full JSON response.
    Json,
}

/// Input files.
#[derive(Args, Debug)]
struct InputArgs {
    /// Source file to sort.
    #[arg(long)]
    source: PathBuf,
    /// Parser output for the source file (Babel-compatible JSON).
    #[arg(long)]
    ast: PathBuf,
}

/// Sort options. Each flag overrides the config file.
#[derive(Args, Debug)]
struct OptionArgs {
    /// Group pattern (regex); repeat for several groups, in output order.
    #[arg(long = "order", value_name = "REGEX")]
    order: Vec<String>,
    /// Order statements by length.
    #[arg(long, value_parser = parse_length_mode)]
    length_mode: Option<LengthMode>,
    /// Namespace imports first within each group.
    #[arg(long)]
    namespace_first: bool,
    /// Sort the bindings inside each import.
    #[arg(long)]
    sort_specifiers: bool,
    /// Blank line between groups.
    #[arg(long)]
    separation: bool,
    /// Case-insensitive patterns and comparisons.
    #[arg(long)]
    case_insensitive: bool,
    /// Keep side-effect imports in place.
    #[arg(long)]
    keep_side_effects: bool,
    /// Keyword for regenerated import attributes.
    #[arg(long, value_parser = parse_attributes_keyword)]
    attributes_keyword: Option<AttributesKeyword>,
    /// Glob of files to leave alone; repeatable.
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,
}

impl OptionArgs {
    fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            import_order: self.order.clone(),
            length_mode: self.length_mode,
            namespace_first: self.namespace_first,
            sort_specifiers: self.sort_specifiers,
            separation: self.separation,
            case_insensitive: self.case_insensitive,
            keep_side_effects: self.keep_side_effects,
            attributes_keyword: self.attributes_keyword,
            exclude: self.exclude.clone(),
        }
    }
}

fn parse_length_mode(s: &str) -> Result<LengthMode, String> {
    s.parse().map_err(|e: SortError| e.to_string())
}

fn parse_attributes_keyword(s: &str) -> Result<AttributesKeyword, String> {
    s.parse().map_err(|e: SortError| e.to_string())
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Sort the imports of one file.
    Sort {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        options: OptionArgs,
        /// Write the result back to the source file.
        #[arg(long)]
        write: bool,
        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Report whether a file is sorted (exit code 1 if not).
    Check {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        options: OptionArgs,
        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn execute(cli: Cli) -> SortResult<ExitCode> {
    let config = cli.global.config.as_deref();
    match cli.command {
        Command::Sort {
            input,
            options,
            write,
            format,
        } => {
            let compiled = load_options(config, &options.overrides())?;
            execute_sort(&input, &compiled, write, format)
        }
        Command::Check {
            input,
            options,
            format,
        } => {
            let compiled = load_options(config, &options.overrides())?;
            execute_check(&input, &compiled, format)
        }
    }
}

// ============================================================================
// Command Executors
// ============================================================================

fn inputs(args: &InputArgs) -> FileInputs {
    FileInputs {
        source: args.source.clone(),
        ast: args.ast.clone(),
    }
}

fn execute_sort(
    args: &InputArgs,
    options: &CompiledOptions,
    write: bool,
    format: OutputFormat,
) -> SortResult<ExitCode> {
    let run = run_file(&inputs(args), options)?;
    let written = write && write_back(&run)?;

    let mut stdout = io::stdout();
    match format {
        OutputFormat::Json => {
            let response =
                SortResponse::new(&run.original, &run.outcome, Some(run.display_path()), written);
            emit_response(&response, &mut stdout)?;
        }
        OutputFormat::Text if write => {
            let verdict = if written { "sorted" } else { "unchanged" };
            writeln!(stdout, "{}: {}", run.display_path(), verdict)?;
        }
        OutputFormat::Text => stdout.write_all(run.outcome.code.as_bytes())?,
    }
    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn execute_check(
    args: &InputArgs,
    options: &CompiledOptions,
    format: OutputFormat,
) -> SortResult<ExitCode> {
    let run = run_file(&inputs(args), options)?;
    let sorted = !run.outcome.changed;

    let mut stdout = io::stdout();
    match format {
        OutputFormat::Json => {
            let response = CheckResponse::new(&run.original, &run.outcome, Some(run.display_path()));
            emit_response(&response, &mut stdout)?;
        }
        OutputFormat::Text => {
            let verdict = match (sorted, run.outcome.skipped) {
                (_, Some(reason)) => format!("skipped ({})", reason),
                (true, None) => "sorted".to_string(),
                (false, None) => "unsorted".to_string(),
            };
            writeln!(stdout, "{}: {}", run.display_path(), verdict)?;
        }
    }
    stdout.flush()?;

    Ok(if sorted {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
