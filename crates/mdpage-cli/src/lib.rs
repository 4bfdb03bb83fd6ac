use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use mdpage_config::{Config, LoadOptions};
use mdpage_core::{
    CheckOptions, CheckOutcome, MdPage, OperationError, Operations, RenderMode, RenderOptions,
    RenderOutcome,
};
use mdpage_format::{render_report, CheckFormat};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut options = LoadOptions::default();
    if let Some(path) = cli.config {
        options = options.with_override_path(path);
    }
    let config = Config::load(options)?;
    for layer in &config.sources.layers {
        debug!(source = %layer.describe(), "config layer");
    }

    let engine = MdPage::bootstrap(config);
    let ops = engine.operations();

    match cli.command {
        Command::Render(args) => handle_render(ops, args),
        Command::Check(args) => handle_check(ops, args),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn handle_render(ops: &Operations, args: RenderArgs) -> Result<i32> {
    let RenderArgs {
        page,
        output,
        check,
        diff,
    } = args;

    let mode = if check {
        RenderMode::Check
    } else if diff {
        RenderMode::Diff
    } else {
        RenderMode::Write
    };

    let options = RenderOptions { page, output, mode };
    match ops.render(options) {
        Ok(RenderOutcome {
            rendered,
            exit_code,
            ..
        }) => {
            emit(&rendered)?;
            Ok(exit_code)
        }
        Err(OperationError::Invalid(report)) => {
            // invalid pages are reported like `check`, on stderr
            eprint!("{}", render_report(&report, CheckFormat::Plain)?);
            Ok(1)
        }
        Err(err) => Err(err.into()),
    }
}

fn handle_check(ops: &Operations, args: CheckArgs) -> Result<i32> {
    let CheckArgs { page, format } = args;

    let format = match format.unwrap_or(CheckFormatValue::Plain) {
        CheckFormatValue::Plain => CheckFormat::Plain,
        CheckFormatValue::Json => CheckFormat::Json,
    };

    let CheckOutcome {
        rendered,
        exit_code,
        ..
    } = ops.check(CheckOptions { page, format })?;

    emit(&rendered)?;
    Ok(exit_code)
}

/// Print to stdout verbatim; a reader closing the pipe early is not an error.
fn emit(content: &str) -> Result<()> {
    if content.is_empty() {
        return Ok(());
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match handle
        .write_all(content.as_bytes())
        .and_then(|_| handle.flush())
    {
        Ok(()) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("Failed to write to stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Generate a Markdown catalog page from a YAML description",
    propagate_version = true
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Config file applied on top of discovered `.mdpage.toml` files
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a page file to Markdown
    Render(RenderArgs),
    /// Validate a page file and report duplicate anchors
    Check(CheckArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Page description (YAML)
    #[arg(long, value_name = "PAGE")]
    page: PathBuf,
    /// Output file; stdout when neither this nor `output.path` is set
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,
    /// Fail when the output file is out of date, without writing it
    #[arg(long, conflicts_with = "diff")]
    check: bool,
    /// Print a unified diff for an out-of-date output file
    #[arg(long, conflicts_with = "check")]
    diff: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Page description (YAML)
    #[arg(long, value_name = "PAGE")]
    page: PathBuf,
    /// Output format (plain or json)
    #[arg(long, value_enum)]
    format: Option<CheckFormatValue>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CheckFormatValue {
    Plain,
    Json,
}
