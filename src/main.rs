//! pqxl - Preview a Parquet file and convert it to Excel

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;

use pqxl::config::{Config, OutputFormat, ValuePolicy};
use pqxl::error::ConvertError;
use pqxl::output::render_to_stdout;
use pqxl::{Event, Session, SourceBlob};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
    Html,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Html => OutputFormat::Html,
        }
    }
}

/// Preview a Parquet file and convert it to an Excel workbook
#[derive(Parser, Debug)]
#[command(name = "pqxl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Parquet file to convert (.parquet or .pq)
    input: PathBuf,

    /// Where to write the workbook: a directory or a file path
    /// [default: next to the input, as <name>.xlsx]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Number of rows to show in the preview
    #[arg(long, default_value_t = pqxl::preview::DEFAULT_PREVIEW_ROWS)]
    preview_rows: usize,

    /// Fail instead of converting nested values to text or dropping timezones
    #[arg(long)]
    strict: bool,

    /// Only show the summary and preview, do not write a workbook
    #[arg(long)]
    summary_only: bool,

    /// Read the workbook back and check it against the source table
    #[arg(long)]
    verify: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG is used otherwise
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// The upload could not be turned into a workbook
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Unprocessable(String);

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("pqxl=info"),
        _ => EnvFilter::new("pqxl=debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::default()
        .with_preview_rows(cli.preview_rows)
        .with_value_policy(if cli.strict {
            ValuePolicy::Strict
        } else {
            ValuePolicy::Coerce
        })
        .with_summary_only(cli.summary_only)
        .with_verify(cli.verify)
        .with_output_format(cli.format.into());
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }

    let blob = SourceBlob::from_path(&cli.input, &config)
        .map_err(|e| Unprocessable(ConvertError::from(e).user_message()))?;

    let mut session = Session::new(config.clone());
    session.handle(Event::FileSelected(blob));
    if let Some(failure) = session.failure() {
        return Err(Unprocessable(failure.message.clone()).into());
    }
    status(Color::Green, "✓ File loaded successfully");

    let saved = if config.summary_only {
        None
    } else {
        let download = session
            .handle(Event::DownloadRequested)
            .ok_or_else(|| match session.failure() {
                Some(failure) => Unprocessable(failure.message.clone()),
                None => Unprocessable("no workbook was produced".to_string()),
            })?;

        let destination = config
            .output
            .clone()
            .unwrap_or_else(|| input_dir(&cli.input));
        let path = download
            .save_to(&destination)
            .with_context(|| format!("Failed to write {}", destination.display()))?;
        Some(path)
    };

    let conversion = session
        .conversion()
        .context("session lost its conversion")?;
    render_to_stdout(conversion, saved.as_deref(), config.output_format)?;

    Ok(())
}

fn input_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn color_choice() -> ColorChoice {
    if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn status(color: Color, message: &str) {
    let mut stderr = StandardStream::stderr(color_choice());
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)));
    let _ = writeln!(stderr, "{}", message);
    let _ = stderr.reset();
}

fn report_error(e: &anyhow::Error) {
    let mut stderr = StandardStream::stderr(color_choice());
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "Error:");
    let _ = stderr.reset();
    let _ = writeln!(stderr, " {:#}", e);

    if e.downcast_ref::<Unprocessable>().is_some() {
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        let _ = writeln!(stderr, "Please make sure you've uploaded a valid Parquet file.");
        let _ = stderr.reset();
    }
}
