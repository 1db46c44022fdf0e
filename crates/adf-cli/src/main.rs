//! # adf
//!
//! Command-line validator and converter for ADF automotive leads.
//!
//! Exit codes: `0` success, `1` the lead failed validation, `2` the input or
//! output could not be read or written.

mod config;

use adf_adapter_json::{JsonError, JsonWriter, WriteOutcome};
use adf_adapter_xml::{XmlError, json_path_for};
use adf_ir::Document;
use adf_schema::SchemaRegistry;
use adf_validation::{StrictnessLevel, ValidationEngine, ValidationReporter, ValidationResult};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use crate::config::{CliConfig, Keys, Overrides, Settings};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adf")]
#[command(about = "ADF automotive lead validator")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a lead and print it normalized
    Validate {
        /// Input file path
        input: PathBuf,

        /// Input format
        #[arg(short, long, value_enum, default_value_t = InputFormat::Auto)]
        format: InputFormat,

        /// Write the normalized lead here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How undeclared keys are treated
        #[arg(short, long)]
        strictness: Option<StrictnessLevel>,

        /// Output key style
        #[arg(short, long, value_enum)]
        keys: Option<Keys>,

        /// Write absent fields as null
        #[arg(long)]
        emit_nulls: bool,

        /// Stop recording errors after this many (0 = unlimited)
        #[arg(long)]
        max_errors: Option<usize>,

        /// How findings are printed on stderr
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        report: ReportFormat,
    },

    /// Convert an XML lead to its JSON tree
    Convert {
        /// Input XML file
        input: PathBuf,

        /// Output path (default: input with a .json suffix)
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Pick by file extension
    Auto,
    Json,
    Xml,
}

impl InputFormat {
    fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => {
                let is_xml = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
                if is_xml { Self::Xml } else { Self::Json }
            }
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Input or output failure, labelled by category
#[derive(Error, Debug)]
enum IoFailure {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid JSON format: {0}")]
    Json(String),

    #[error("Invalid XML format: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<JsonError> for IoFailure {
    fn from(err: JsonError) -> Self {
        match err {
            JsonError::NotFound { path } => Self::NotFound(path),
            JsonError::Malformed { .. } => Self::Json(err.to_string()),
            JsonError::Write(message) | JsonError::Io(message) => Self::Io(message),
        }
    }
}

impl From<XmlError> for IoFailure {
    fn from(err: XmlError) -> Self {
        match err {
            XmlError::NotFound { path } => Self::NotFound(path),
            XmlError::Malformed { .. } => Self::Xml(err.to_string()),
            XmlError::Io(message) => Self::Io(message),
        }
    }
}

/// How a command finished when nothing went wrong with I/O
enum Outcome {
    Success,
    Invalid,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Invalid) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let config = CliConfig::load_optional(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Validate {
            input,
            format,
            output,
            strictness,
            keys,
            emit_nulls,
            max_errors,
            report,
        } => {
            let overrides = Overrides {
                strictness,
                max_errors,
                keys,
                emit_nulls,
            };
            let settings = Settings::resolve(&config, &overrides);
            validate_command(&input, format, output.as_deref(), &settings, report)
        }
        Commands::Convert { input, output } => {
            let settings = Settings::resolve(&config, &Overrides::default());
            convert_command(&input, output, &settings)
        }
    }
}

fn load_input(input: &Path, format: InputFormat) -> Result<Document, IoFailure> {
    let doc = match format.resolve(input) {
        InputFormat::Xml => adf_adapter_xml::load_document(input)?,
        _ => adf_adapter_json::load_document(input)?,
    };
    debug!(source = doc.source_name(), "Loaded input");
    Ok(doc)
}

fn validate_command(
    input: &Path,
    format: InputFormat,
    output: Option<&Path>,
    settings: &Settings,
    report: ReportFormat,
) -> anyhow::Result<Outcome> {
    let doc = load_input(input, format)?;

    let engine = ValidationEngine::with_registry(SchemaRegistry::adf(), settings.validation_config())
        .context("Failed to build the validation engine")?;
    let result = engine
        .validate(&doc)
        .context("Validation could not run")?;

    let reporter = ValidationReporter::new().with_warnings(true);
    info!("{}", reporter.summary(doc.source_name(), &result));
    print_findings(&reporter, doc.source_name(), &result, report)?;

    let Some(lead) = result.record.as_ref().filter(|_| result.is_valid) else {
        return Ok(Outcome::Invalid);
    };

    let tree = lead.to_value(&settings.flatten_options());
    let writer = JsonWriter::new().pretty(settings.pretty);
    match output {
        Some(path) => {
            if let WriteOutcome::Written { path, bytes } =
                writer.write_file(&tree, path).map_err(IoFailure::from)?
            {
                info!(bytes, "Wrote normalized lead to {}", path.display());
            }
        }
        None => writer
            .write(std::io::stdout().lock(), &tree)
            .map_err(IoFailure::from)?,
    }

    Ok(Outcome::Success)
}

fn print_findings(
    reporter: &ValidationReporter,
    source: &str,
    result: &ValidationResult,
    format: ReportFormat,
) -> anyhow::Result<()> {
    let mut stderr = std::io::stderr().lock();
    match format {
        ReportFormat::Text => {
            for line in reporter.render(result) {
                writeln!(stderr, "{line}").map_err(|e| IoFailure::Io(e.to_string()))?;
            }
        }
        ReportFormat::Json => {
            let report = reporter.report(source, result);
            let text = serde_json::to_string_pretty(&report)
                .context("Failed to serialize the validation report")?;
            writeln!(stderr, "{text}").map_err(|e| IoFailure::Io(e.to_string()))?;
        }
    }
    Ok(())
}

fn convert_command(
    input: &Path,
    output: Option<PathBuf>,
    settings: &Settings,
) -> anyhow::Result<Outcome> {
    let doc = adf_adapter_xml::load_document(input).map_err(IoFailure::from)?;
    let output = output.unwrap_or_else(|| json_path_for(input));

    let writer = JsonWriter::new().pretty(settings.pretty);
    match writer
        .write_file(&doc.root, &output)
        .map_err(IoFailure::from)?
    {
        WriteOutcome::Written { path, bytes } => {
            info!(bytes, "Converted {}", input.display());
            println!("Converted {} -> {}", input.display(), path.display());
        }
        WriteOutcome::SkippedEmpty => {
            println!("Nothing to convert in {}", input.display());
        }
    }

    Ok(Outcome::Success)
}
