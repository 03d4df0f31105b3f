//! Command-line interface for the LifeQual importer.
//!
//! Resolves where the datasets and the database live, installs logging, and
//! hands over to [`lifequal_data::run_import`].
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use lifequal_data::ImportReport;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

mod error;
mod logging;

pub use error::CliError;

const ARG_DATA_DIR: &str = "data-dir";
const ARG_DATABASE: &str = "database";
const DEFAULT_DATA_DIR: &str = "LifeQual";
const DEFAULT_DATABASE: &str = "lifequal.db";

/// Run the importer with the current process arguments and environment.
pub fn run() -> Result<ImportReport, CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    logging::init(logging::level_for(cli.verbose, cli.debug))?;
    execute(cli)
}

/// One human-readable line per imported dataset.
#[must_use]
pub fn summary_lines(report: &ImportReport) -> Vec<String> {
    report
        .entities
        .iter()
        .map(|entry| match entry.features_skipped {
            0 => format!("{}: {} rows", entry.entity, entry.rows_inserted),
            skipped => format!(
                "{}: {} rows ({skipped} skipped)",
                entry.entity, entry.rows_inserted
            ),
        })
        .collect()
}

/// Render an error followed by each of its sources, separated by `": "`.
#[must_use]
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

fn execute(cli: Cli) -> Result<ImportReport, CliError> {
    let args = match cli.command {
        Some(Command::Import(args)) => args,
        None => ImportArgs::default(),
    };
    let config = args.into_config()?;
    run_configured(&config)
}

fn run_configured(config: &ImportConfig) -> Result<ImportReport, CliError> {
    config.validate_sources()?;
    info!(
        "importing datasets from {} into {}",
        config.data_dir, config.database
    );
    let report = lifequal_data::run_import(&config.database, &config.data_dir)?;
    debug!("{} rows written", report.total_rows());
    Ok(report)
}

#[derive(Debug, Parser)]
#[command(
    name = "lifequal-import",
    about = "Load the LifeQual datasets into a SQLite database",
    version
)]
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Enable debug (DEBUG level) logging output.
    #[arg(short, long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import every dataset (the default when no command is given).
    Import(ImportArgs),
}

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Import transport stops, parks, hospitals, crime statistics, \
                 schools, and rent prices from a directory of JSON files. \
                 Locations can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Import every dataset from the data directory"
)]
#[ortho_config(prefix = "LIFEQUAL")]
struct ImportArgs {
    /// Directory holding the input JSON files.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    data_dir: Option<Utf8PathBuf>,
    /// Path to the SQLite database; created when missing.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    database: Option<Utf8PathBuf>,
}

impl ImportArgs {
    fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(ImportConfig::from(merged))
    }
}

/// Resolved import locations.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImportConfig {
    data_dir: Utf8PathBuf,
    database: Utf8PathBuf,
}

impl ImportConfig {
    fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_directory(&self.data_dir, ARG_DATA_DIR)
    }

    fn require_directory(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match lifequal_fs::dir_is_dir(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::DataDirNotDirectory {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingDataDir {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectDataDir {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl From<ImportArgs> for ImportConfig {
    fn from(args: ImportArgs) -> Self {
        Self {
            data_dir: args
                .data_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATA_DIR)),
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
        }
    }
}

#[cfg(test)]
mod tests;
