//! Error types emitted by the LifeQual importer CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use lifequal_data::RunError;
use thiserror::Error;

/// Errors emitted by the LifeQual importer CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The data directory does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingDataDir {
        /// Flag naming the directory.
        field: &'static str,
        /// Configured directory.
        path: Utf8PathBuf,
    },
    /// The data directory path exists but is not a directory.
    #[error("{field} path {path:?} exists but is not a directory")]
    DataDirNotDirectory {
        /// Flag naming the directory.
        field: &'static str,
        /// Configured path.
        path: Utf8PathBuf,
    },
    /// The data directory could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}")]
    InspectDataDir {
        /// Flag naming the directory.
        field: &'static str,
        /// Configured path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Bridging `log` records into `tracing` failed.
    #[error("failed to install the log bridge")]
    LogBridge(#[source] log::SetLoggerError),
    /// Installing the global `tracing` subscriber failed.
    #[error("failed to install the tracing subscriber")]
    Subscriber(#[source] tracing::subscriber::SetGlobalDefaultError),
    /// The import run failed.
    #[error(transparent)]
    Import(#[from] RunError),
}
