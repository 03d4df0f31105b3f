//! A complete import run: schema, then every dataset in a fixed order.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use rusqlite::{Connection, Error as SqliteError};
use thiserror::Error;

use crate::import::{
    EntityKind, EntityReport, ImportError, import_crime_stats, import_hospitals, import_parks,
    import_rent_prices, import_schools, import_transport_stops,
};
use crate::schema::{SchemaError, initialise_schema};

/// Summary of a successful run, one entry per dataset in import order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Per-dataset outcomes.
    pub entities: Vec<EntityReport>,
}

impl ImportReport {
    /// Look up the outcome for one dataset.
    #[must_use]
    pub fn entity(&self, entity: EntityKind) -> Option<&EntityReport> {
        self.entities.iter().find(|report| report.entity == entity)
    }

    /// Total rows written across all datasets.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.entities.iter().map(|report| report.rows_inserted).sum()
    }
}

/// Errors that abort an import run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Creating the database's parent directory failed.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Schema initialisation failed before any dataset was imported.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// One dataset failed; later datasets were not attempted.
    #[error("failed to import {entity}")]
    Import {
        /// Dataset that failed.
        entity: EntityKind,
        /// Importer error.
        #[source]
        source: ImportError,
    },
    /// Closing the connection after the run failed.
    #[error("failed to close SQLite database")]
    Close {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Open the database at `database`, import every dataset from `data_dir`, and
/// close the connection whatever the outcome.
///
/// The parent directory of `database` is created when missing. When both the
/// run and the close fail, the run error is returned.
pub fn run_import(database: &Utf8Path, data_dir: &Utf8Path) -> Result<ImportReport, RunError> {
    lifequal_fs::ensure_parent_dir(database).map_err(|source| RunError::CreateDirectory {
        path: database.to_path_buf(),
        source,
    })?;
    let mut connection =
        Connection::open(database.as_std_path()).map_err(|source| RunError::Open {
            path: database.to_path_buf(),
            source,
        })?;

    let outcome = import_all(&mut connection, data_dir);
    if let Err(error) = &outcome {
        warn!("import aborted: {error}");
    }

    let closed = connection
        .close()
        .map_err(|(_, source)| RunError::Close { source });
    match (outcome, closed) {
        (Ok(report), Ok(())) => Ok(report),
        (Err(error), _) | (Ok(_), Err(error)) => Err(error),
    }
}

/// Initialise the schema and import every dataset over an open connection.
///
/// Datasets are imported in [`EntityKind::IMPORT_ORDER`], each from its
/// conventional file name inside `data_dir`. The first failure stops the run;
/// datasets imported before it stay committed.
pub fn import_all(
    connection: &mut Connection,
    data_dir: &Utf8Path,
) -> Result<ImportReport, RunError> {
    initialise_schema(connection)?;
    info!("database schema ready");

    let mut report = ImportReport::default();
    for entity in EntityKind::IMPORT_ORDER {
        let path = data_dir.join(entity.file_name());
        let outcome = import_entity(connection, entity, &path)
            .map_err(|source| RunError::Import { entity, source })?;
        info!(
            "imported {} {entity} from {path} ({} skipped)",
            outcome.rows_inserted, outcome.features_skipped
        );
        report.entities.push(outcome);
    }
    Ok(report)
}

fn import_entity(
    connection: &mut Connection,
    entity: EntityKind,
    path: &Utf8Path,
) -> Result<EntityReport, ImportError> {
    match entity {
        EntityKind::TransportStops => import_transport_stops(connection, path),
        EntityKind::Parks => import_parks(connection, path),
        EntityKind::Hospitals => import_hospitals(connection, path),
        EntityKind::CrimeStats => import_crime_stats(connection, path),
        EntityKind::Schools => import_schools(connection, path),
        EntityKind::RentPrices => import_rent_prices(connection, path),
    }
}
