//! Entity importers: one function per input file.
//!
//! Each importer reads its whole file, converts every record, and inserts the
//! rows inside a single transaction that is committed once at the end. Any
//! error rolls that transaction back and is returned to the caller; rows
//! committed by earlier importers are left untouched.
#![forbid(unsafe_code)]

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use lifequal_core::RecordError;
use log::warn;
use rusqlite::{Connection, Error as SqliteError, Transaction, ffi};
use serde::de::DeserializeOwned;
use thiserror::Error;

mod districts;
mod parks;
mod points;

pub use districts::{import_crime_stats, import_rent_prices};
pub use parks::import_parks;
pub use points::{import_hospitals, import_schools, import_transport_stops};

/// The six datasets handled by the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Public transport stops (`Haltestelle.json`).
    TransportStops,
    /// Parks and green areas (`parks.json`).
    Parks,
    /// Hospitals (`Krankenhaus.json`).
    Hospitals,
    /// Crime counts per district (`crimeStats2024.json`).
    CrimeStats,
    /// Schools (`Schulen.json`).
    Schools,
    /// Rent per square metre per district (`rentPrices.json`).
    RentPrices,
}

impl EntityKind {
    /// Order in which a full run imports the datasets.
    pub const IMPORT_ORDER: [Self; 6] = [
        Self::TransportStops,
        Self::Parks,
        Self::Hospitals,
        Self::CrimeStats,
        Self::Schools,
        Self::RentPrices,
    ];

    /// Target table.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::TransportStops => "transport_stops",
            Self::Parks => "parks",
            Self::Hospitals => "hospitals",
            Self::CrimeStats => "crime_stats",
            Self::Schools => "schools",
            Self::RentPrices => "rent_prices",
        }
    }

    /// Conventional input file name inside the data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::TransportStops => "Haltestelle.json",
            Self::Parks => "parks.json",
            Self::Hospitals => "Krankenhaus.json",
            Self::CrimeStats => "crimeStats2024.json",
            Self::Schools => "Schulen.json",
            Self::RentPrices => "rentPrices.json",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TransportStops => "transport stops",
            Self::Parks => "parks",
            Self::Hospitals => "hospitals",
            Self::CrimeStats => "crime stats",
            Self::Schools => "schools",
            Self::RentPrices => "rent prices",
        };
        f.write_str(label)
    }
}

/// Outcome of one importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityReport {
    /// Dataset that was imported.
    pub entity: EntityKind,
    /// Rows written to the entity table.
    pub rows_inserted: usize,
    /// Records ignored because their geometry type is not imported.
    pub features_skipped: usize,
}

impl EntityReport {
    pub(crate) const fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            rows_inserted: 0,
            features_skipped: 0,
        }
    }
}

/// Errors raised while importing a single dataset.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// Input file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The input file is not valid JSON of the expected shape.
    #[error("failed to parse JSON in {path}")]
    Parse {
        /// Input file.
        path: Utf8PathBuf,
        /// Source error returned by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// One record lacks a required field or holds a value of the wrong type.
    #[error("record {index} in {path} is malformed")]
    MalformedRecord {
        /// Input file.
        path: Utf8PathBuf,
        /// Zero-based position of the record in the file.
        index: usize,
        /// What is wrong with the record.
        #[source]
        source: RecordError,
    },
    /// A JSON column value could not be serialised.
    #[error("failed to serialise a JSON document for record {index} in {path}")]
    SerializeDocument {
        /// Input file.
        path: Utf8PathBuf,
        /// Zero-based position of the record in the file.
        index: usize,
        /// Source error returned by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A district already has a row in the target table.
    #[error("district {district:?} already exists in {table}")]
    DuplicateDistrict {
        /// Table holding the unique constraint.
        table: &'static str,
        /// District that collided.
        district: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Any other database failure.
    #[error("failed to {operation}")]
    Sqlite {
        /// Operation being attempted.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Read and deserialise a whole JSON input file.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, ImportError> {
    let contents = lifequal_fs::read_utf8_file(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ImportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Run `body` inside a fresh transaction, committing on success and rolling
/// back on failure.
pub(crate) fn in_transaction<F>(
    connection: &mut Connection,
    entity: EntityKind,
    body: F,
) -> Result<EntityReport, ImportError>
where
    F: FnOnce(&Transaction<'_>) -> Result<EntityReport, ImportError>,
{
    let transaction = connection.transaction().map_err(|source| ImportError::Sqlite {
        operation: "begin import transaction",
        source,
    })?;

    match body(&transaction) {
        Ok(report) => {
            transaction.commit().map_err(|source| ImportError::Sqlite {
                operation: "commit import transaction",
                source,
            })?;
            Ok(report)
        }
        Err(error) => {
            warn!("rolling back {entity} import: {error}");
            if let Err(rollback) = transaction.rollback() {
                warn!("rollback of {entity} import failed: {rollback}");
            }
            Err(error)
        }
    }
}

pub(crate) fn to_document<T: serde::Serialize>(
    value: &T,
    path: &Utf8Path,
    index: usize,
) -> Result<String, ImportError> {
    serde_json::to_string(value).map_err(|source| ImportError::SerializeDocument {
        path: path.to_path_buf(),
        index,
        source,
    })
}

pub(crate) fn malformed(path: &Utf8Path, index: usize) -> impl FnOnce(RecordError) -> ImportError {
    let path = path.to_path_buf();
    move |source| ImportError::MalformedRecord {
        path,
        index,
        source,
    }
}

pub(crate) fn is_unique_violation(error: &SqliteError) -> bool {
    matches!(
        error,
        SqliteError::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
