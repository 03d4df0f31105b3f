//! SQLite persistence for the LifeQual importer.
//!
//! Responsibilities:
//! - Materialise the schema: one table per entity plus R\*Tree spatial
//!   indexes for the point-bearing tables.
//! - Read each input file, turn its records into rows, and insert them inside
//!   one transaction per file.
//! - Sequence a full run over a data directory and report what was written.
//!
//! Boundaries:
//! - Record extraction rules live in `lifequal-core`.
//! - Imports only ever insert; re-running a run duplicates point rows and
//!   fails on district tables.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod import;
pub mod pipeline;
pub mod schema;

pub use import::{
    EntityKind, EntityReport, ImportError, import_crime_stats, import_hospitals, import_parks,
    import_rent_prices, import_schools, import_transport_stops,
};
pub use pipeline::{ImportReport, RunError, import_all, run_import};
pub use schema::{SchemaError, initialise_schema};
