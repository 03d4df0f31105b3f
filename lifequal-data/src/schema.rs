//! Schema initialisation: entity tables and their R\*Tree spatial indexes.
#![forbid(unsafe_code)]

use rusqlite::{Connection, Error as SqliteError, Transaction};
use thiserror::Error;

/// Create the importer's tables and spatial indexes when they are missing.
///
/// Every statement is `IF NOT EXISTS`, so calling this on an initialised
/// database is a no-op. Existing tables are never altered. The DDL runs in a
/// single transaction that is committed before returning.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use lifequal_data::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
/// initialise_schema(&mut conn).expect("schema creation is repeatable");
///
/// let tables: i64 = conn
///     .query_row(
///         "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'crime_stats'",
///         [],
///         |row| row.get(0),
///     )
///     .expect("inspect schema");
/// assert_eq!(tables, 1);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    ensure_spatial_module(connection)?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_point_tables(&transaction)?;
    create_district_tables(&transaction)?;
    create_spatial_indexes(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn ensure_spatial_module(connection: &Connection) -> Result<(), SchemaError> {
    let available: bool = connection
        .query_row(
            "SELECT sqlite_compileoption_used('ENABLE_RTREE')",
            [],
            |row| row.get(0),
        )
        .map_err(|source| SchemaError::Migration {
            step: "check R*Tree module",
            source,
        })?;
    if available {
        Ok(())
    } else {
        Err(SchemaError::SpatialModuleUnavailable)
    }
}

fn create_point_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_step(
        transaction,
        "create transport_stops",
        "CREATE TABLE IF NOT EXISTS transport_stops (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            lon REAL NOT NULL,
            lat REAL NOT NULL,
            properties TEXT NOT NULL CHECK (json_valid(properties))
        )",
    )?;
    run_step(
        transaction,
        "create parks",
        "CREATE TABLE IF NOT EXISTS parks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            lon REAL NOT NULL,
            lat REAL NOT NULL,
            polygon_coordinates TEXT CHECK (
                polygon_coordinates IS NULL OR json_valid(polygon_coordinates)
            ),
            properties TEXT NOT NULL CHECK (json_valid(properties))
        )",
    )?;
    run_step(
        transaction,
        "create hospitals",
        "CREATE TABLE IF NOT EXISTS hospitals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            lon REAL NOT NULL,
            lat REAL NOT NULL,
            properties TEXT NOT NULL CHECK (json_valid(properties))
        )",
    )?;
    run_step(
        transaction,
        "create schools",
        "CREATE TABLE IF NOT EXISTS schools (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            lon REAL NOT NULL,
            lat REAL NOT NULL,
            properties TEXT NOT NULL CHECK (json_valid(properties))
        )",
    )
}

fn create_district_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_step(
        transaction,
        "create crime_stats",
        "CREATE TABLE IF NOT EXISTS crime_stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            district TEXT NOT NULL UNIQUE,
            crimes INTEGER NOT NULL,
            year INTEGER NOT NULL
        )",
    )?;
    run_step(
        transaction,
        "create rent_prices",
        "CREATE TABLE IF NOT EXISTS rent_prices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            district TEXT NOT NULL UNIQUE,
            price_per_sqm REAL NOT NULL
        )",
    )
}

fn create_spatial_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_step(
        transaction,
        "index transport_stops",
        "CREATE VIRTUAL TABLE IF NOT EXISTS transport_stops_rtree
            USING rtree(id, min_lon, max_lon, min_lat, max_lat)",
    )?;
    run_step(
        transaction,
        "index parks",
        "CREATE VIRTUAL TABLE IF NOT EXISTS parks_rtree
            USING rtree(id, min_lon, max_lon, min_lat, max_lat)",
    )?;
    run_step(
        transaction,
        "index hospitals",
        "CREATE VIRTUAL TABLE IF NOT EXISTS hospitals_rtree
            USING rtree(id, min_lon, max_lon, min_lat, max_lat)",
    )?;
    run_step(
        transaction,
        "index schools",
        "CREATE VIRTUAL TABLE IF NOT EXISTS schools_rtree
            USING rtree(id, min_lon, max_lon, min_lat, max_lat)",
    )
}

fn run_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised when initialising the importer schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The SQLite library lacks the R\*Tree module used for spatial indexes.
    #[error("the linked SQLite library was built without the R*Tree module")]
    SpatialModuleUnavailable,
    /// A DDL statement failed.
    #[error("failed to execute schema step '{step}'")]
    Migration {
        /// Schema step that failed.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}
