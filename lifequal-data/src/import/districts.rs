//! Importers for the per-district datasets: crime statistics and rent prices.

use camino::Utf8Path;
use lifequal_core::{CrimeStat, PropertyBag, RentPrice};
use rusqlite::{Connection, Error as SqliteError};
use serde_json::Value;

use super::{
    EntityKind, EntityReport, ImportError, in_transaction, is_unique_violation, malformed,
    read_document,
};

/// Import the crime statistics array.
///
/// Each element needs `district` and `crimes`; `year` defaults to
/// [`lifequal_core::DEFAULT_CRIME_YEAR`]. A district that already exists in
/// `crime_stats` fails the import with [`ImportError::DuplicateDistrict`].
pub fn import_crime_stats(
    connection: &mut Connection,
    path: &Utf8Path,
) -> Result<EntityReport, ImportError> {
    let records: Vec<Value> = read_document(path)?;
    let entity = EntityKind::CrimeStats;

    in_transaction(connection, entity, |transaction| {
        let mut insert_row = transaction
            .prepare_cached("INSERT INTO crime_stats (district, crimes, year) VALUES (?1, ?2, ?3)")
            .map_err(|source| ImportError::Sqlite {
                operation: "prepare crime stat insert",
                source,
            })?;

        let mut report = EntityReport::new(entity);
        for (index, value) in records.iter().enumerate() {
            let stat = CrimeStat::from_value(value).map_err(malformed(path, index))?;
            insert_row
                .execute((stat.district.as_str(), stat.crimes, stat.year))
                .map_err(|source| district_error(entity, &stat.district, source))?;
            report.rows_inserted += 1;
        }
        Ok(report)
    })
}

/// Import the `district -> price per square metre` mapping.
///
/// Entries are inserted in file order and prices are rounded to cents.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use rusqlite::Connection;
/// use lifequal_data::{import_rent_prices, initialise_schema};
///
/// let dir = tempfile::tempdir().expect("create temp dir");
/// let path = Utf8PathBuf::from_path_buf(dir.path().join("rentPrices.json"))
///     .expect("utf-8 path");
/// std::fs::write(&path, r#"{"Mitte": 15.456, "Pankow": 12}"#).expect("write input");
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
/// import_rent_prices(&mut conn, &path).expect("import rent prices");
///
/// let price: f64 = conn
///     .query_row(
///         "SELECT price_per_sqm FROM rent_prices WHERE district = 'Mitte'",
///         [],
///         |row| row.get(0),
///     )
///     .expect("read price");
/// assert_eq!(price, 15.46);
/// ```
pub fn import_rent_prices(
    connection: &mut Connection,
    path: &Utf8Path,
) -> Result<EntityReport, ImportError> {
    let prices: PropertyBag = read_document(path)?;
    let entity = EntityKind::RentPrices;

    in_transaction(connection, entity, |transaction| {
        let mut insert_row = transaction
            .prepare_cached(
                "INSERT INTO rent_prices (district, price_per_sqm) VALUES (?1, round(?2, 2))",
            )
            .map_err(|source| ImportError::Sqlite {
                operation: "prepare rent price insert",
                source,
            })?;

        let mut report = EntityReport::new(entity);
        for (index, (district, price)) in prices.iter().enumerate() {
            let rent = RentPrice::from_entry(district, price).map_err(malformed(path, index))?;
            insert_row
                .execute((rent.district.as_str(), rent.price_per_sqm))
                .map_err(|source| district_error(entity, &rent.district, source))?;
            report.rows_inserted += 1;
        }
        Ok(report)
    })
}

fn district_error(entity: EntityKind, district: &str, source: SqliteError) -> ImportError {
    if is_unique_violation(&source) {
        ImportError::DuplicateDistrict {
            table: entity.table(),
            district: district.to_owned(),
            source,
        }
    } else {
        ImportError::Sqlite {
            operation: "insert district row",
            source,
        }
    }
}
