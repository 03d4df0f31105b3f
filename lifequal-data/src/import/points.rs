//! Importers for plain point datasets: transport stops, hospitals, schools.

use camino::Utf8Path;
use lifequal_core::{FeatureCollection, PointRecord, Position};
use rusqlite::{Connection, Transaction};

use super::{
    EntityKind, EntityReport, ImportError, in_transaction, malformed, read_document, to_document,
};

/// Where a point dataset is stored and which property holds its name.
struct PointTable {
    entity: EntityKind,
    name_key: &'static str,
}

const TRANSPORT_STOPS: PointTable = PointTable {
    entity: EntityKind::TransportStops,
    name_key: "name",
};

const HOSPITALS: PointTable = PointTable {
    entity: EntityKind::Hospitals,
    name_key: "name",
};

const SCHOOLS: PointTable = PointTable {
    entity: EntityKind::Schools,
    name_key: "name",
};

/// Import a GeoJSON `FeatureCollection` of transport stops.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use rusqlite::Connection;
/// use lifequal_data::{import_transport_stops, initialise_schema};
///
/// let dir = tempfile::tempdir().expect("create temp dir");
/// let path = Utf8PathBuf::from_path_buf(dir.path().join("Haltestelle.json"))
///     .expect("utf-8 path");
/// std::fs::write(
///     &path,
///     r#"{"type": "FeatureCollection", "features": [
///         {"type": "Feature",
///          "geometry": {"type": "Point", "coordinates": [13.41, 52.52]},
///          "properties": {"name": "Alexanderplatz"}}
///     ]}"#,
/// )
/// .expect("write input");
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
/// let report = import_transport_stops(&mut conn, &path).expect("import stops");
/// assert_eq!(report.rows_inserted, 1);
/// ```
pub fn import_transport_stops(
    connection: &mut Connection,
    path: &Utf8Path,
) -> Result<EntityReport, ImportError> {
    import_point_features(connection, path, &TRANSPORT_STOPS)
}

/// Import a GeoJSON `FeatureCollection` of hospitals.
pub fn import_hospitals(
    connection: &mut Connection,
    path: &Utf8Path,
) -> Result<EntityReport, ImportError> {
    import_point_features(connection, path, &HOSPITALS)
}

/// Import a GeoJSON `FeatureCollection` of schools.
pub fn import_schools(
    connection: &mut Connection,
    path: &Utf8Path,
) -> Result<EntityReport, ImportError> {
    import_point_features(connection, path, &SCHOOLS)
}

fn import_point_features(
    connection: &mut Connection,
    path: &Utf8Path,
    table: &PointTable,
) -> Result<EntityReport, ImportError> {
    let collection: FeatureCollection = read_document(path)?;
    let table_name = table.entity.table();

    in_transaction(connection, table.entity, |transaction| {
        let mut insert_row = transaction
            .prepare_cached(&format!(
                "INSERT INTO {table_name} (name, lon, lat, properties) VALUES (?1, ?2, ?3, ?4)"
            ))
            .map_err(|source| ImportError::Sqlite {
                operation: "prepare point insert",
                source,
            })?;

        let mut report = EntityReport::new(table.entity);
        for (index, feature) in collection.features.iter().enumerate() {
            let record =
                PointRecord::from_feature(feature, table.name_key).map_err(malformed(path, index))?;
            let properties = to_document(&record.properties, path, index)?;
            let id = insert_row
                .insert((
                    record.name.as_str(),
                    record.location.x,
                    record.location.y,
                    properties.as_str(),
                ))
                .map_err(|source| ImportError::Sqlite {
                    operation: "insert point row",
                    source,
                })?;
            index_location(transaction, table_name, id, record.location)?;
            report.rows_inserted += 1;
        }
        Ok(report)
    })
}

/// Record `location` as a degenerate box in the table's R\*Tree index.
pub(super) fn index_location(
    transaction: &Transaction<'_>,
    table_name: &str,
    id: i64,
    location: Position,
) -> Result<(), ImportError> {
    transaction
        .prepare_cached(&format!(
            "INSERT INTO {table_name}_rtree (id, min_lon, max_lon, min_lat, max_lat)
                VALUES (?1, ?2, ?2, ?3, ?3)"
        ))
        .and_then(|mut statement| statement.execute((id, location.x, location.y)))
        .map(|_| ())
        .map_err(|source| ImportError::Sqlite {
            operation: "update spatial index",
            source,
        })
}
