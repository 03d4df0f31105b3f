//! Importer for parks and green areas.

use camino::Utf8Path;
use lifequal_core::{FeatureCollection, ParkRecord};
use log::debug;
use rusqlite::Connection;

use super::points::index_location;
use super::{
    EntityKind, EntityReport, ImportError, in_transaction, malformed, read_document, to_document,
};

/// Import a GeoJSON `FeatureCollection` of parks.
///
/// Point parks are stored as-is. Polygon and multi-polygon parks are stored
/// with their first vertex as the representative point and their complete
/// coordinate nesting in `polygon_coordinates`. Features with any other
/// geometry type are counted as skipped and produce no row.
pub fn import_parks(
    connection: &mut Connection,
    path: &Utf8Path,
) -> Result<EntityReport, ImportError> {
    let collection: FeatureCollection = read_document(path)?;
    let entity = EntityKind::Parks;

    in_transaction(connection, entity, |transaction| {
        let mut insert_row = transaction
            .prepare_cached(
                "INSERT INTO parks (name, lon, lat, polygon_coordinates, properties)
                    VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .map_err(|source| ImportError::Sqlite {
                operation: "prepare park insert",
                source,
            })?;

        let mut report = EntityReport::new(entity);
        for (index, feature) in collection.features.iter().enumerate() {
            let Some(record) = ParkRecord::from_feature(feature).map_err(malformed(path, index))?
            else {
                let kind = feature
                    .geometry
                    .as_ref()
                    .map_or("unknown", |geometry| geometry.kind.name());
                debug!("skipping park feature {index} in {path}: {kind} geometry is not imported");
                report.features_skipped += 1;
                continue;
            };
            let properties = to_document(&record.properties, path, index)?;
            let polygon = record
                .polygon_coordinates
                .as_ref()
                .map(|coordinates| to_document(coordinates, path, index))
                .transpose()?;
            let id = insert_row
                .insert((
                    record.name.as_str(),
                    record.location.x,
                    record.location.y,
                    polygon.as_deref(),
                    properties.as_str(),
                ))
                .map_err(|source| ImportError::Sqlite {
                    operation: "insert park row",
                    source,
                })?;
            index_location(transaction, entity.table(), id, record.location)?;
            report.rows_inserted += 1;
        }
        Ok(report)
    })
}
