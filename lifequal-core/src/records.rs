//! Records extracted from input documents, one type per target table shape.

use serde_json::Value;
use thiserror::Error;

use crate::geojson::{Feature, GeometryKind, Position, PropertyBag};

/// Year recorded for crime statistics that do not state one.
pub const DEFAULT_CRIME_YEAR: i64 = 2024;

/// Reasons a single input record cannot be turned into a row.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The feature carries no geometry.
    #[error("feature has no geometry")]
    MissingGeometry,
    /// The coordinates do not lead to a numeric `[longitude, latitude]` pair.
    #[error("{kind} geometry does not contain a [longitude, latitude] position")]
    InvalidPosition {
        /// Declared GeoJSON geometry type.
        kind: String,
    },
    /// The record is not a JSON object.
    #[error("record is not a JSON object")]
    NotAnObject,
    /// A required field is absent.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
    /// A field holds a value of the wrong type.
    #[error("field `{field}` must be {expected}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of the accepted values.
        expected: &'static str,
    },
}

/// A named point feature: transport stop, hospital, or school.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    /// Display name, empty when the source has none.
    pub name: String,
    /// Source position.
    pub location: Position,
    /// Every source property, including the name.
    pub properties: PropertyBag,
}

impl PointRecord {
    /// Build a record from a point feature, reading the name from `name_key`.
    ///
    /// # Examples
    /// ```
    /// use lifequal_core::{Feature, PointRecord};
    ///
    /// let feature: Feature = serde_json::from_str(
    ///     r#"{"geometry": {"type": "Point", "coordinates": [13.41, 52.52]},
    ///         "properties": {"name": "Alexanderplatz", "lines": ["U2", "U5"]}}"#,
    /// )
    /// .expect("valid feature");
    /// let record = PointRecord::from_feature(&feature, "name").expect("valid record");
    /// assert_eq!(record.name, "Alexanderplatz");
    /// assert_eq!((record.location.x, record.location.y), (13.41, 52.52));
    /// ```
    pub fn from_feature(feature: &Feature, name_key: &str) -> Result<Self, RecordError> {
        let location = feature.require_geometry()?.point_position()?;
        Ok(Self {
            name: feature.string_property(name_key),
            location,
            properties: feature.properties_or_empty(),
        })
    }
}

/// A park or green area.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkRecord {
    /// Display name taken from `ANL_NAME`, empty when absent.
    pub name: String,
    /// Representative point: the position itself, or the first vertex.
    pub location: Position,
    /// Full polygon coordinate nesting for polygonal parks.
    pub polygon_coordinates: Option<Value>,
    /// Every source property.
    pub properties: PropertyBag,
}

impl ParkRecord {
    /// Property key holding a park's name.
    pub const NAME_KEY: &'static str = "ANL_NAME";

    /// Build a record from a park feature.
    ///
    /// Returns `Ok(None)` for geometry types other than `Point`, `Polygon`
    /// and `MultiPolygon`; such features are skipped rather than rejected.
    pub fn from_feature(feature: &Feature) -> Result<Option<Self>, RecordError> {
        let geometry = feature.require_geometry()?;
        let Some(location) = geometry.representative_point()? else {
            return Ok(None);
        };
        let polygon_coordinates = match geometry.kind {
            GeometryKind::Polygon | GeometryKind::MultiPolygon => {
                Some(geometry.coordinates.clone())
            }
            GeometryKind::Point | GeometryKind::Other(_) => None,
        };
        Ok(Some(Self {
            name: feature.string_property(Self::NAME_KEY),
            location,
            polygon_coordinates,
            properties: feature.properties_or_empty(),
        }))
    }
}

/// Reported crime count for a district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrimeStat {
    /// District name; unique within the table.
    pub district: String,
    /// Number of recorded crimes.
    pub crimes: i64,
    /// Reporting year.
    pub year: i64,
}

impl CrimeStat {
    /// Build a record from one element of the crime statistics array.
    ///
    /// `district` and `crimes` are required; a missing or `null` `year`
    /// falls back to [`DEFAULT_CRIME_YEAR`].
    ///
    /// # Examples
    /// ```
    /// use lifequal_core::{CrimeStat, DEFAULT_CRIME_YEAR};
    /// use serde_json::json;
    ///
    /// let stat = CrimeStat::from_value(&json!({"district": "Mitte", "crimes": 120}))
    ///     .expect("valid record");
    /// assert_eq!(stat.year, DEFAULT_CRIME_YEAR);
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let record = value.as_object().ok_or(RecordError::NotAnObject)?;
        let district = match record.get("district") {
            None => return Err(RecordError::MissingField { field: "district" }),
            Some(Value::String(district)) => district.clone(),
            Some(_) => {
                return Err(RecordError::InvalidField {
                    field: "district",
                    expected: "a string",
                });
            }
        };
        let crimes = match record.get("crimes") {
            None => return Err(RecordError::MissingField { field: "crimes" }),
            Some(crimes) => crimes.as_i64().ok_or(RecordError::InvalidField {
                field: "crimes",
                expected: "an integer",
            })?,
        };
        let year = match record.get("year") {
            None | Some(Value::Null) => DEFAULT_CRIME_YEAR,
            Some(year) => year.as_i64().ok_or(RecordError::InvalidField {
                field: "year",
                expected: "an integer",
            })?,
        };
        Ok(Self {
            district,
            crimes,
            year,
        })
    }
}

/// Average rent for a district.
#[derive(Debug, Clone, PartialEq)]
pub struct RentPrice {
    /// District name; unique within the table.
    pub district: String,
    /// Price per square metre.
    pub price_per_sqm: f64,
}

impl RentPrice {
    /// Build a record from one `district: price` entry of the rent mapping.
    pub fn from_entry(district: &str, price: &Value) -> Result<Self, RecordError> {
        let price_per_sqm = price.as_f64().ok_or(RecordError::InvalidField {
            field: "price",
            expected: "a number",
        })?;
        Ok(Self {
            district: district.to_owned(),
            price_per_sqm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn feature(value: Value) -> Feature {
        serde_json::from_value(value).expect("valid feature")
    }

    #[rstest]
    fn point_record_defaults_missing_name() {
        let record = PointRecord::from_feature(
            &feature(json!({
                "geometry": {"type": "Point", "coordinates": [13.0, 52.0]},
                "properties": {"operator": "BVG"}
            })),
            "name",
        )
        .expect("valid record");
        assert_eq!(record.name, "");
        assert_eq!(record.properties.get("operator"), Some(&json!("BVG")));
    }

    #[rstest]
    fn point_record_requires_geometry() {
        let err = PointRecord::from_feature(
            &feature(json!({"geometry": null, "properties": {}})),
            "name",
        )
        .expect_err("geometry is required");
        assert_eq!(err, RecordError::MissingGeometry);
    }

    #[rstest]
    fn point_record_rejects_polygon_coordinates() {
        let err = PointRecord::from_feature(
            &feature(json!({
                "geometry": {"type": "Polygon", "coordinates": [[[13.0, 52.0]]]},
                "properties": {}
            })),
            "name",
        )
        .expect_err("polygon coordinates are not a position");
        assert!(matches!(err, RecordError::InvalidPosition { .. }));
    }

    #[rstest]
    fn park_polygon_keeps_coordinates_verbatim() {
        let rings = json!([[[13.35, 52.51], [13.36, 52.52], [13.35, 52.51]]]);
        let record = ParkRecord::from_feature(&feature(json!({
            "geometry": {"type": "Polygon", "coordinates": rings.clone()},
            "properties": {"ANL_NAME": "Tiergarten"}
        })))
        .expect("valid record")
        .expect("polygon parks are imported");
        assert_eq!(record.name, "Tiergarten");
        assert_eq!((record.location.x, record.location.y), (13.35, 52.51));
        assert_eq!(record.polygon_coordinates, Some(rings));
    }

    #[rstest]
    fn park_point_has_no_polygon() {
        let record = ParkRecord::from_feature(&feature(json!({
            "geometry": {"type": "Point", "coordinates": [13.0, 52.0]},
            "properties": {"name": "ignored"}
        })))
        .expect("valid record")
        .expect("point parks are imported");
        assert_eq!(record.name, "", "parks read ANL_NAME, not name");
        assert_eq!(record.polygon_coordinates, None);
    }

    #[rstest]
    fn park_line_string_is_skipped() {
        let outcome = ParkRecord::from_feature(&feature(json!({
            "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]},
            "properties": {"ANL_NAME": "Mauerweg"}
        })))
        .expect("unsupported geometry is not an error");
        assert_eq!(outcome, None);
    }

    #[rstest]
    #[case(json!({"district": "Mitte", "crimes": 120, "year": 2023}), 2023)]
    #[case(json!({"district": "Mitte", "crimes": 120}), DEFAULT_CRIME_YEAR)]
    #[case(json!({"district": "Mitte", "crimes": 120, "year": null}), DEFAULT_CRIME_YEAR)]
    fn crime_stat_year(#[case] value: Value, #[case] expected: i64) {
        let stat = CrimeStat::from_value(&value).expect("valid record");
        assert_eq!(stat.district, "Mitte");
        assert_eq!(stat.crimes, 120);
        assert_eq!(stat.year, expected);
    }

    #[rstest]
    #[case(json!({"crimes": 1}), RecordError::MissingField { field: "district" })]
    #[case(json!({"district": "Mitte"}), RecordError::MissingField { field: "crimes" })]
    #[case(
        json!({"district": "Mitte", "crimes": "many"}),
        RecordError::InvalidField { field: "crimes", expected: "an integer" }
    )]
    #[case(
        json!({"district": 7, "crimes": 1}),
        RecordError::InvalidField { field: "district", expected: "a string" }
    )]
    #[case(json!(["Mitte", 120]), RecordError::NotAnObject)]
    fn crime_stat_rejects_malformed_records(#[case] value: Value, #[case] expected: RecordError) {
        assert_eq!(CrimeStat::from_value(&value), Err(expected));
    }

    #[rstest]
    fn rent_price_requires_number() {
        assert_eq!(
            RentPrice::from_entry("Mitte", &json!(14.5)),
            Ok(RentPrice {
                district: "Mitte".into(),
                price_per_sqm: 14.5,
            })
        );
        assert!(RentPrice::from_entry("Mitte", &json!("14.5")).is_err());
    }
}
