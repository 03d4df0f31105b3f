//! Minimal GeoJSON model for the importer's input files.
//!
//! Only the parts of a `FeatureCollection` that the importer reads are typed:
//! the geometry type, the raw coordinate nesting, and the property bag.
//! Coordinates stay as raw JSON so polygon nestings can be stored verbatim.

use geo::Coord;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::records::RecordError;

/// Open-ended feature attributes, kept in source key order.
pub type PropertyBag = Map<String, Value>;

/// A WGS84 position with `x = longitude` and `y = latitude`.
pub type Position = Coord<f64>;

/// A GeoJSON `FeatureCollection`.
///
/// # Examples
/// ```
/// use lifequal_core::FeatureCollection;
///
/// let collection: FeatureCollection = serde_json::from_str(
///     r#"{"type": "FeatureCollection", "features": [
///         {"type": "Feature",
///          "geometry": {"type": "Point", "coordinates": [13.4, 52.5]},
///          "properties": {"name": "Alexanderplatz"}}
///     ]}"#,
/// )
/// .expect("valid collection");
/// assert_eq!(collection.features.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureCollection {
    /// Features in document order.
    pub features: Vec<Feature>,
}

/// A single GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    /// Feature geometry; `null` or absent geometries deserialize to `None`.
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Feature attributes; `null` or absent properties deserialize to `None`.
    #[serde(default)]
    pub properties: Option<PropertyBag>,
}

impl Feature {
    /// Return the property bag, or an empty bag when the feature has none.
    #[must_use]
    pub fn properties_or_empty(&self) -> PropertyBag {
        self.properties.clone().unwrap_or_default()
    }

    /// Read a string property, returning an empty string when the key is
    /// absent or does not hold a string.
    #[must_use]
    pub fn string_property(&self, key: &str) -> String {
        self.properties
            .as_ref()
            .and_then(|bag| bag.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_default()
    }

    /// Borrow the geometry, failing when the feature has none.
    pub fn require_geometry(&self) -> Result<&Geometry, RecordError> {
        self.geometry.as_ref().ok_or(RecordError::MissingGeometry)
    }
}

/// The geometry types the importer distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryKind {
    /// A single position.
    Point,
    /// A list of linear rings.
    Polygon,
    /// A list of polygons.
    MultiPolygon,
    /// Any other GeoJSON geometry type, by name.
    Other(String),
}

impl GeometryKind {
    fn from_name(name: &str) -> Self {
        match name {
            "Point" => Self::Point,
            "Polygon" => Self::Polygon,
            "MultiPolygon" => Self::MultiPolygon,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The GeoJSON type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Point => "Point",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
            Self::Other(name) => name,
        }
    }

    /// Array depth between `coordinates` and the first position, or `None`
    /// for kinds without a representative point.
    const fn position_depth(&self) -> Option<usize> {
        match self {
            Self::Point => Some(0),
            Self::Polygon => Some(2),
            Self::MultiPolygon => Some(3),
            Self::Other(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

impl From<RawGeometry> for Geometry {
    fn from(raw: RawGeometry) -> Self {
        Self {
            kind: GeometryKind::from_name(&raw.kind),
            coordinates: raw.coordinates,
        }
    }
}

/// A GeoJSON geometry with its coordinates kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawGeometry")]
pub struct Geometry {
    /// Declared geometry type.
    pub kind: GeometryKind,
    /// Coordinate nesting exactly as found in the source document.
    pub coordinates: Value,
}

impl Geometry {
    /// Read `coordinates` as a single `[longitude, latitude]` position,
    /// regardless of the declared type.
    pub fn point_position(&self) -> Result<Position, RecordError> {
        self.first_position_at(0)
    }

    /// The first vertex of the geometry, used as its representative point.
    ///
    /// Points yield their own position, polygons the first vertex of their
    /// first ring, and multi-polygons the first vertex of the first ring of
    /// their first polygon. Other geometry types yield `Ok(None)`.
    ///
    /// # Examples
    /// ```
    /// use lifequal_core::{Geometry, GeometryKind};
    /// use serde_json::json;
    ///
    /// let geometry = Geometry {
    ///     kind: GeometryKind::Polygon,
    ///     coordinates: json!([[[13.1, 52.1], [13.2, 52.2], [13.1, 52.1]]]),
    /// };
    /// let point = geometry.representative_point().expect("valid polygon");
    /// assert_eq!(point.map(|p| (p.x, p.y)), Some((13.1, 52.1)));
    /// ```
    pub fn representative_point(&self) -> Result<Option<Position>, RecordError> {
        self.kind
            .position_depth()
            .map(|depth| self.first_position_at(depth))
            .transpose()
    }

    fn first_position_at(&self, depth: usize) -> Result<Position, RecordError> {
        let mut current = &self.coordinates;
        for _ in 0..depth {
            current = current
                .as_array()
                .and_then(|items| items.first())
                .ok_or_else(|| self.invalid_position())?;
        }
        position_from_value(current).ok_or_else(|| self.invalid_position())
    }

    fn invalid_position(&self) -> RecordError {
        RecordError::InvalidPosition {
            kind: self.kind.name().to_owned(),
        }
    }
}

/// Interpret a JSON value as `[longitude, latitude, ...]`. Extra ordinates
/// such as altitude are ignored.
fn position_from_value(value: &Value) -> Option<Position> {
    let items = value.as_array()?;
    let x = items.first()?.as_f64()?;
    let y = items.get(1)?.as_f64()?;
    Some(Coord { x, y })
}
