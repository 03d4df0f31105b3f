//! Core domain types for the LifeQual importer.
//!
//! The crate models the input documents (GeoJSON feature collections and the
//! flat district datasets) and the records extracted from them. It performs
//! no I/O: reading files and writing rows live in `lifequal-data`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod geojson;
pub mod records;

pub use geojson::{Feature, FeatureCollection, Geometry, GeometryKind, Position, PropertyBag};
pub use records::{
    CrimeStat, DEFAULT_CRIME_YEAR, ParkRecord, PointRecord, RecordError, RentPrice,
};
