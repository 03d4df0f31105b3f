//! Facade crate for the LifeQual importer.
//!
//! Re-exports the record types and the import entry points so callers can
//! depend on a single crate.

#![forbid(unsafe_code)]

pub use lifequal_core::{
    CrimeStat, DEFAULT_CRIME_YEAR, Feature, FeatureCollection, Geometry, GeometryKind,
    ParkRecord, PointRecord, Position, PropertyBag, RecordError, RentPrice,
};
pub use lifequal_data::{
    EntityKind, EntityReport, ImportError, ImportReport, RunError, SchemaError, import_all,
    import_crime_stats, import_hospitals, import_parks, import_rent_prices, import_schools,
    import_transport_stops, initialise_schema, run_import,
};
