//! Test helpers for building sample data directories and layered overrides.

use super::*;
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Clone, Default)]
pub(super) struct LayerOverrides {
    pub(super) data_dir: Option<Utf8PathBuf>,
    pub(super) database: Option<Utf8PathBuf>,
}

/// A temporary directory holding one small sample of every dataset.
#[derive(Debug)]
pub(super) struct DataDirectory {
    _dir: TempDir,
    root: Utf8PathBuf,
    data_dir: Utf8PathBuf,
}

impl DataDirectory {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        let data_dir = root.join(DEFAULT_DATA_DIR);
        fs::create_dir(&data_dir).expect("create data dir");
        for (name, document) in sample_datasets() {
            fs::write(data_dir.join(name), document.to_string()).expect("write dataset file");
        }
        Self {
            _dir: dir,
            root,
            data_dir,
        }
    }

    pub(super) fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("out").join(DEFAULT_DATABASE)
    }

    pub(super) fn config_database(&self) -> Utf8PathBuf {
        self.root.join("config.db")
    }

    pub(super) fn env_database(&self) -> Utf8PathBuf {
        self.root.join("env.db")
    }

    pub(super) fn missing_dir(&self) -> Utf8PathBuf {
        self.root.join("absent")
    }
}

fn point(lon: f64, lat: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [lon, lat]},
        "properties": properties
    })
}

fn collection(features: Vec<Value>) -> Value {
    json!({"type": "FeatureCollection", "features": features})
}

fn sample_datasets() -> [(&'static str, Value); 6] {
    [
        (
            "Haltestelle.json",
            collection(vec![
                point(13.4132, 52.5219, json!({"name": "S+U Alexanderplatz"})),
                point(13.3777, 52.5163, json!({"name": "Brandenburger Tor"})),
            ]),
        ),
        (
            "parks.json",
            collection(vec![
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[13.34, 52.51], [13.37, 52.51], [13.35, 52.52], [13.34, 52.51]]]
                    },
                    "properties": {"ANL_NAME": "Großer Tiergarten"}
                }),
                json!({
                    "type": "Feature",
                    "geometry": {"type": "LineString", "coordinates": [[13.40, 52.53], [13.41, 52.54]]},
                    "properties": {"ANL_NAME": "Mauerweg"}
                }),
            ]),
        ),
        (
            "Krankenhaus.json",
            collection(vec![point(13.3766, 52.5260, json!({"name": "Charité Mitte"}))]),
        ),
        (
            "crimeStats2024.json",
            json!([
                {"district": "Mitte", "crimes": 120, "year": 2023},
                {"district": "Pankow", "crimes": 85}
            ]),
        ),
        (
            "Schulen.json",
            collection(vec![point(13.4050, 52.5400, json!({"name": "Schule am Arkonaplatz"}))]),
        ),
        ("rentPrices.json", json!({"Mitte": 16.5, "Pankow": 13.1})),
    ]
}

/// Resolve `cli_args` over the file and environment layers, highest
/// precedence last: file, then environment, then CLI.
pub(super) fn merge_layers(
    mut cli_args: ImportArgs,
    file_layer: Option<LayerOverrides>,
    env_layer: Option<LayerOverrides>,
) -> Result<ImportConfig, CliError> {
    let layered = [file_layer, env_layer]
        .into_iter()
        .flatten()
        .fold(LayerOverrides::default(), |below, above| LayerOverrides {
            data_dir: above.data_dir.or(below.data_dir),
            database: above.database.or(below.database),
        });
    cli_args.data_dir = cli_args.data_dir.or(layered.data_dir);
    cli_args.database = cli_args.database.or(layered.database);
    cli_args.into_config()
}
