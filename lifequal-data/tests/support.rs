use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Directory containing the sample LifeQual datasets.
pub fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/LifeQual")
}

/// Copy every sample dataset except `excluded` into a fresh temporary
/// directory, returning the guard and the copied data directory.
pub fn copy_fixtures(excluded: &[&str]) -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("failed to create temp dir: {err}"));
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("temp dir {path:?} is not UTF-8"));
    let data_dir = root.join("LifeQual");
    fs::create_dir(&data_dir).unwrap_or_else(|err| {
        panic!("failed to create {data_dir}: {err}");
    });
    let source = fixtures_dir();
    let entries = fs::read_dir(&source).unwrap_or_else(|err| {
        panic!("failed to list fixtures in {source}: {err}");
    });
    for entry in entries {
        let entry = entry.unwrap_or_else(|err| panic!("failed to read fixture entry: {err}"));
        let name = entry.file_name();
        let name = name.to_str().unwrap_or_else(|| panic!("non UTF-8 fixture name"));
        if excluded.contains(&name) {
            continue;
        }
        copy_file(&source.join(name), &data_dir.join(name));
    }
    (dir, data_dir)
}

fn copy_file(from: &Utf8Path, to: &Utf8Path) {
    fs::copy(from, to).unwrap_or_else(|err| {
        panic!("failed to copy fixture {from} to {to}: {err}");
    });
}
