//! Filesystem helpers for the importer, built on `cap-std` and `camino`.
//!
//! Every entry point takes a UTF-8 path and resolves it against an ambient
//! directory handle. Relative paths are anchored at the working directory
//! first, so absolute and relative inputs (including `../` prefixes) behave
//! the same way.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Read};
use std::path::Component;

/// Open a UTF-8 file path using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole UTF-8 text file into memory.
///
/// Input datasets are small enough to be parsed in one piece, so callers
/// receive the full document rather than a reader.
pub fn read_utf8_file(path: &Utf8Path) -> io::Result<String> {
    let mut file = open_utf8_file(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Return whether `path` exists and is a directory.
pub fn dir_is_dir(path: &Utf8Path) -> io::Result<bool> {
    let (base, relative) = ambient_base(path)?;
    if relative.as_str().is_empty() {
        return Ok(true);
    }
    base.metadata(relative.as_str()).map(|meta| meta.is_dir())
}

/// Create the parent directory of `path` (and its ancestors) when missing.
///
/// Paths without a parent, or whose parent is the filesystem root, need no
/// work and return immediately.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base, relative) = ambient_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Split `path` into an opened ambient base directory and the remaining
/// relative suffix.
fn ambient_base(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let absolute = absolute_path(path)?;
    let mut components = absolute.as_std_path().components();
    let base = match components.next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            // A drive prefix is normally followed by the root separator.
            if matches!(components.clone().next(), Some(Component::RootDir)) {
                components.next();
            }
            Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => return Err(io::Error::other(format!("{absolute} is not absolute"))),
    };

    let relative = Utf8PathBuf::from_path_buf(components.as_path().to_path_buf())
        .map_err(|_| io::Error::other("non-UTF-8 path"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}

/// Anchor a relative path at the working directory, so `..` components may
/// climb above it without leaving the ambient root.
fn absolute_path(path: &Utf8Path) -> io::Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = Utf8PathBuf::from_path_buf(std::env::current_dir()?)
        .map_err(|_| io::Error::other("non-UTF-8 working directory"))?;
    Ok(cwd.join(path))
}
