//! YAML file helpers
//!
//! Parse errors carry the path of the file that failed. A missing file comes
//! back as [`Error::Io`] with `NotFound` kind so callers can map it to their
//! own not-found variant.

use std::fs;

use camino::Utf8Path;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Read and deserialize a YAML file
pub fn read_yaml_file<T: DeserializeOwned>(path: &Utf8Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    serde_yaml_ng::from_str(&content).map_err(|e| Error::parse(path.as_str(), e))
}

/// Serialize a value and write it to `path`, replacing any existing file
pub fn write_yaml_file<T: Serialize>(value: &T, path: &Utf8Path) -> Result<()> {
    let content = serde_yaml_ng::to_string(value)?;
    fs::write(path, content)?;
    Ok(())
}

/// Render a value as a YAML string
pub fn render_yaml<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_yaml_ng::to_string(value)?)
}

/// Map a `NotFound` I/O error through `not_found`, leave everything else alone
pub(crate) fn map_not_found(err: Error, not_found: impl FnOnce() -> Error) -> Error {
    match err {
        Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound => not_found(),
        other => other,
    }
}
