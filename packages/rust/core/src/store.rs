//! JSON stage files.
//!
//! Each stage reads the previous stage's file and writes its own as a
//! pretty-printed JSON array. Writes go to a sibling `.tmp` file that is
//! renamed into place, so a failed run never leaves a truncated output.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use vtdex_shared::{Result, VtdexError};

/// Read a stage file as a list of records.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path).map_err(|e| VtdexError::io(path, e))?;
    let records: Vec<T> =
        serde_json::from_str(&content).map_err(|e| VtdexError::serialization(path, e))?;

    debug!(path = %path.display(), records = records.len(), "read stage file");
    Ok(records)
}

/// Replace the stage file at `path` with `records`.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json =
        serde_json::to_string_pretty(records).map_err(|e| VtdexError::serialization(path, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| VtdexError::io(parent, e))?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, json).map_err(|e| VtdexError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| VtdexError::io(path, e))?;

    info!(path = %path.display(), records = records.len(), "wrote stage file");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
