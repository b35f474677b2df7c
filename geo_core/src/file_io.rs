//! # File I/O Module
//!
//! Reading analysis documents and writing results.
//!
//! - **Loading**: JSON [`AnalysisInput`] documents
//! - **Atomic saves**: results are written to a `.tmp` sibling, synced, then
//!   renamed over the target so a failed write never leaves a partial file
//!
//! ## Example
//!
//! ```rust,no_run
//! use geo_core::file_io::{load_analysis, save_json};
//! use std::path::Path;
//!
//! let input = load_analysis(Path::new("pier4.json")).unwrap();
//! let project = input.build_project().unwrap();
//! let result = input.method.run(&project).unwrap();
//! save_json(&result, Path::new("pier4-capacity.json")).unwrap();
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::input::AnalysisInput;

/// Load an analysis document.
///
/// # Returns
///
/// * `Ok(AnalysisInput)` - parsed document (not yet validated)
/// * `Err(CalcError::SerializationError)` - invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_analysis(path: &Path) -> CalcResult<AnalysisInput> {
    let mut file = File::open(path)
        .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let input: AnalysisInput = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;
    debug!(path = %path.display(), layers = input.layers.len(), "loaded analysis");
    Ok(input)
}

/// Write any serializable value as pretty JSON, atomically.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value)?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = json.len(), "saved json");
    Ok(())
}
