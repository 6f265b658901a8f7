//! # File I/O Module
//!
//! Reading form values from disk and writing reports and config files.
//!
//! - **Atomic writes**: write to `.tmp`, sync, rename, so an interrupted
//!   export never leaves a truncated PDF behind
//! - **Plain JSON input**: form values are a flat JSON object of field name
//!   to value
//!
//! ## Example
//!
//! ```rust,no_run
//! use lepra_core::file_io::{load_form_values, write_report};
//! use std::path::Path;
//!
//! let values = load_form_values(Path::new("patient.json"))?;
//! println!("Loaded {} fields", values.len());
//!
//! let written = write_report(Path::new("."), "Leprosy_Report_Asha.pdf", b"%PDF-1.7")?;
//! println!("Saved {}", written.display());
//! # Ok::<(), lepra_core::errors::ScreenError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{ScreenError, ScreenResult};
use crate::form::FormValues;

/// Write bytes to `path` with atomic write semantics.
///
/// The save process:
/// 1. Write to a temporary file next to the target (`<name>.tmp`)
/// 2. Sync to disk (fsync)
/// 3. Rename over the target (atomic on most filesystems)
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ScreenResult<()> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).ok_or_else(|| {
        ScreenError::file_error("write", path.display().to_string(), "Path has no file name")
    })?;
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        ScreenError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        ScreenError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        ScreenError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        ScreenError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Save a rendered report as `dir/filename`, creating `dir` if needed.
///
/// Returns the full path written.
pub fn write_report(dir: &Path, filename: &str, pdf_bytes: &[u8]) -> ScreenResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| {
        ScreenError::file_error("create directory", dir.display().to_string(), e.to_string())
    })?;

    let path = dir.join(filename);
    write_atomic(&path, pdf_bytes)?;
    tracing::info!(path = %path.display(), bytes = pdf_bytes.len(), "report saved");
    Ok(path)
}

/// Load form values from a JSON object file.
///
/// # Returns
///
/// * `Ok(FormValues)` - Successfully loaded values
/// * `Err(ScreenError::SerializationError)` - Invalid JSON
/// * `Err(ScreenError::InvalidInput)` - JSON is not a flat object of scalars
/// * `Err(ScreenError::FileError)` - I/O error
pub fn load_form_values(path: &Path) -> ScreenResult<FormValues> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ScreenError::file_error("read", path.display().to_string(), e.to_string()))?;

    let json: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| ScreenError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    FormValues::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_report_creates_dir_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("reports");

        let path = write_report(&out_dir, "Leprosy_Report_Asha.pdf", b"%PDF-test").unwrap();
        assert_eq!(path, out_dir.join("Leprosy_Report_Asha.pdf"));
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-test");
        assert!(!out_dir.join("Leprosy_Report_Asha.pdf.tmp").exists());
    }

    #[test]
    fn test_write_atomic_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_load_form_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patient.json");
        fs::write(&path, r#"{ "name": "Asha", "Age": 34, "weak_grip": "Yes" }"#).unwrap();

        let values = load_form_values(&path).unwrap();
        assert_eq!(values.get("name"), "Asha");
        assert_eq!(values.get("Age"), "34");
        assert_eq!(values.get("weak_grip"), "Yes");
    }

    #[test]
    fn test_load_form_values_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = load_form_values(&dir.path().join("missing.json")).unwrap_err();
        assert_eq!(missing.error_code(), "FILE_ERROR");

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert_eq!(load_form_values(&bad).unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }
}
