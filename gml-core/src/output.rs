//! Writing the generated file.
//!
//! Output is all-or-nothing: content goes to a sibling temporary file that is
//! renamed over the target, so a failed run never leaves a truncated file.
//! Identical content is not rewritten, which keeps the mtime stable for
//! `cargo:rerun-if-changed` tracking.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{GmlError, GmlResult};
use crate::format::GeneratedSource;

/// What [`write_generated`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or replaced
    Written,
    /// The file already held identical content
    Unchanged,
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "gml".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Writes `source` to `path`.
pub fn write_generated(path: &Path, source: &GeneratedSource) -> GmlResult<WriteOutcome> {
    if let Ok(existing) = fs::read(path) {
        if existing == source.as_bytes() {
            info!(path = %path.display(), "generated file unchanged");
            return Ok(WriteOutcome::Unchanged);
        }
    }

    let tmp = temp_path(path);
    fs::write(&tmp, source.as_bytes()).map_err(|e| GmlError::output_write(path, e))?;

    if let Err(e) = fs::rename(&tmp, path) {
        fs::remove_file(&tmp).ok();
        return Err(GmlError::output_write(path, e));
    }

    info!(path = %path.display(), bytes = source.len(), "generated file written");
    Ok(WriteOutcome::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_source;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("gml_output_tests")
            .join(format!("{}_{}", std::process::id(), id));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn source() -> GeneratedSource {
        format_source("// Code generated; DO NOT EDIT.\n\npub const A: u8 = 0;\n").unwrap()
    }

    #[test]
    fn test_write_then_unchanged() {
        let dir = temp_dir();
        let path = dir.join("color_gml.rs");

        assert_eq!(write_generated(&path, &source()).unwrap(), WriteOutcome::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), source().as_str());
        assert_eq!(write_generated(&path, &source()).unwrap(), WriteOutcome::Unchanged);
        assert!(!temp_path(&path).exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_replaces_stale_content() {
        let dir = temp_dir();
        let path = dir.join("color_gml.rs");
        fs::write(&path, "stale").unwrap();

        assert_eq!(write_generated(&path, &source()).unwrap(), WriteOutcome::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), source().as_str());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = temp_dir();
        let path = dir.join("no_such_dir").join("color_gml.rs");

        let err = write_generated(&path, &source()).unwrap_err();
        assert!(matches!(err, GmlError::OutputWrite { .. }));
        assert!(!path.exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let tmp = temp_path(Path::new("src/color_gml.rs"));
        assert_eq!(tmp, PathBuf::from("src/.color_gml.rs.tmp"));
    }
}
