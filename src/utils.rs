//! Utility functions for output paths and file names

use crate::config::FileCollisionAction;
use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone};
use std::path::{Path, PathBuf};

/// Highest ` (n)` suffix tried before giving up
const MAX_RENAME_SUFFIX: u32 = 9999;

/// Resolve where a new file should be written when `path` may already exist
///
/// - `Overwrite` returns `path` as is
/// - `Skip` refuses an existing file with [`Error::FileCollision`]
/// - `Rename` appends ` (1)`, ` (2)`, ... before the extension, so
///   `report.pdf` becomes `report (1).pdf`
///
/// # Examples
///
/// ```
/// use storefront_gallery::utils::get_unique_path;
/// use storefront_gallery::config::FileCollisionAction;
/// use std::path::Path;
///
/// let path = Path::new("/tmp/gallery-export.pdf");
/// let unique = get_unique_path(path, FileCollisionAction::Rename).unwrap();
/// ```
pub fn get_unique_path(path: &Path, action: FileCollisionAction) -> Result<PathBuf> {
    let taken = path.exists();
    match action {
        FileCollisionAction::Overwrite => Ok(path.to_path_buf()),
        FileCollisionAction::Skip if taken => Err(Error::FileCollision {
            path: path.to_path_buf(),
            reason: "target exists and collisions are set to skip".to_string(),
        }),
        FileCollisionAction::Skip => Ok(path.to_path_buf()),
        FileCollisionAction::Rename if !taken => Ok(path.to_path_buf()),
        FileCollisionAction::Rename => {
            let invalid = |reason: &str| Error::InvalidPath {
                path: path.to_path_buf(),
                reason: reason.to_string(),
            };
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| invalid("no usable file name"))?;
            let parent = path.parent().ok_or_else(|| invalid("no parent directory"))?;
            let suffix = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| format!(".{ext}"))
                .unwrap_or_default();

            (1..=MAX_RENAME_SUFFIX)
                .map(|n| parent.join(format!("{stem} ({n}){suffix}")))
                .find(|candidate| !candidate.exists())
                .ok_or_else(|| Error::FileCollision {
                    path: path.to_path_buf(),
                    reason: format!("every suffix up to ({MAX_RENAME_SUFFIX}) is taken"),
                })
        }
    }
}

/// Turn a free-text title into a single safe file name component
///
/// Path separators, reserved characters and control characters become `_`.
/// Leading dots are dropped so a title cannot produce a hidden file or `..`.
/// Falls back to `"download"` when nothing usable is left.
#[must_use]
pub fn sanitize_file_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_start_matches('.').trim();
    if trimmed.is_empty() {
        "download".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Insert a `-YYYYMMDD-HHMMSS` suffix before the extension of `file_name`
#[must_use]
pub fn timestamped_file_name<Tz: TimeZone>(file_name: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = at.format("%Y%m%d-%H%M%S");
    let path = Path::new(file_name);
    match (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) {
        (Some(stem), Some(ext)) => format!("{stem}-{stamp}.{ext}"),
        _ => format!("{file_name}-{stamp}"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_get_unique_path_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gallery-export.pdf");

        assert_eq!(
            get_unique_path(&path, FileCollisionAction::Rename).unwrap(),
            path
        );
        assert_eq!(
            get_unique_path(&path, FileCollisionAction::Overwrite).unwrap(),
            path
        );
        assert_eq!(
            get_unique_path(&path, FileCollisionAction::Skip).unwrap(),
            path
        );
    }

    #[test]
    fn test_get_unique_path_rename_sequential() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deck.pdf");
        fs::write(&path, "original").unwrap();

        let first = get_unique_path(&path, FileCollisionAction::Rename).unwrap();
        assert_eq!(first, temp_dir.path().join("deck (1).pdf"));

        fs::write(&first, "second").unwrap();
        let second = get_unique_path(&path, FileCollisionAction::Rename).unwrap();
        assert_eq!(second, temp_dir.path().join("deck (2).pdf"));
    }

    #[test]
    fn test_get_unique_path_rename_without_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lookbook");
        fs::write(&path, "original").unwrap();

        assert_eq!(
            get_unique_path(&path, FileCollisionAction::Rename).unwrap(),
            temp_dir.path().join("lookbook (1)")
        );
    }

    #[test]
    fn test_get_unique_path_skip_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deck.pdf");
        fs::write(&path, "original").unwrap();

        let result = get_unique_path(&path, FileCollisionAction::Skip);
        assert!(matches!(result, Err(Error::FileCollision { .. })));
    }

    #[test]
    fn test_get_unique_path_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deck.pdf");
        fs::write(&path, "original").unwrap();

        assert_eq!(
            get_unique_path(&path, FileCollisionAction::Overwrite).unwrap(),
            path
        );
    }

    #[test]
    fn sanitize_replaces_separators_and_reserved_characters() {
        assert_eq!(sanitize_file_name("Q3/Q4 Review"), "Q3_Q4 Review");
        assert_eq!(sanitize_file_name("a\\b:c*d?"), "a_b_c_d_");
        assert_eq!(sanitize_file_name("line\nbreak"), "line_break");
    }

    #[test]
    fn sanitize_cannot_escape_directory() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name(".."), "download");
        assert_eq!(sanitize_file_name("   "), "download");
    }

    #[test]
    fn sanitize_keeps_ordinary_titles() {
        assert_eq!(sanitize_file_name("Spring Lookbook 2025"), "Spring Lookbook 2025");
        assert_eq!(sanitize_file_name("Café Deck"), "Café Deck");
    }

    #[test]
    fn timestamp_goes_before_extension() {
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();

        assert_eq!(
            timestamped_file_name("gallery-export.pdf", &at),
            "gallery-export-20250309-140507.pdf"
        );
        assert_eq!(
            timestamped_file_name("export", &at),
            "export-20250309-140507"
        );
    }
}
