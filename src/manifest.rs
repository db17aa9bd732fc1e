//! Collection main files: plain lists of the treebanks in a collection.
//!
//! Each non-empty line names one treebank and the file holding its trees:
//!
//! ```text
//! Czech      treebanks/cs-all.heads
//! German     treebanks/de-all.heads
//! ```
//!
//! Relative treebank paths resolve against the main file's directory, so a
//! collection stays self-contained wherever it is checked out. Blank lines
//! and `#` comments are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TreebankErrorKind;

/// One treebank named by a collection main file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Human-readable treebank name (first token of the line).
    pub name: String,
    /// Treebank file path, resolved against the main file's directory.
    pub file: PathBuf,
}

/// Read and parse a collection main file.
///
/// Fails collection-wide: a missing or unreadable file, or a line without a
/// file path, poisons the whole manifest.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>, TreebankErrorKind> {
    if !path.is_file() {
        return Err(TreebankErrorKind::MainFileNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)
        .map_err(|_| TreebankErrorKind::MainFileUnreadable(path.to_path_buf()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut entries = Vec::new();

    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .ok_or(TreebankErrorKind::MalformedMainFile {
                path: path.to_path_buf(),
                line: idx + 1,
            })?;
        let file = rest.trim();
        if file.is_empty() {
            return Err(TreebankErrorKind::MalformedMainFile {
                path: path.to_path_buf(),
                line: idx + 1,
            });
        }
        let file = PathBuf::from(file);
        let file = if file.is_absolute() {
            file
        } else {
            base.join(file)
        };
        entries.push(ManifestEntry {
            name: name.to_string(),
            file,
        });
    }

    debug!(main_file = %path.display(), treebanks = entries.len(), "read collection main file");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_main_file(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("list.txt");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn given_plain_list_when_read_then_entries_in_file_order() {
        let dir = TempDir::new().unwrap();
        let path = write_main_file(&dir, "Czech cs.heads\nGerman de.heads\n");

        let entries = read_manifest(&path).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Czech");
        assert_eq!(entries[0].file, dir.path().join("cs.heads"));
        assert_eq!(entries[1].name, "German");
    }

    #[test]
    fn given_comments_and_blank_lines_when_read_then_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_main_file(&dir, "# collection\n\nCzech cs.heads\n");

        let entries = read_manifest(&path).unwrap();

        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn given_absolute_path_when_read_then_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = write_main_file(&dir, "Czech /data/cs.heads\n");

        let entries = read_manifest(&path).unwrap();

        assert_eq!(entries[0].file, PathBuf::from("/data/cs.heads"));
    }

    #[test]
    fn given_missing_file_when_read_then_main_file_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.txt");

        let err = read_manifest(&path).unwrap_err();

        assert_eq!(err, TreebankErrorKind::MainFileNotFound(path));
    }

    #[test]
    fn given_line_without_path_when_read_then_malformed_with_line_number() {
        let dir = TempDir::new().unwrap();
        let path = write_main_file(&dir, "Czech cs.heads\nGermanOnly\n");

        let err = read_manifest(&path).unwrap_err();

        assert_eq!(
            err,
            TreebankErrorKind::MalformedMainFile {
                path,
                line: 2
            }
        );
    }
}
