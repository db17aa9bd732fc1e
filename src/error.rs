//! Error taxonomy of the collection-processing contract.
//!
//! The processor reports failures as values, never as panics. A failure is
//! either collection-wide (nothing was processed) or partial (a subset of
//! treebank files failed while the rest went through). Callers pattern-match
//! on [`ProcessingError`] instead of probing auxiliary accessors.

use std::path::PathBuf;
use thiserror::Error;

/// Fine-grained failure kinds reported by a collection processor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreebankErrorKind {
    #[error("main file does not exist: {0}")]
    MainFileNotFound(PathBuf),

    #[error("main file could not be read: {0}")]
    MainFileUnreadable(PathBuf),

    #[error("malformed main file (line {line}): {path}")]
    MalformedMainFile { path: PathBuf, line: usize },

    #[error("output directory does not exist: {0}")]
    OutputDirMissing(PathBuf),

    #[error("output directory could not be created: {0}")]
    OutputDirNotCreated(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("output file could not be opened: {0}")]
    OutputFileUnwritable(PathBuf),

    #[error("no features selected")]
    NoFeatures,

    #[error("processor not initialised")]
    NotInitialised,

    #[error("treebank file does not exist")]
    TreebankFileNotFound,

    #[error("treebank file could not be read")]
    TreebankFileUnreadable,

    #[error("malformed treebank file")]
    MalformedTreebankFile,
}

/// One failed treebank file within an otherwise processed collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// What went wrong with this file.
    pub kind: TreebankErrorKind,
    /// Human-readable treebank name from the collection main file.
    pub treebank_name: String,
    /// Path of the failing treebank file.
    pub treebank_filename: PathBuf,
}

/// Outcome of `init` or `process` on a collection processor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessingError {
    /// The whole collection failed; no per-file detail exists.
    #[error("{0}")]
    Collection(TreebankErrorKind),

    /// Some treebank files failed; the remaining files were processed.
    #[error("some treebank files failed ({n})", n = .0.len())]
    SomeFilesFailed(Vec<FileFailure>),
}

/// Result alias for processor operations.
pub type ProcessingResult<T> = Result<T, ProcessingError>;

impl ProcessingError {
    /// Per-file failure records, empty for collection-wide errors.
    pub fn file_failures(&self) -> &[FileFailure] {
        match self {
            ProcessingError::Collection(_) => &[],
            ProcessingError::SomeFilesFailed(failures) => failures,
        }
    }
}
