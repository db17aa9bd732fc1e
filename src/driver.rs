//! The batch driver: configure a processor, run it, report the outcome.
//!
//! One call of [`process_treebank`] handles one collection and is fully
//! parameterized by its arguments; nothing persists across calls. Failures
//! are reported to stdout and folded into a boolean so a batch can keep
//! going regardless of individual outcomes.

use std::fmt::Write as _;
use std::path::PathBuf;

use tracing::{debug, error, info, instrument};

use crate::error::ProcessingError;
use crate::features::TreebankFeature;
use crate::processor::CollectionProcessor;

/// Output files are named `ddmetrics_trimmed-<collection>.txt`.
pub const OUTPUT_FILE_PREFIX: &str = "ddmetrics_trimmed-";

/// The four metric columns, in output order.
pub const METRIC_COLUMNS: [(TreebankFeature, &str); 4] = [
    (TreebankFeature::NumNodes, "n"),
    (TreebankFeature::SumSquaredDegrees, "K2"),
    (TreebankFeature::SumEdgeLengths, "D"),
    (TreebankFeature::MinSumEdgeLengths, "D_min"),
];

/// One collection to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRequest {
    /// Short identifier, used to name the output file.
    pub name: String,
    /// Main file listing the collection's treebanks.
    pub main_file: PathBuf,
    /// Directory the output table is written into.
    pub output_dir: PathBuf,
}

impl CollectionRequest {
    pub fn new(
        name: impl Into<String>,
        main_file: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            main_file: main_file.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Path of the joined output table for this collection.
    pub fn output_file(&self) -> PathBuf {
        self.output_dir
            .join(format!("{OUTPUT_FILE_PREFIX}{}.txt", self.name))
    }
}

/// Driver-side knobs. The defaults reproduce the canonical pipeline setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverOptions {
    /// Worker-pool size hint passed to the processor.
    pub threads: usize,
    /// Column separator of the output table.
    pub separator: char,
    /// Label of the column holding each treebank's identifier.
    pub treebank_column: String,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            threads: 4,
            separator: ' ',
            treebank_column: "language".to_string(),
        }
    }
}

/// Process one treebank collection.
///
/// Initialises the processor against the collection inputs, replaces any
/// default feature selection with the four metric columns, and executes.
/// The feature selection is cleared unconditionally, so re-using a
/// processor across calls cannot leak configuration between collections.
///
/// Returns `true` on success. On failure the error descriptor is printed,
/// partial failures with one entry per failing treebank file, and `false`
/// is returned; the caller decides whether to keep batching.
#[instrument(skip(processor), fields(collection = %request.name))]
pub fn process_treebank<P: CollectionProcessor>(
    processor: &mut P,
    request: &CollectionRequest,
    options: &DriverOptions,
) -> bool {
    if let Err(err) = processor.init(&request.main_file, &request.output_dir) {
        report_failure(&request.name, &err);
        return false;
    }

    processor.clear_features();
    for (feature, label) in METRIC_COLUMNS {
        processor.add_feature(feature);
        processor.set_column_name(feature, label);
    }
    processor.set_treebank_column_name(&options.treebank_column);
    processor.set_number_threads(options.threads);
    processor.set_separator(options.separator);
    processor.set_join_to_file_name(&request.output_file());

    debug!(output = %request.output_file().display(), threads = options.threads, "processor configured");

    // May block for a long, data-dependent time; all concurrency is the
    // processor's own.
    info!("processing treebank collection");
    match processor.process() {
        Ok(()) => {
            info!("collection processed");
            true
        }
        Err(err) => {
            report_failure(&request.name, &err);
            false
        }
    }
}

/// Render a processing failure the way the driver prints it.
///
/// Collection-wide failures are a single descriptor line. Partial failures
/// append one block per failing treebank file.
pub fn render_failure(err: &ProcessingError) -> String {
    let mut out = err.to_string();
    for failure in err.file_failures() {
        let _ = write!(
            out,
            "\n{}\n    treebank name: {}\n    treebank filename: {}",
            failure.kind,
            failure.treebank_name,
            failure.treebank_filename.display()
        );
    }
    out
}

fn report_failure(collection: &str, err: &ProcessingError) {
    error!(collection, %err, "collection failed");
    println!("{}", render_failure(err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FileFailure, TreebankErrorKind};

    #[test]
    fn output_file_combines_directory_prefix_and_name() {
        let request = CollectionRequest::new("prague", "prague_list.txt", "out");

        assert_eq!(
            request.output_file(),
            PathBuf::from("out/ddmetrics_trimmed-prague.txt")
        );
    }

    #[test]
    fn metric_columns_are_in_canonical_order() {
        let labels: Vec<_> = METRIC_COLUMNS.iter().map(|(_, l)| *l).collect();
        assert_eq!(labels, vec!["n", "K2", "D", "D_min"]);
    }

    #[test]
    fn render_collection_failure_is_single_line() {
        let err = ProcessingError::Collection(TreebankErrorKind::MainFileNotFound(
            "missing_list.txt".into(),
        ));

        assert_eq!(
            render_failure(&err),
            "main file does not exist: missing_list.txt"
        );
    }

    #[test]
    fn render_partial_failure_lists_every_file() {
        let err = ProcessingError::SomeFilesFailed(vec![
            FileFailure {
                kind: TreebankErrorKind::TreebankFileNotFound,
                treebank_name: "Czech".into(),
                treebank_filename: "cs.heads".into(),
            },
            FileFailure {
                kind: TreebankErrorKind::TreebankFileUnreadable,
                treebank_name: "German".into(),
                treebank_filename: "de.heads".into(),
            },
        ]);

        let rendered = render_failure(&err);

        assert!(rendered.starts_with("some treebank files failed (2)"));
        assert_eq!(rendered.matches("treebank name:").count(), 2);
        assert!(rendered.contains("treebank name: Czech"));
        assert!(rendered.contains("treebank filename: de.heads"));
    }
}
