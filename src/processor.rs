//! The collection-processing contract and the shipped preflight engine.
//!
//! [`CollectionProcessor`] is the narrow seam between the driver and
//! whatever engine actually computes dependency-distance metrics. The
//! driver only configures and executes; engines own parsing, metric
//! computation, and their internal worker pools. [`PreflightProcessor`]
//! implements the same contract for input validation, so a collection can
//! be vetted end-to-end before committing to a long engine run.

use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use tracing::{debug, info};

use crate::error::{FileFailure, ProcessingError, ProcessingResult, TreebankErrorKind};
use crate::features::TreebankFeature;
use crate::manifest::{self, ManifestEntry};

/// Contract of a treebank-collection processing engine.
///
/// Call order: `init` first, then configuration setters in any order, then
/// `process`. `init` validates the collection inputs and prepares internal
/// state; `process` runs the batch and may block for a long, data-dependent
/// time. Both communicate failure as [`ProcessingError`] values.
pub trait CollectionProcessor {
    /// Validate inputs and prepare for a run over one collection.
    fn init(&mut self, main_file: &Path, output_dir: &Path) -> ProcessingResult<()>;

    /// Drop any previously selected features.
    fn clear_features(&mut self);

    /// Select a feature to compute. Selection order fixes column order.
    fn add_feature(&mut self, feature: TreebankFeature);

    /// Override the output column name of a feature.
    fn set_column_name(&mut self, feature: TreebankFeature, name: &str);

    /// Name of the column holding each treebank's identifier.
    fn set_treebank_column_name(&mut self, name: &str);

    /// Worker-pool size hint. Scheduling stays inside the engine.
    fn set_number_threads(&mut self, threads: usize);

    /// Column separator of the output table.
    fn set_separator(&mut self, separator: char);

    /// Path of the joined output table for the whole collection.
    fn set_join_to_file_name(&mut self, path: &Path);

    /// Run the batch over every treebank of the collection.
    fn process(&mut self) -> ProcessingResult<()>;
}

/// Configuration captured by a processor between `init` and `process`.
///
/// Engines embed this so the setter half of [`CollectionProcessor`] is
/// uniform; only `init`/`process` differ between implementations.
#[derive(Debug, Clone)]
pub struct ProcessorSetup {
    pub main_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    /// Selected features, in selection order.
    pub features: Vec<TreebankFeature>,
    pub column_names: HashMap<TreebankFeature, String>,
    pub treebank_column_name: String,
    pub threads: usize,
    pub separator: char,
    pub join_file: Option<PathBuf>,
}

impl Default for ProcessorSetup {
    fn default() -> Self {
        Self {
            main_file: None,
            output_dir: None,
            features: Vec::new(),
            column_names: HashMap::new(),
            treebank_column_name: "treebank".to_string(),
            threads: 1,
            separator: '\t',
            join_file: None,
        }
    }
}

impl ProcessorSetup {
    /// Effective column name of a feature: override or default.
    pub fn column_name(&self, feature: TreebankFeature) -> &str {
        self.column_names
            .get(&feature)
            .map(String::as_str)
            .unwrap_or_else(|| feature.default_column_name())
    }

    /// Header row of the output table.
    pub fn header_row(&self) -> String {
        let sep = self.separator.to_string();
        std::iter::once(self.treebank_column_name.as_str())
            .chain(self.features.iter().map(|f| self.column_name(*f)))
            .join(&sep)
    }

    /// Select a feature, keeping the first selection's position.
    pub fn select_feature(&mut self, feature: TreebankFeature) {
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
    }

    /// Drop the feature selection and its column-name overrides.
    pub fn clear_selection(&mut self) {
        self.features.clear();
        self.column_names.clear();
    }

    /// Render a full output table from per-treebank metric rows.
    pub fn render_table(&self, rows: &[(String, Vec<u64>)]) -> String {
        let sep = self.separator.to_string();
        let mut table = self.header_row();
        table.push('\n');
        for (treebank, values) in rows {
            table.push_str(treebank);
            for value in values {
                table.push_str(&sep);
                table.push_str(&value.to_string());
            }
            table.push('\n');
        }
        table
    }
}

/// Input validation with the full processor contract.
///
/// `init` vets the main file and the output directory; `process` vets the
/// feature selection and every treebank file the manifest names. Nothing is
/// parsed beyond the manifest and nothing is written: the point is to fail
/// fast before handing a collection to an engine for hours.
#[derive(Debug, Default)]
pub struct PreflightProcessor {
    setup: ProcessorSetup,
    create_output_dir: bool,
    entries: Vec<ManifestEntry>,
    initialised: bool,
}

impl PreflightProcessor {
    pub fn new() -> Self {
        Self {
            create_output_dir: true,
            ..Self::default()
        }
    }

    /// Whether a missing output directory is created (default) or an error.
    pub fn create_output_dir(mut self, create: bool) -> Self {
        self.create_output_dir = create;
        self
    }

    /// Captured configuration, mainly of interest to tests.
    pub fn setup(&self) -> &ProcessorSetup {
        &self.setup
    }

    fn do_init(&mut self, main_file: &Path, output_dir: &Path) -> ProcessingResult<()> {
        // Manifest first: a bad collection must not leave a half-prepared
        // output directory behind.
        self.entries = manifest::read_manifest(main_file).map_err(ProcessingError::Collection)?;

        if output_dir.exists() {
            if !output_dir.is_dir() {
                return Err(ProcessingError::Collection(
                    TreebankErrorKind::NotADirectory(output_dir.to_path_buf()),
                ));
            }
        } else if self.create_output_dir {
            fs::create_dir_all(output_dir).map_err(|_| {
                ProcessingError::Collection(TreebankErrorKind::OutputDirNotCreated(
                    output_dir.to_path_buf(),
                ))
            })?;
            debug!(dir = %output_dir.display(), "created output directory");
        } else {
            return Err(ProcessingError::Collection(
                TreebankErrorKind::OutputDirMissing(output_dir.to_path_buf()),
            ));
        }

        self.setup.main_file = Some(main_file.to_path_buf());
        self.setup.output_dir = Some(output_dir.to_path_buf());
        self.initialised = true;
        Ok(())
    }

    fn do_process(&mut self) -> ProcessingResult<()> {
        if !self.initialised {
            return Err(ProcessingError::Collection(
                TreebankErrorKind::NotInitialised,
            ));
        }
        if self.setup.features.is_empty() {
            return Err(ProcessingError::Collection(TreebankErrorKind::NoFeatures));
        }

        let mut failures = Vec::new();
        for entry in &self.entries {
            if let Some(kind) = check_treebank_file(&entry.file) {
                failures.push(FileFailure {
                    kind,
                    treebank_name: entry.name.clone(),
                    treebank_filename: entry.file.clone(),
                });
            }
        }

        info!(
            treebanks = self.entries.len(),
            failed = failures.len(),
            "preflight pass finished"
        );
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ProcessingError::SomeFilesFailed(failures))
        }
    }
}

impl CollectionProcessor for PreflightProcessor {
    fn init(&mut self, main_file: &Path, output_dir: &Path) -> ProcessingResult<()> {
        self.do_init(main_file, output_dir)
    }

    fn clear_features(&mut self) {
        self.setup.clear_selection();
    }

    fn add_feature(&mut self, feature: TreebankFeature) {
        self.setup.select_feature(feature);
    }

    fn set_column_name(&mut self, feature: TreebankFeature, name: &str) {
        self.setup.column_names.insert(feature, name.to_string());
    }

    fn set_treebank_column_name(&mut self, name: &str) {
        self.setup.treebank_column_name = name.to_string();
    }

    fn set_number_threads(&mut self, threads: usize) {
        self.setup.threads = threads.max(1);
    }

    fn set_separator(&mut self, separator: char) {
        self.setup.separator = separator;
    }

    fn set_join_to_file_name(&mut self, path: &Path) {
        self.setup.join_file = Some(path.to_path_buf());
    }

    fn process(&mut self) -> ProcessingResult<()> {
        self.do_process()
    }
}

fn check_treebank_file(path: &Path) -> Option<TreebankErrorKind> {
    if !path.is_file() {
        return Some(TreebankErrorKind::TreebankFileNotFound);
    }
    match File::open(path) {
        Ok(_) => None,
        Err(_) => Some(TreebankErrorKind::TreebankFileUnreadable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_row_uses_overrides_and_defaults() {
        let mut setup = ProcessorSetup {
            separator: ' ',
            treebank_column_name: "language".to_string(),
            ..ProcessorSetup::default()
        };
        setup.select_feature(TreebankFeature::NumNodes);
        setup.select_feature(TreebankFeature::SumEdgeLengths);
        setup
            .column_names
            .insert(TreebankFeature::NumNodes, "n".to_string());

        assert_eq!(setup.header_row(), "language n sum_edge_lengths");
    }

    #[test]
    fn selecting_a_feature_twice_keeps_one_column() {
        let mut setup = ProcessorSetup::default();
        setup.select_feature(TreebankFeature::NumNodes);
        setup.select_feature(TreebankFeature::NumNodes);

        assert_eq!(setup.features, vec![TreebankFeature::NumNodes]);
    }

    #[test]
    fn process_before_init_is_an_error() {
        let mut processor = PreflightProcessor::new();

        let err = processor.process().unwrap_err();

        assert_eq!(
            err,
            ProcessingError::Collection(TreebankErrorKind::NotInitialised)
        );
    }
}
