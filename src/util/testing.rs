//! Test support: logging setup, a scripted processor double, and
//! fixture helpers shared by unit and integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::driver::CollectionRequest;
use crate::error::{ProcessingError, ProcessingResult, TreebankErrorKind};
use crate::features::TreebankFeature;
use crate::processor::{CollectionProcessor, ProcessorSetup};

static TEST_SETUP: Once = Once::new();

/// Install a global tracing subscriber for tests, once per process.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(env_filter),
        );
        if subscriber.try_init().is_ok() {
            info!("test setup complete");
        }
    });
}

/// Every call a processor receives, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorCall {
    Init(PathBuf, PathBuf),
    ClearFeatures,
    AddFeature(TreebankFeature),
    SetColumnName(TreebankFeature, String),
    SetTreebankColumnName(String),
    SetNumberThreads(usize),
    SetSeparator(char),
    SetJoinToFileName(PathBuf),
    Process,
}

/// Scripted [`CollectionProcessor`] double.
///
/// Records the call sequence for configuration assertions and replays
/// scripted outcomes. On a successful `process` it writes the configured
/// join file from injected metric rows, so output-shape properties can be
/// checked without a real engine.
#[derive(Debug, Default)]
pub struct MockProcessor {
    pub setup: ProcessorSetup,
    pub calls: Vec<ProcessorCall>,
    init_error: Option<ProcessingError>,
    process_error: Option<ProcessingError>,
    rows: Vec<(String, Vec<u64>)>,
}

impl MockProcessor {
    /// A processor that succeeds and writes an empty table.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// A processor whose `init` fails with the given error.
    pub fn failing_init(error: ProcessingError) -> Self {
        Self {
            init_error: Some(error),
            ..Self::default()
        }
    }

    /// A processor whose `process` fails with the given error.
    pub fn failing_process(error: ProcessingError) -> Self {
        Self {
            process_error: Some(error),
            ..Self::default()
        }
    }

    /// Metric rows written to the join file on success.
    pub fn with_rows(mut self, rows: Vec<(String, Vec<u64>)>) -> Self {
        self.rows = rows;
        self
    }

    /// Features added since the last `clear_features`, in order.
    pub fn selected_features(&self) -> &[TreebankFeature] {
        &self.setup.features
    }

    /// How often a given call was received.
    pub fn count_calls(&self, wanted: &ProcessorCall) -> usize {
        self.calls.iter().filter(|c| *c == wanted).count()
    }
}

impl CollectionProcessor for MockProcessor {
    fn init(&mut self, main_file: &Path, output_dir: &Path) -> ProcessingResult<()> {
        self.calls.push(ProcessorCall::Init(
            main_file.to_path_buf(),
            output_dir.to_path_buf(),
        ));
        if let Some(error) = &self.init_error {
            return Err(error.clone());
        }
        self.setup.main_file = Some(main_file.to_path_buf());
        self.setup.output_dir = Some(output_dir.to_path_buf());
        Ok(())
    }

    fn clear_features(&mut self) {
        self.calls.push(ProcessorCall::ClearFeatures);
        self.setup.clear_selection();
    }

    fn add_feature(&mut self, feature: TreebankFeature) {
        self.calls.push(ProcessorCall::AddFeature(feature));
        self.setup.select_feature(feature);
    }

    fn set_column_name(&mut self, feature: TreebankFeature, name: &str) {
        self.calls
            .push(ProcessorCall::SetColumnName(feature, name.to_string()));
        self.setup.column_names.insert(feature, name.to_string());
    }

    fn set_treebank_column_name(&mut self, name: &str) {
        self.calls
            .push(ProcessorCall::SetTreebankColumnName(name.to_string()));
        self.setup.treebank_column_name = name.to_string();
    }

    fn set_number_threads(&mut self, threads: usize) {
        self.calls.push(ProcessorCall::SetNumberThreads(threads));
        self.setup.threads = threads;
    }

    fn set_separator(&mut self, separator: char) {
        self.calls.push(ProcessorCall::SetSeparator(separator));
        self.setup.separator = separator;
    }

    fn set_join_to_file_name(&mut self, path: &Path) {
        self.calls
            .push(ProcessorCall::SetJoinToFileName(path.to_path_buf()));
        self.setup.join_file = Some(path.to_path_buf());
    }

    fn process(&mut self) -> ProcessingResult<()> {
        self.calls.push(ProcessorCall::Process);
        if let Some(error) = &self.process_error {
            return Err(error.clone());
        }
        if let Some(join_file) = &self.setup.join_file {
            let table = self.setup.render_table(&self.rows);
            fs::write(join_file, table).map_err(|_| {
                ProcessingError::Collection(TreebankErrorKind::OutputFileUnwritable(
                    join_file.clone(),
                ))
            })?;
        }
        Ok(())
    }
}

/// Lay out a collection on disk: treebank files plus a main file naming
/// them, returning a request pointing at it.
pub fn scratch_collection(
    dir: &Path,
    name: &str,
    treebanks: &[(&str, &str)],
) -> CollectionRequest {
    let mut manifest = String::new();
    for (treebank, contents) in treebanks {
        let file = format!("{}.heads", treebank.to_lowercase());
        fs::write(dir.join(&file), contents).expect("write treebank file");
        manifest.push_str(&format!("{treebank} {file}\n"));
    }
    let main_file = dir.join(format!("{name}_list.txt"));
    fs::write(&main_file, manifest).expect("write main file");
    CollectionRequest::new(name, main_file, dir.join("out"))
}
