//! Batch driver for syntactic dependency-distance metrics over treebank
//! collections.
//!
//! The driver configures and executes a treebank-collection processing
//! engine — anything implementing [`processor::CollectionProcessor`] — and
//! turns its outcome into per-collection diagnostics and a boolean. All
//! metric computation (degree statistics, edge-length sums, minimum linear
//! arrangements) lives behind that trait; this crate owns the request
//! building, the batch orchestration, and the error reporting around it.
//!
//! The shipped [`processor::PreflightProcessor`] validates a collection's
//! inputs end-to-end without computing anything, so a configuration can be
//! vetted before committing to a long engine run.

pub mod batch;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod exitcode;
pub mod features;
pub mod manifest;
pub mod processor;
pub mod util;

pub use batch::{run_batch, BatchSummary};
pub use config::{CollectionConfig, Settings, SettingsError};
pub use driver::{process_treebank, CollectionRequest, DriverOptions};
pub use error::{FileFailure, ProcessingError, ProcessingResult, TreebankErrorKind};
pub use features::TreebankFeature;
pub use manifest::{read_manifest, ManifestEntry};
pub use processor::{CollectionProcessor, PreflightProcessor, ProcessorSetup};
