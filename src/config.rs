//! Configuration with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (the six canonical collections)
//! 2. Global config: `$XDG_CONFIG_HOME/ddmetrics/ddmetrics.toml`
//! 3. Local config: `./ddmetrics.toml`, or an explicit `--config` path
//! 4. Environment variables: `DDMETRICS_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::driver::{CollectionRequest, DriverOptions};

/// Local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "ddmetrics.toml";

/// The canonical collections, in batch order.
pub const DEFAULT_COLLECTIONS: [&str; 6] =
    ["prague", "stanford", "psud26", "pud26", "sud26", "ud26"];

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid separator {0:?}: must be a single character")]
    InvalidSeparator(String),

    #[error("collection with empty name in configuration")]
    EmptyCollectionName,

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// One configured collection. The main file defaults to
/// `<data_dir>/<name>_list.txt` when not given explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_file: Option<PathBuf>,
}

impl CollectionConfig {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            main_file: None,
        }
    }
}

/// Unified configuration for ddmetrics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the collection main files (default: cwd)
    pub data_dir: PathBuf,
    /// Directory the output tables are written into
    pub output_dir: PathBuf,
    /// Worker-pool size hint passed to the processor
    pub threads: usize,
    /// Column separator of the output tables (single character)
    pub separator: String,
    /// Label of the column holding each treebank's identifier
    pub treebank_column: String,
    /// Create the output directory on demand instead of failing
    pub create_output_dir: bool,
    /// Collections to process, in batch order
    pub collections: Vec<CollectionConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("out"),
            threads: 4,
            separator: " ".to_string(),
            treebank_column: "language".to_string(),
            create_output_dir: true,
            collections: DEFAULT_COLLECTIONS
                .iter()
                .map(|name| CollectionConfig::named(name))
                .collect(),
        }
    }
}

/// Path to the global config file, if a home directory is known.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ddmetrics").map(|dirs| dirs.config_dir().join(LOCAL_CONFIG_FILE))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// An explicit config path is required to exist; the global and local
    /// files are optional layers.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(global) = global_config_path() {
            if global.is_file() {
                builder = builder.add_source(File::from(global).required(false));
            }
        }

        match explicit {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                let local = PathBuf::from(LOCAL_CONFIG_FILE);
                if local.is_file() {
                    builder = builder.add_source(File::from(local).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("DDMETRICS")
                .prefix_separator("_")
                .separator("__")
                .list_separator(","),
        );

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.expand_paths();
        Ok(settings)
    }

    /// Expand `~` and `$VAR` in path-like fields.
    fn expand_paths(&mut self) {
        self.data_dir = expand_path(&self.data_dir);
        self.output_dir = expand_path(&self.output_dir);
        for collection in &mut self.collections {
            if let Some(main_file) = &collection.main_file {
                collection.main_file = Some(expand_path(main_file));
            }
        }
    }

    /// Resolve the configured collections into driver requests.
    pub fn requests(&self) -> Result<Vec<CollectionRequest>, SettingsError> {
        self.collections
            .iter()
            .map(|collection| {
                if collection.name.is_empty() {
                    return Err(SettingsError::EmptyCollectionName);
                }
                let main_file = collection.main_file.clone().unwrap_or_else(|| {
                    self.data_dir.join(format!("{}_list.txt", collection.name))
                });
                Ok(CollectionRequest::new(
                    collection.name.clone(),
                    main_file,
                    self.output_dir.clone(),
                ))
            })
            .collect()
    }

    /// Driver options derived from the settings.
    pub fn driver_options(&self) -> Result<DriverOptions, SettingsError> {
        let mut chars = self.separator.chars();
        let separator = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(SettingsError::InvalidSeparator(self.separator.clone())),
        };
        Ok(DriverOptions {
            threads: self.threads,
            separator,
            treebank_column: self.treebank_column.clone(),
        })
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# ddmetrics configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/ddmetrics/ddmetrics.toml
#   Local:  ./ddmetrics.toml  (or --config PATH)
#   Env:    DDMETRICS_* environment variables

# Directory holding the collection main files (<name>_list.txt)
# data_dir = "."

# Directory the output tables are written into
# output_dir = "out"

# Worker-pool size hint passed to the processing engine
# threads = 4

# Column separator of the output tables (single character)
# separator = " "

# Label of the column holding each treebank's identifier
# treebank_column = "language"

# Create the output directory on demand instead of failing
# create_output_dir = true

# Collections to process, in batch order. The main file defaults to
# <data_dir>/<name>_list.txt.
# [[collections]]
# name = "prague"
#
# [[collections]]
# name = "ud26"
# main_file = "lists/ud26_list.txt"
"#
        .to_string()
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(raw.as_ref()) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            debug!(path = %raw, error = %e, "path expansion failed, keeping verbatim");
            path.to_path_buf()
        }
    }
}
