//! Run configuration: inputs, outputs and [LayoutParams] of one layout run.
//!
//! Can be read from a JSON parameter file:
//! ```json
//! {
//!     "tree": "primates.nwk",
//!     "coordinates": "primates_umap.csv",
//!     "output_prefix": "out/primates",
//!     "drag": 0.3,
//!     "spherical_layout": true
//! }
//! ```
//! Layout parameters sit at the top level next to the paths; everything but
//! `tree` has a default.

use crate::layout::LayoutParams;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default output prefix
pub const DEFAULT_OUTPUT_PREFIX: &str = "tree";

/// Everything needed for one run of the layout pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Newick file; the first tree is used
    pub tree: PathBuf,
    /// Leaf coordinate CSV; topology layout if absent
    #[serde(default)]
    pub coordinates: Option<PathBuf>,
    /// Prefix of all output files
    #[serde(default = "default_output_prefix")]
    pub output_prefix: PathBuf,
    /// Also write speck mesh and dat files
    #[serde(default)]
    pub speck: bool,
    #[serde(flatten)]
    pub layout: LayoutParams,
}

fn default_output_prefix() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PREFIX)
}

impl RunConfig {
    /// Creates a configuration with default layout parameters.
    pub fn new<P: Into<PathBuf>>(tree: P) -> Self {
        Self {
            tree: tree.into(),
            coordinates: None,
            output_prefix: default_output_prefix(),
            speck: false,
            layout: LayoutParams::default(),
        }
    }

    /// Reads a configuration from a JSON parameter file.
    ///
    /// # Errors
    /// [ConfigError] if the file cannot be read or is not a valid configuration.
    pub fn from_param_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

// =#========================================================================#=
// CONFIG ERROR
// =#========================================================================$=
/// Error reading a [RunConfig].
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "Cannot read parameter file: {err}"),
            ConfigError::Json(err) => write!(f, "Invalid parameter file: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}
