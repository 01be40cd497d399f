//! # Configuration
//!
//! Optional `lineage.toml`:
//!
//! ```toml
//! [corpus]
//! roots = ["system", "user"]
//!
//! [resolver]
//! trusted_library = "system/OrcaFilamentLibrary"
//!
//! [settings]
//! script_key_markers = ["gcode"]
//! script_keys = ["filament_notes"]
//! placeholder = "-"
//! ```
//!
//! Every section and field is optional. Unknown keys are rejected.

use lineage_core::{LineageError, ResolverPolicy, SettingPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "lineage.toml";

/// Maximum configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Which parts of the input directory are scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusSection {
    /// Sub-directories of the input directory, scanned in this order.
    /// Empty scans the input directory itself.
    pub roots: Vec<String>,
}

impl Default for CorpusSection {
    fn default() -> Self {
        Self {
            roots: vec!["system".to_string(), "user".to_string()],
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineageConfig {
    pub corpus: CorpusSection,
    pub resolver: ResolverPolicy,
    pub settings: SettingPolicy,
}

impl LineageConfig {
    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, LineageError> {
        toml::from_str(content).map_err(|e| LineageError::ConfigError(e.to_string()))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `lineage.toml` in the
    /// current directory is used if present, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, LineageError> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::read(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, LineageError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            LineageError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(LineageError::ConfigError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            LineageError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::parse(&content)
    }
}
