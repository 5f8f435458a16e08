//! Dashboard configuration file.
//!
//! ```json
//! {
//!   "endpoint": "https://example.org/api/patients",
//!   "title": "Patient Data",
//!   "ranges": { "creatine": { "min": 0.7, "max": 1.3 } }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Biomarker, BiomarkerRange, RangeError};
use crate::registry::RangeRegistry;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Range(#[from] RangeError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Record API endpoint
    pub endpoint: Option<String>,
    /// Chart title override
    pub title: Option<String>,
    /// Reference range overrides keyed by biomarker name
    pub ranges: BTreeMap<String, BiomarkerRange>,
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate every range override.
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validated_ranges()?;
        Ok(config)
    }

    /// Overrides resolved to biomarkers, rejecting unknown names and
    /// inverted or non-finite bounds.
    pub fn validated_ranges(&self) -> ConfigResult<Vec<(Biomarker, BiomarkerRange)>> {
        let mut resolved = Vec::with_capacity(self.ranges.len());
        for (name, range) in &self.ranges {
            let biomarker: Biomarker = name.parse()?;
            range.validate(biomarker)?;
            resolved.push((biomarker, *range));
        }
        Ok(resolved)
    }

    /// Apply range overrides to a registry.
    pub fn apply(&self, registry: &mut RangeRegistry) -> ConfigResult<()> {
        for (biomarker, range) in self.validated_ranges()? {
            registry.set_range(biomarker, range)?;
        }
        Ok(())
    }
}
