//! Run parameters for a clustering pass.
//!
//! Parameters can be built in code or loaded from a TOML file:
//!
//! ```toml
//! th_distance = 5000.0
//! th_orient = 5.0
//! th_length = 5000.0
//! label = 1
//! seed_id = 2511
//!
//! [search]
//! kind = "grid"
//! cell_size = 2500.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Working sets at least this large use the grid index under
/// [`SearchStrategy::Auto`].
pub const MIN_LINEAMENTS_FOR_INDEX: usize = 256;

/// Neighbour search backend for a run.
///
/// Every backend returns the same candidates in the same order, so the choice
/// only affects speed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Bounding-box prefilter followed by a linear scan.
    Linear,
    /// Uniform grid buckets. The cell size defaults to `th_distance`.
    Grid { cell_size: Option<f64> },
    /// Linear for small working sets, grid otherwise.
    #[default]
    Auto,
}

/// Thresholds, target label and initial seed of a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    /// Neighbourhood radius around a seed centroid.
    pub th_distance: f64,
    /// Maximum orientation difference to the seed, in degrees.
    pub th_orient: f64,
    /// Maximum length difference to the seed.
    pub th_length: f64,
    /// Label assigned to the cluster. Must not be 0.
    pub label: i64,
    /// Global id of the initial seed lineament.
    pub seed_id: i64,
    /// Neighbour search backend.
    pub search: SearchStrategy,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            th_distance: 5000.0,
            th_orient: 5.0,
            th_length: 5000.0,
            label: 1,
            seed_id: 0,
            search: SearchStrategy::Auto,
        }
    }
}

impl ClusterParams {
    /// Parses parameters from a TOML document and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML and
    /// [`ConfigError::InvalidParameter`] if validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let params: Self = toml::from_str(content)?;
        params.validate()?;
        Ok(params)
    }

    /// Reads and validates parameters from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`ClusterParams::from_toml_str`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks that thresholds are finite and non-negative and that the label
    /// is a real classification.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("th_distance", self.th_distance),
            ("th_orient", self.th_orient),
            ("th_length", self.th_length),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite and non-negative",
                });
            }
        }

        if self.label == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "label",
                value: 0.0,
                reason: "0 is reserved for unclassified lineaments",
            });
        }

        if let SearchStrategy::Grid {
            cell_size: Some(size),
        } = self.search
        {
            if !size.is_finite() || size <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "search.cell_size",
                    value: size,
                    reason: "must be finite and positive",
                });
            }
        }

        Ok(())
    }
}
