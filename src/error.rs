use thiserror::Error;

/// Top-level error type for the clustering crate.
#[derive(Debug, Error)]
pub enum ClustreError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while turning raw records into lineaments.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeometryError {
    #[error("feature {fid} has {count} points, expected 2")]
    WrongPointCount { fid: i64, count: usize },

    #[error("feature {fid} has coincident start and end points (zero length)")]
    ZeroLength { fid: i64 },

    #[error("feature {fid} has non-finite coordinates")]
    NonFinite { fid: i64 },
}

/// Errors related to a clustering run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClusterError {
    #[error("seed {seed_id} is already classified or does not exist (label {label})")]
    SeedInvalid { seed_id: i64, label: i64 },

    #[error("duplicate lineament id: {0}")]
    DuplicateId(i64),

    #[error("lineament {0} is not in the store")]
    UnknownLineament(i64),
}

/// Errors related to loading and validating run parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("failed to parse parameters: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read parameters: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`ClustreError`].
pub type Result<T> = std::result::Result<T, ClustreError>;
