pub mod cluster;
pub mod config;
pub mod error;
pub mod lineament;
pub mod math;

pub use cluster::{ClusterRun, Clustre, ResultSync};
pub use config::{ClusterParams, SearchStrategy};
pub use error::{ClustreError, Result};
pub use lineament::{LineamentStore, RawFeature};
