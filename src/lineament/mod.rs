mod ingest;
mod record;
mod store;

pub use ingest::{IngestReport, RawFeature, SkipReason};
pub use record::{Attributes, Lineament, LineamentId};
pub use store::LineamentStore;
