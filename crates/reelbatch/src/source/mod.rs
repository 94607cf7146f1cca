//! Source fetching: retrieves the tabular record set and validates its schema.

pub mod fetcher;
pub mod record;

pub use fetcher::{parse_records, RecordSource, SourceFetcher};
pub use record::{Record, RecordType, OPTIONAL_FIELDS, REQUIRED_FIELDS};
