pub mod archive;
pub mod manifest;

pub use archive::Packager;
pub use manifest::{join_external_ids, read_manifest, write_manifest, ManifestEntry, MANIFEST_NAME};
