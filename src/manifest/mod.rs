//! Flows manifest published to an S3-compatible bucket before a run.
//!
//! Downstream collectors read the manifest to learn which destinations are
//! about to receive traffic. The object is written once per uploader.
mod body;
mod sign;
mod uploader;


pub use body::{
    MANIFEST_VERSION, Manifest, ManifestFlow, ManifestTimestamps, build_manifest, object_key,
};
pub use uploader::{ManifestUploader, StorageTarget};

/// Region used for signing when the storage section names none.
pub const DEFAULT_REGION: &str = "local";
