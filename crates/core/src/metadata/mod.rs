//! Metadata lookups against the REST metadata backend.
//!
//! Resolves logical file identifiers, and upload intents, to the physical
//! `(region, bucket, object_key)` triple the storage adapter works with.

mod client;
mod error;
mod types;

pub use client::{MetadataClient, MetadataConfig, MetadataResolver};
pub use error::MetadataError;
pub use types::{FileLocation, FileLookup, UploadLookup};
