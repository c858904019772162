//! Object storage adapter using Apache OpenDAL and the AWS SDK.
//!
//! - verify credentials once at startup (signed ListBuckets)
//! - check object existence with a metadata-only HEAD
//! - produce presigned GET/PUT/DELETE URLs, re-targeted to the object's region
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────┐
//! │        Apache OpenDAL        │          aws-sdk-s3              │
//! │ (one operator per region)    │   (one client per region)        │
//! ├──────────────────────────────┼──────────────────────────────────┤
//! │ op.presign_read("key", ttl)  │ delete_object().presigned(cfg)   │
//! │ op.presign_write("key", ttl) │ list_buckets().send()            │
//! │ op.stat("key")               │                                  │
//! └──────────────────────────────┴──────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;

pub use config::StorageConfig;
pub use error::StorageError;
pub use service::{ObjectLocation, ObjectStorage, PresignOperation, PresignedUrl, StorageService};
