//! Core presign logic.
//!
//! This crate holds everything between an HTTP request and a signed URL,
//! with no web framework dependencies.
//!
//! # Modules
//!
//! - `metadata` - Resolving file ids and upload intents to storage coordinates
//! - `storage` - OpenDAL-backed existence checks and URL signing
//! - `presign` - Validation and orchestration of the three presign flows

pub mod metadata;
pub mod presign;
pub mod storage;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
