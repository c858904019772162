//! Shared errors and configuration for the presigner service.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, LogFormat, MetadataSettings, PresignSettings, StorageSettings};
pub use error::{AppError, AppResult};
