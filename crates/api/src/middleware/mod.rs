//! Middleware for the presign routes.

mod envelope;
mod request_log;

pub use envelope::error_envelope;
pub use request_log::request_log;
