//! Helpers shared across layers.
//!
//! - [`short_id`] - Short ID alphabet, generation and shape checks
//! - [`url_validation`] - Original URL acceptance rules
//! - [`client_info`] - Visit metadata extraction from HTTP requests
//! - [`db_error`] - SQLx error classification

pub mod client_info;
pub mod db_error;
pub mod short_id;
pub mod url_validation;
