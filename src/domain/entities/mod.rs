//! Core domain entities.
//!
//! - [`UrlRecord`] - A short ID mapped to its original URL, with visit counters
//! - [`Visit`] - A single recorded resolution of a short ID
//!
//! Creation inputs live in separate structs ([`NewUrlRecord`], [`NewVisit`]).

pub mod url_record;
pub mod visit;

pub use url_record::{NewUrlRecord, UrlRecord};
pub use visit::{NewVisit, Visit, VisitMetadata};
