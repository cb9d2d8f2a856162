//! Repository trait definitions for the domain layer.
//!
//! Traits define the data contract; implementations live in
//! `crate::infrastructure::persistence` (PostgreSQL and in-memory). Mock
//! implementations are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Short ID records and their visit counters
//! - [`VisitRepository`] - Raw visit rows

pub mod url_repository;
pub mod visit_repository;

pub use url_repository::UrlRepository;
pub use visit_repository::VisitRepository;

#[cfg(test)]
pub use url_repository::MockUrlRepository;
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
