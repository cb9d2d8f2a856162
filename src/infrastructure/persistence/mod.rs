//! Repository implementations.
//!
//! # PostgreSQL
//!
//! - [`PgUrlRepository`] - URL records, atomic visit counters
//! - [`PgVisitRepository`] - Raw visit rows
//!
//! Rows are read into explicit per-table structs (see [`rows`]) and mapped into
//! domain entities.
//!
//! # In-memory
//!
//! - [`MemoryUrlRepository`] / [`MemoryVisitRepository`] - process-local storage
//!   for development (`STORAGE_BACKEND=memory`) and tests

pub mod memory_url_repository;
pub mod memory_visit_repository;
pub mod pg_url_repository;
pub mod pg_visit_repository;
pub mod rows;

pub use memory_url_repository::MemoryUrlRepository;
pub use memory_visit_repository::MemoryVisitRepository;
pub use pg_url_repository::PgUrlRepository;
pub use pg_visit_repository::PgVisitRepository;
