//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces and the visit pipeline independent of
//! infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`visit_event`] - Visit tracking event model
//! - [`visit_worker`] - Asynchronous visit persistence worker
//!
//! # Visit Processing Flow
//!
//! 1. The redirect resolver atomically increments the record's visit counter
//! 2. A [`visit_event::VisitEvent`] is sent to a bounded channel
//! 3. [`visit_worker::run_visit_worker`] persists events with retry logic
//! 4. Visit rows are stored via [`repositories::VisitRepository`]

pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
