//! Application layer services implementing business logic.
//!
//! Services coordinate repositories, validation and the visit pipeline, and
//! give HTTP handlers a small API.
//!
//! # Available Services
//!
//! - [`services::UrlService`] - Short ID creation with bounded collision retry
//! - [`services::RedirectService`] - Short ID resolution and visit accounting
//! - [`services::VisitRecorder`] - Non-blocking hand-off of visits to the worker
//! - [`services::VisitService`] - Read access to stored visits

pub mod services;
