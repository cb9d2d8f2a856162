//! Business logic services for the application layer.

pub mod redirect_service;
pub mod url_service;
pub mod visit_recorder;
pub mod visit_service;

pub use redirect_service::RedirectService;
pub use url_service::UrlService;
pub use visit_recorder::{RecordOutcome, VisitRecorder};
pub use visit_service::{VisitPage, VisitService};
