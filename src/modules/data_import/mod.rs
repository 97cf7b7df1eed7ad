/// LinkedIn connections import
///
/// Parse an export, match it against stored contacts, then persist the
/// caller's choices with campaign links. Progress goes out on an event bus.
pub mod application;
pub mod domain;

// Re-exports for easy external access
pub use application::dto::{DuplicatesResponse, ImportContactsRequest};
pub use application::service::ImportService;
pub use domain::{ImportCoordinator, ImportEvent, ImportExecutor};

// Re-export common types for shorter imports
pub use domain::services::import_components::types::{
    CandidateContact, ContactOutcome, DuplicateMatch, DuplicatePolicy, ImportItem, ImportProgress,
    ImportRequest, ImportSummary, MatchType, ParseOutcome, ValidationError,
};
