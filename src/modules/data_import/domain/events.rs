use serde::Serialize;

use super::services::import_components::types::{ContactOutcome, ImportProgress, ImportSummary};

/// Notifications the import pipeline publishes on its event bus
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ImportEvent {
    ParseCompleted {
        total_rows: usize,
        valid_rows: usize,
        error_count: usize,
    },
    DuplicatesDetected {
        candidates: usize,
        duplicates: usize,
    },
    Progress(ImportProgress),
    /// `position` is the pair's index in the request
    ContactProcessed {
        position: usize,
        name: String,
        outcome: ContactOutcome,
    },
    ImportCompleted(ImportSummary),
}
