use crate::{log_error, log_info};
use crate::modules::contacts::{ContactRepository, IdentityKey, StoredContact};
use crate::modules::data_import::domain::events::ImportEvent;
use crate::shared::config::ImportConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::events::EventBus;
use crate::shared::utils::logger::TimedOperation;

use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::super::domain::services::import_components::{
    CandidateContact, CsvRowParser, DuplicateDetector, DuplicateMatch, FieldValidator,
    ImportCoordinator, ImportRequest, ImportSummary, ParseOutcome,
};

/// Identity keys per store round trip
const LOOKUP_CHUNK: usize = 500;

/// Import service - Clean interface that delegates to focused components
///
/// One instance per process; clones share the store, the event bus and the config.
#[derive(Clone)]
pub struct ImportService {
    contact_repo: Arc<dyn ContactRepository>,
    coordinator: ImportCoordinator,
    events: EventBus<ImportEvent>,
    config: ImportConfig,
}

impl ImportService {
    pub fn new(contact_repo: Arc<dyn ContactRepository>, config: ImportConfig) -> Self {
        let events = EventBus::new();
        let coordinator = ImportCoordinator::new(contact_repo.clone(), events.clone(), config.clone());

        Self {
            contact_repo,
            coordinator,
            events,
            config,
        }
    }

    /// Subscribers attached here receive every import notification
    pub fn events(&self) -> &EventBus<ImportEvent> {
        &self.events
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parse and validate an uploaded export; an unreadable file is `Err`
    pub fn parse_file(&self, bytes: &[u8]) -> AppResult<ParseOutcome> {
        let timer = TimedOperation::new("parse_import_file");
        let rows = self.parser().rows_from_bytes(bytes)?;
        let outcome = FieldValidator::new().collect(rows)?;
        timer.finish_with_info(&format!("{} rows", outcome.total_rows));

        self.publish_parsed(&outcome);
        Ok(outcome)
    }

    /// Same as `parse_file` for a streamed upload
    pub fn parse_reader<R: Read>(&self, reader: R) -> AppResult<ParseOutcome> {
        let timer = TimedOperation::new("parse_import_stream");
        let rows = self.parser().rows_from_reader(reader)?;
        let outcome = FieldValidator::new().collect(rows)?;
        timer.finish_with_info(&format!("{} rows", outcome.total_rows));

        self.publish_parsed(&outcome);
        Ok(outcome)
    }

    /// Fetch stored contacts sharing a URL or name with any candidate, then match
    pub async fn detect_duplicates(&self, candidates: &[CandidateContact]) -> AppResult<Vec<DuplicateMatch>> {
        let _timer = TimedOperation::new("detect_duplicates");
        let existing = self.fetch_overlapping(candidates).await?;
        let duplicates = DuplicateDetector::new().detect(candidates, &existing);

        log_info!(
            "Duplicate detection: {} of {} candidates match existing contacts",
            duplicates.len(),
            candidates.len()
        );
        self.events.publish(&ImportEvent::DuplicatesDetected {
            candidates: candidates.len(),
            duplicates: duplicates.len(),
        });

        Ok(duplicates)
    }

    /// Persist the chosen pairs; per-pair failures are in the summary, not `Err`
    pub async fn import_contacts(
        &self,
        request: ImportRequest,
        cancel: Option<CancellationToken>,
    ) -> AppResult<ImportSummary> {
        let coordinator = self.coordinator.clone();

        // Own task so a dropped caller cannot abandon a pair halfway
        let summary = tokio::spawn(async move { coordinator.import_contacts(request, cancel).await })
            .await
            .map_err(|e| {
                log_error!("Import task ended without a summary: {}", e);
                AppError::from(e)
            })?;

        Ok(summary)
    }

    fn parser(&self) -> CsvRowParser {
        CsvRowParser::new().with_max_bytes(self.config.max_file_bytes)
    }

    fn publish_parsed(&self, outcome: &ParseOutcome) {
        self.events.publish(&ImportEvent::ParseCompleted {
            total_rows: outcome.total_rows,
            valid_rows: outcome.valid_rows,
            error_count: outcome.errors.len(),
        });
    }

    async fn fetch_overlapping(&self, candidates: &[CandidateContact]) -> AppResult<Vec<StoredContact>> {
        let keys: Vec<IdentityKey> = candidates.iter().map(CandidateContact::identity_key).collect();
        let mut seen = HashSet::new();
        let mut existing = Vec::new();

        for chunk in keys.chunks(LOOKUP_CHUNK) {
            for contact in self.contact_repo.find_by_identity(chunk).await? {
                if seen.insert(contact.id) {
                    existing.push(contact);
                }
            }
        }

        // Chunks are each oldest first; restore that across the merge
        existing.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(existing)
    }
}
