use crate::modules::contacts::{ContactRepository, ContactSource, ContactWrite, ProfileUrl};
use crate::shared::errors::AppError;
use crate::shared::config::ImportConfig;
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_info, log_warn};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::duplicate_detector::DuplicateDetector;
use super::types::{ContactOutcome, ImportItem};

/// Runs one (candidate, campaigns) pair against the contact store
///
/// `pair_timeout` bounds the re-check lookup. A write handed to the store is
/// always awaited, so the reported outcome is the one the store committed.
#[derive(Clone)]
pub struct ImportExecutor {
    contact_repo: Arc<dyn ContactRepository>,
    pair_timeout: Duration,
}

impl ImportExecutor {
    pub fn new(contact_repo: Arc<dyn ContactRepository>) -> Self {
        Self {
            contact_repo,
            pair_timeout: ImportConfig::default().pair_timeout,
        }
    }

    pub fn with_pair_timeout(mut self, pair_timeout: Duration) -> Self {
        self.pair_timeout = pair_timeout;
        self
    }

    /// Label row-level failures with the contact's name
    pub fn rejection(item: &ImportItem, reason: impl std::fmt::Display) -> ContactOutcome {
        ContactOutcome::Rejected {
            message: format!("{}: {}", item.candidate.full_name().trim(), reason),
        }
    }

    /// Import a single pair; never fails, store errors become `Rejected`
    pub async fn import_single(&self, item: &ImportItem, overwrite_ids: &HashSet<Uuid>) -> ContactOutcome {
        let item_timer = TimedOperation::new("import_single_contact");
        let candidate = &item.candidate;

        // Upstream validation is not trusted here
        if let Err(reason) = ProfileUrl::parse(&candidate.profile_url) {
            item_timer.finish();
            return Self::rejection(item, reason);
        }
        if candidate.first_name.trim().is_empty() || candidate.last_name.trim().is_empty() {
            item_timer.finish();
            return Self::rejection(item, "First Name and Last Name are required");
        }
        if item.campaign_ids.is_empty() {
            item_timer.finish();
            return Self::rejection(item, "No target campaign selected");
        }

        // Store may have changed since duplicate detection ran
        let identity_keys = [candidate.identity_key()];
        let lookup = self.contact_repo.find_by_identity(&identity_keys);
        let existing = match tokio::time::timeout(self.pair_timeout, lookup).await {
            Ok(Ok(existing)) => existing,
            Err(_) => {
                log_warn!(
                    "Duplicate re-check for '{}' exceeded {:?}",
                    candidate.full_name(),
                    self.pair_timeout
                );
                item_timer.finish();
                return Self::rejection(
                    item,
                    format!("Timed out after {}s", self.pair_timeout.as_secs_f64()),
                );
            }
            Ok(Err(e)) => {
                LogContext::error_with_context(
                    &e,
                    &format!("Duplicate re-check failed for '{}'", candidate.full_name()),
                );
                item_timer.finish();
                return Self::rejection(item, e);
            }
        };

        let write = match DuplicateDetector::find_first_match(candidate, &existing) {
            Some((contact, _)) if overwrite_ids.contains(&contact.id) => ContactWrite::Update {
                id: contact.id,
                fields: candidate.to_fields(ContactSource::CsvImport),
            },
            Some((contact, match_type)) => {
                log_info!(
                    "Skipping '{}' - matches existing contact {} by {}",
                    candidate.full_name(),
                    contact.id,
                    match_type
                );
                item_timer.finish();
                return ContactOutcome::Skipped {
                    existing_id: contact.id,
                };
            }
            None => ContactWrite::Insert(candidate.to_fields(ContactSource::CsvImport)),
        };
        let is_update = matches!(write, ContactWrite::Update { .. });

        // Not raced against the timeout; the store bounds its own transaction

        let outcome = match self.contact_repo.apply_import(write, &item.campaign_ids).await {
            Ok(contact_id) if is_update => ContactOutcome::Overwritten { contact_id },
            Ok(contact_id) => ContactOutcome::Imported { contact_id },
            Err(e) => {
                LogContext::error_with_context(
                    &e,
                    &format!("Failed to save contact '{}'", candidate.full_name()),
                );
                Self::rejection(item, describe(&e))
            }
        };

        item_timer.finish();
        outcome
    }
}

fn describe(error: &AppError) -> String {
    match error {
        AppError::NotFound(_) => "Contact was removed before it could be overwritten".to_string(),
        other => other.to_string(),
    }
}
