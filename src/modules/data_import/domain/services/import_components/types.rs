use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::modules::contacts::{ContactFields, ContactSource, IdentityKey, StoredContact};

/// A parsed, not-yet-persisted row from an import file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateContact {
    pub first_name: String,
    pub last_name: String,
    pub profile_url: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    /// Serialized as `YYYY-MM-DD`
    pub connected_on: Option<NaiveDate>,
}

impl CandidateContact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.profile_url, &self.first_name, &self.last_name)
    }

    pub fn to_fields(&self, source: ContactSource) -> ContactFields {
        ContactFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            linkedin_url: self.profile_url.clone(),
            email: self.email.clone(),
            company: self.company.clone(),
            position: self.position.clone(),
            connected_on: self.connected_on,
            source,
        }
    }
}

/// One problem with one row; `row` counts the header as row 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(rename = "row")]
    pub row_number: usize,
    pub message: String,
}

impl ValidationError {
    pub fn new(row_number: usize, message: impl Into<String>) -> Self {
        Self {
            row_number,
            message: message.into(),
        }
    }
}

/// Parser + validator output for one file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    pub contacts: Vec<CandidateContact>,
    pub errors: Vec<ValidationError>,
    /// Data rows handed to validation (preamble and blank padding excluded)
    pub total_rows: usize,
    pub valid_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Url,
    Name,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Url => write!(f, "url"),
            MatchType::Name => write!(f, "name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateMatch {
    pub candidate: CandidateContact,
    pub existing: StoredContact,
    pub match_type: MatchType,
}

/// How to turn detected duplicates into an overwrite set when the user did not pick one by one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicatePolicy {
    SkipAll,
    OverwriteAll,
    Explicit(HashSet<Uuid>),
}

impl DuplicatePolicy {
    pub fn overwrite_ids(&self, duplicates: &[DuplicateMatch]) -> HashSet<Uuid> {
        match self {
            DuplicatePolicy::SkipAll => HashSet::new(),
            DuplicatePolicy::OverwriteAll => duplicates.iter().map(|d| d.existing.id).collect(),
            DuplicatePolicy::Explicit(ids) => duplicates
                .iter()
                .map(|d| d.existing.id)
                .filter(|id| ids.contains(id))
                .collect(),
        }
    }
}

/// A candidate the caller chose to import, with the campaigns it joins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItem {
    pub candidate: CandidateContact,
    pub campaign_ids: Vec<Uuid>,
}

impl ImportItem {
    pub fn new(candidate: CandidateContact, campaign_ids: Vec<Uuid>) -> Self {
        Self {
            candidate,
            campaign_ids,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRequest {
    pub items: Vec<ImportItem>,
    /// Existing contact ids the caller agreed to overwrite
    pub overwrite_ids: HashSet<Uuid>,
}

impl ImportRequest {
    pub fn new(items: Vec<ImportItem>, overwrite_ids: HashSet<Uuid>) -> Self {
        Self {
            items,
            overwrite_ids,
        }
    }

    /// Every candidate joins the same campaigns
    pub fn for_campaigns(
        candidates: Vec<CandidateContact>,
        campaign_ids: Vec<Uuid>,
        overwrite_ids: HashSet<Uuid>,
    ) -> Self {
        let items = candidates
            .into_iter()
            .map(|candidate| ImportItem::new(candidate, campaign_ids.clone()))
            .collect();
        Self::new(items, overwrite_ids)
    }
}

/// Terminal state of one pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ContactOutcome {
    /// Write done and every requested campaign linked
    Imported { contact_id: Uuid },
    Overwritten { contact_id: Uuid },
    /// Matched an existing contact the caller chose not to overwrite
    Skipped { existing_id: Uuid },
    /// Labeled with the contact's name
    Rejected { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub overwritten: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProgress {
    pub current: usize,
    pub total: usize,
    pub current_contact: String,
    pub processed: usize,
    pub imported_count: usize,
    pub overwritten_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
}
