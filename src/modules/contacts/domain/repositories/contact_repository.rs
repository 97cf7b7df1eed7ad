/// Contact store port
///
/// The hosted backend owns the `contacts`, `campaigns` and `campaign_contacts`
/// tables and enforces tenancy through row-level security; adapters only see
/// the rows the caller is allowed to see.
use crate::modules::contacts::domain::entities::contact::{ContactFields, StoredContact};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Identity signals a lookup matches on: profile URL or full name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityKey {
    pub profile_url: String,
    pub first_name: String,
    pub last_name: String,
}

impl IdentityKey {
    pub fn new(profile_url: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            profile_url: profile_url.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

/// One pair's write: a fresh insert or an in-place overwrite
#[derive(Debug, Clone, PartialEq)]
pub enum ContactWrite {
    Insert(ContactFields),
    Update { id: Uuid, fields: ContactFields },
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Stored contacts whose URL equals any key's URL, or whose first and last
    /// name both equal any key's names, all case-insensitively.
    /// Results come back in a stable order (oldest first).
    async fn find_by_identity(&self, keys: &[IdentityKey]) -> AppResult<Vec<StoredContact>>;

    /// Insert or update one contact and upsert its campaign associations as a
    /// single unit; returns the contact id. Re-associating an existing
    /// (contact, campaign) pair is a no-op, never an error.
    async fn apply_import(&self, write: ContactWrite, campaign_ids: &[Uuid]) -> AppResult<Uuid>;

    /// Campaigns a contact belongs to
    async fn campaign_ids_for(&self, contact_id: Uuid) -> AppResult<Vec<Uuid>>;
}
