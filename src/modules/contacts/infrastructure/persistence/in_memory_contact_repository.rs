use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::contacts::domain::{
    CampaignContact, ContactRepository, ContactWrite, IdentityKey, StoredContact,
};
use crate::shared::errors::{AppError, AppResult};

#[derive(Default)]
struct MemoryState {
    // Insertion order doubles as the "oldest first" order lookups promise
    contacts: Vec<StoredContact>,
    links: Vec<CampaignContact>,
    link_keys: BTreeSet<(Uuid, Uuid)>,
}

/// Process-local contact store
///
/// Holds the whole table behind one lock; `apply_import` takes the write lock
/// for the full insert/update + association step.
#[derive(Default)]
pub struct InMemoryContactRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing contacts
    pub fn with_contacts(contacts: Vec<StoredContact>) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                contacts,
                ..MemoryState::default()
            }),
        }
    }

    pub async fn contacts(&self) -> Vec<StoredContact> {
        self.state.read().await.contacts.clone()
    }

    pub async fn associations(&self) -> Vec<CampaignContact> {
        self.state.read().await.links.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<StoredContact> {
        self.state
            .read()
            .await
            .contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }
}

fn matches_key(contact: &StoredContact, key: &IdentityKey) -> bool {
    contact.url_matches(&key.profile_url) || contact.name_matches(&key.first_name, &key.last_name)
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn find_by_identity(&self, keys: &[IdentityKey]) -> AppResult<Vec<StoredContact>> {
        let state = self.state.read().await;

        Ok(state
            .contacts
            .iter()
            .filter(|contact| keys.iter().any(|key| matches_key(contact, key)))
            .cloned()
            .collect())
    }

    async fn apply_import(&self, write: ContactWrite, campaign_ids: &[Uuid]) -> AppResult<Uuid> {
        let mut state = self.state.write().await;

        let contact_id = match write {
            ContactWrite::Insert(fields) => {
                let contact = StoredContact::from_fields(fields);
                let id = contact.id;
                state.contacts.push(contact);
                id
            }
            ContactWrite::Update { id, fields } => {
                let existing = state
                    .contacts
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(|| AppError::NotFound(format!("Contact {} not found", id)))?;
                existing.apply_fields(fields);
                id
            }
        };

        for campaign_id in campaign_ids {
            if state.link_keys.insert((*campaign_id, contact_id)) {
                state.links.push(CampaignContact::new(*campaign_id, contact_id));
            }
        }

        Ok(contact_id)
    }

    async fn campaign_ids_for(&self, contact_id: Uuid) -> AppResult<Vec<Uuid>> {
        let state = self.state.read().await;

        Ok(state
            .links
            .iter()
            .filter(|link| link.contact_id == contact_id)
            .map(|link| link.campaign_id)
            .collect())
    }
}
