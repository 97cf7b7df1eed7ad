/// Diesel-based implementation of ContactRepository
///
/// Each `apply_import` runs in one transaction so a contact write and its
/// campaign associations land together or not at all. The transaction carries
/// its own `statement_timeout`; callers await it rather than abandon it.
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Array, Text};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;
use uuid::Uuid;

use crate::modules::contacts::domain::{ContactRepository, ContactWrite, IdentityKey, StoredContact};
use crate::modules::contacts::infrastructure::models::{
    ContactChangeset, ContactModel, NewCampaignContact, NewContactModel,
};
use crate::schema::{campaign_contacts, contacts};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use crate::shared::Database;
use crate::{log_debug, log_warn};

pub struct ContactRepositoryImpl {
    db: Arc<Database>,
    statement_timeout: Duration,
}

impl ContactRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            statement_timeout: Duration::from_secs(30),
        }
    }

    /// Upper bound for each statement of an import transaction
    pub fn with_statement_timeout(mut self, statement_timeout: Duration) -> Self {
        self.statement_timeout = statement_timeout;
        self
    }
}

#[async_trait]
impl ContactRepository for ContactRepositoryImpl {
    async fn find_by_identity(&self, keys: &[IdentityKey]) -> AppResult<Vec<StoredContact>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let db = Arc::clone(&self.db);
        let urls: Vec<String> = keys
            .iter()
            .map(|k| k.profile_url.trim().to_lowercase())
            .filter(|u| !u.is_empty())
            .collect();
        let first_names: Vec<String> = keys
            .iter()
            .map(|k| k.first_name.trim().to_lowercase())
            .collect();
        let last_names: Vec<String> = keys
            .iter()
            .map(|k| k.last_name.trim().to_lowercase())
            .collect();

        let start = std::time::Instant::now();
        let models = task::spawn_blocking(move || -> AppResult<Vec<ContactModel>> {
            let mut conn = db.get_connection()?;

            let rows: Vec<ContactModel> = diesel::sql_query(
                r#"
                SELECT id, first_name, last_name, linkedin_url, email, company,
                       position, connected_on, source, owner_id, created_at, updated_at
                FROM contacts
                WHERE lower(trim(linkedin_url)) = ANY($1)
                   OR EXISTS (
                       SELECT 1
                       FROM unnest($2::text[], $3::text[]) AS n(first_name, last_name)
                       WHERE lower(trim(contacts.first_name)) = n.first_name
                         AND lower(trim(contacts.last_name)) = n.last_name
                   )
                ORDER BY created_at ASC, id ASC
                "#,
            )
            .bind::<Array<Text>, _>(urls)
            .bind::<Array<Text>, _>(first_names)
            .bind::<Array<Text>, _>(last_names)
            .load(&mut conn)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to look up contacts by identity: {}", e))
            })?;

            Ok(rows)
        })
        .await??;

        LogContext::db_operation(
            "find_by_identity",
            "contacts",
            Some(start.elapsed().as_millis() as u64),
        );

        Ok(models.into_iter().map(|m| m.to_stored_contact()).collect())
    }

    async fn apply_import(&self, write: ContactWrite, campaign_ids: &[Uuid]) -> AppResult<Uuid> {
        let db = Arc::clone(&self.db);
        let campaign_ids = campaign_ids.to_vec();
        let timeout_ms = self.statement_timeout.as_millis().max(1);

        task::spawn_blocking(move || -> AppResult<Uuid> {
            let mut conn = db.get_connection()?;

            conn.transaction::<_, AppError, _>(|conn| {
                // Scoped to this transaction; the pooled connection keeps its default
                diesel::sql_query(format!("SET LOCAL statement_timeout = {}", timeout_ms)).execute(conn)?;

                let contact_id = match write {
                    ContactWrite::Insert(fields) => diesel::insert_into(contacts::table)
                        .values(NewContactModel::from(fields))
                        .returning(contacts::id)
                        .get_result::<Uuid>(conn)?,
                    ContactWrite::Update { id, fields } => {
                        let updated = diesel::update(contacts::table.find(id))
                            .set(ContactChangeset::from(fields))
                            .execute(conn)?;

                        if updated == 0 {
                            log_warn!("Contact {} vanished before overwrite", id);
                            return Err(AppError::NotFound(format!("Contact {} not found", id)));
                        }
                        id
                    }
                };

                for campaign_id in &campaign_ids {
                    let inserted = diesel::insert_into(campaign_contacts::table)
                        .values(NewCampaignContact {
                            campaign_id: *campaign_id,
                            contact_id,
                        })
                        .on_conflict((campaign_contacts::campaign_id, campaign_contacts::contact_id))
                        .do_nothing()
                        .execute(conn)?;

                    log_debug!(
                        "Campaign link {} -> {}: {}",
                        contact_id,
                        campaign_id,
                        if inserted == 0 { "already present" } else { "added" }
                    );
                }

                Ok(contact_id)
            })
        })
        .await?
    }

    async fn campaign_ids_for(&self, contact_id: Uuid) -> AppResult<Vec<Uuid>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<Vec<Uuid>> {
            let mut conn = db.get_connection()?;

            let ids = campaign_contacts::table
                .filter(campaign_contacts::contact_id.eq(contact_id))
                .select(campaign_contacts::campaign_id)
                .order(campaign_contacts::created_at.asc())
                .load::<Uuid>(&mut conn)?;

            Ok(ids)
        })
        .await?
    }
}
