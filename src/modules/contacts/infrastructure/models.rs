/// Diesel models for the contacts tables
use crate::modules::contacts::domain::{ContactFields, StoredContact};
use crate::schema::{campaign_contacts, contacts};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Diesel model for querying contacts
#[derive(Queryable, Selectable, QueryableByName, Debug, Clone)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ContactModel {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub connected_on: Option<NaiveDate>,
    pub source: Option<String>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactModel {
    pub fn to_stored_contact(self) -> StoredContact {
        StoredContact {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            linkedin_url: self.linkedin_url,
            email: self.email,
            company: self.company,
            position: self.position,
            connected_on: self.connected_on,
            source: self.source,
            owner_id: self.owner_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Diesel model for inserting an imported contact (unassigned)
#[derive(Insertable, Debug)]
#[diesel(table_name = contacts)]
pub struct NewContactModel {
    pub first_name: String,
    pub last_name: String,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub connected_on: Option<NaiveDate>,
    pub source: Option<String>,
    pub owner_id: Option<Uuid>,
}

impl From<ContactFields> for NewContactModel {
    fn from(fields: ContactFields) -> Self {
        Self {
            first_name: fields.first_name,
            last_name: fields.last_name,
            linkedin_url: Some(fields.linkedin_url),
            email: fields.email,
            company: fields.company,
            position: fields.position,
            connected_on: fields.connected_on,
            source: Some(fields.source.to_string()),
            owner_id: None,
        }
    }
}

/// Overwrite changeset; absent optional fields clear the column
#[derive(AsChangeset, Debug)]
#[diesel(table_name = contacts)]
#[diesel(treat_none_as_null = true)]
pub struct ContactChangeset {
    pub first_name: String,
    pub last_name: String,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub connected_on: Option<NaiveDate>,
    pub source: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContactFields> for ContactChangeset {
    fn from(fields: ContactFields) -> Self {
        Self {
            first_name: fields.first_name,
            last_name: fields.last_name,
            linkedin_url: Some(fields.linkedin_url),
            email: fields.email,
            company: fields.company,
            position: fields.position,
            connected_on: fields.connected_on,
            source: Some(fields.source.to_string()),
            updated_at: Utc::now(),
        }
    }
}

/// Diesel model for the campaign membership edge
#[derive(Insertable, Debug)]
#[diesel(table_name = campaign_contacts)]
pub struct NewCampaignContact {
    pub campaign_id: Uuid,
    pub contact_id: Uuid,
}
