use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provenance tag written on every contact this crate stores
///
/// Records created elsewhere in the CRM carry their own free-text `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactSource {
    #[serde(rename = "CSV Import")]
    CsvImport,
}

impl ContactSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactSource::CsvImport => "CSV Import",
        }
    }
}

impl std::fmt::Display for ContactSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv import" => Ok(ContactSource::CsvImport),
            _ => Err(format!("Invalid contact source: {}", s)),
        }
    }
}

/// A contact as the store holds it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredContact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub connected_on: Option<NaiveDate>,
    pub source: Option<String>,
    /// `None` means unassigned
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredContact {
    /// Build a fresh, unassigned record from writable fields
    pub fn from_fields(fields: ContactFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: fields.first_name,
            last_name: fields.last_name,
            linkedin_url: Some(fields.linkedin_url),
            email: fields.email,
            company: fields.company,
            position: fields.position,
            connected_on: fields.connected_on,
            source: Some(fields.source.to_string()),
            owner_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every import-owned field; identity, owner and creation time are kept
    pub fn apply_fields(&mut self, fields: ContactFields) {
        self.first_name = fields.first_name;
        self.last_name = fields.last_name;
        self.linkedin_url = Some(fields.linkedin_url);
        self.email = fields.email;
        self.company = fields.company;
        self.position = fields.position;
        self.connected_on = fields.connected_on;
        self.source = Some(fields.source.to_string());
        self.updated_at = Utc::now();
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Stored URL equals `profile_url`, ignoring case; a contact without a URL never matches
    pub fn url_matches(&self, profile_url: &str) -> bool {
        let wanted = profile_url.trim();
        match self.linkedin_url.as_deref() {
            Some(url) if !wanted.is_empty() => url.trim().to_lowercase() == wanted.to_lowercase(),
            _ => false,
        }
    }

    /// First and last name both equal, ignoring case
    pub fn name_matches(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name.trim().to_lowercase() == first_name.trim().to_lowercase()
            && self.last_name.trim().to_lowercase() == last_name.trim().to_lowercase()
    }
}

/// The mutable columns an import writes
#[derive(Debug, Clone, PartialEq)]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub linkedin_url: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub connected_on: Option<NaiveDate>,
    pub source: ContactSource,
}
