pub mod entities;
pub mod repositories;
pub mod value_objects;

// Re-exports for easy access
pub use entities::campaign_contact::CampaignContact;
pub use entities::contact::{ContactFields, ContactSource, StoredContact};
pub use repositories::contact_repository::{ContactRepository, ContactWrite, IdentityKey};
pub use value_objects::profile_url::ProfileUrl;
