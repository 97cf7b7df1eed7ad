/// Contacts bounded context
///
/// Owns the stored-contact model, the LinkedIn profile URL rule and the
/// contact store port. Two store adapters ship with it: Diesel/Postgres for
/// the hosted backend and an in-memory store for local runs and tests.
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use domain::{
    CampaignContact, ContactFields, ContactRepository, ContactSource, ContactWrite, IdentityKey,
    ProfileUrl, StoredContact,
};
pub use infrastructure::{ContactRepositoryImpl, InMemoryContactRepository};
