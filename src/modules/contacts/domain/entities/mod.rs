pub mod campaign_contact;
pub mod contact;
