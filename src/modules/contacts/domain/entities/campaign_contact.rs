use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Membership edge between a campaign and a contact, unique on the id pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignContact {
    pub campaign_id: Uuid,
    pub contact_id: Uuid,
    pub added_at: DateTime<Utc>,
}

impl CampaignContact {
    pub fn new(campaign_id: Uuid, contact_id: Uuid) -> Self {
        Self {
            campaign_id,
            contact_id,
            added_at: Utc::now(),
        }
    }

    pub fn key(&self) -> (Uuid, Uuid) {
        (self.campaign_id, self.contact_id)
    }
}
