use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::data_import::domain::services::import_components::{
    CandidateContact, DuplicateMatch, ImportRequest,
};

/// Caller payload for an import: one campaign set shared by every contact
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportContactsRequest {
    pub contacts: Vec<CandidateContact>,
    pub campaign_ids: Vec<Uuid>,
    #[serde(default)]
    pub overwrite_ids: Vec<Uuid>,
}

impl From<ImportContactsRequest> for ImportRequest {
    fn from(request: ImportContactsRequest) -> Self {
        ImportRequest::for_campaigns(
            request.contacts,
            request.campaign_ids,
            request.overwrite_ids.into_iter().collect(),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicatesResponse {
    pub duplicates: Vec<DuplicateMatch>,
}

impl From<Vec<DuplicateMatch>> for DuplicatesResponse {
    fn from(duplicates: Vec<DuplicateMatch>) -> Self {
        Self { duplicates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_fans_campaigns_out_to_every_contact() {
        let campaign = Uuid::new_v4();
        let overwrite = Uuid::new_v4();
        let json = serde_json::json!({
            "contacts": [
                {"firstName": "Jane", "lastName": "Doe", "profileUrl": "https://linkedin.com/in/jane"},
                {"firstName": "John", "lastName": "Roe", "profileUrl": "https://linkedin.com/in/john",
                 "company": "Acme", "connectedOn": "2023-03-15"}
            ],
            "campaignIds": [campaign],
            "overwriteIds": [overwrite]
        });

        let request: ImportRequest = serde_json::from_value::<ImportContactsRequest>(json)
            .unwrap()
            .into();

        assert_eq!(request.items.len(), 2);
        assert!(request.items.iter().all(|item| item.campaign_ids == vec![campaign]));
        assert!(request.overwrite_ids.contains(&overwrite));
        assert_eq!(request.items[1].candidate.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn overwrite_ids_default_to_empty() {
        let json = serde_json::json!({ "contacts": [], "campaignIds": [] });
        let request: ImportContactsRequest = serde_json::from_value(json).unwrap();
        assert!(request.overwrite_ids.is_empty());
    }
}
