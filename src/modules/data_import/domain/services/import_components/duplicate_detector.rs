use super::types::{CandidateContact, DuplicateMatch, MatchType};
use crate::modules::contacts::StoredContact;

/// Pure matcher between candidates and a snapshot of stored contacts
///
/// The snapshot may contain duplicates of its own; the first matching record wins.
#[derive(Debug, Clone, Default)]
pub struct DuplicateDetector;

impl DuplicateDetector {
    pub fn new() -> Self {
        Self
    }

    /// First stored contact matching by URL or by full name
    pub fn find_first_match<'a>(
        candidate: &CandidateContact,
        existing: &'a [StoredContact],
    ) -> Option<(&'a StoredContact, MatchType)> {
        existing.iter().find_map(|contact| {
            if contact.url_matches(&candidate.profile_url) {
                Some((contact, MatchType::Url))
            } else if contact.name_matches(&candidate.first_name, &candidate.last_name) {
                Some((contact, MatchType::Name))
            } else {
                None
            }
        })
    }

    /// Matches in candidate order; unmatched candidates are left out
    pub fn detect(&self, candidates: &[CandidateContact], existing: &[StoredContact]) -> Vec<DuplicateMatch> {
        candidates
            .iter()
            .filter_map(|candidate| {
                Self::find_first_match(candidate, existing).map(|(contact, match_type)| DuplicateMatch {
                    candidate: candidate.clone(),
                    existing: contact.clone(),
                    match_type,
                })
            })
            .collect()
    }
}
