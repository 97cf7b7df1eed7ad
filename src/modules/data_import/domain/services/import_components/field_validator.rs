use chrono::{DateTime, NaiveDate};

use super::csv_parser::{CanonicalField, RawRow};
use super::types::{CandidateContact, ParseOutcome, ValidationError};
use crate::modules::contacts::ProfileUrl;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::LogContext;

/// Date layouts seen in connection exports, tried in order
const DATE_FORMATS: [&str; 5] = ["%d %b %Y", "%d %B %Y", "%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y"];

/// Result of checking one raw row
#[derive(Debug, Clone, PartialEq)]
pub enum RowVerdict {
    /// `soft_error` is set when an optional field was dropped
    Accepted {
        contact: CandidateContact,
        soft_error: Option<ValidationError>,
    },
    Rejected(ValidationError),
}

/// Turns raw rows into candidates, accumulating row errors instead of failing
#[derive(Debug, Clone, Default)]
pub struct FieldValidator;

impl FieldValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, row: &RawRow) -> RowVerdict {
        let first_name = row.get(CanonicalField::FirstName).trim();
        let last_name = row.get(CanonicalField::LastName).trim();
        let profile_url = row.get(CanonicalField::ProfileUrl).trim();

        let missing: Vec<&str> = [
            (CanonicalField::FirstName, first_name),
            (CanonicalField::LastName, last_name),
            (CanonicalField::ProfileUrl, profile_url),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field.header())
        .collect();

        if !missing.is_empty() {
            return RowVerdict::Rejected(ValidationError::new(
                row.row_number,
                format!("Missing required fields: {}", missing.join(", ")),
            ));
        }

        let profile_url = match ProfileUrl::parse(profile_url) {
            Ok(url) => url,
            Err(message) => return RowVerdict::Rejected(ValidationError::new(row.row_number, message)),
        };

        let raw_date = row.get(CanonicalField::ConnectedOn).trim();
        let (connected_on, soft_error) = if raw_date.is_empty() {
            (None, None)
        } else {
            match parse_connected_on(raw_date) {
                Some(date) => (Some(date), None),
                None => (
                    None,
                    Some(ValidationError::new(
                        row.row_number,
                        format!("Invalid {} date: {}", CanonicalField::ConnectedOn.header(), raw_date),
                    )),
                ),
            }
        };

        RowVerdict::Accepted {
            contact: CandidateContact {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                profile_url: profile_url.into(),
                email: optional(row.get(CanonicalField::Email)),
                company: optional(row.get(CanonicalField::Company)),
                position: optional(row.get(CanonicalField::Position)),
                connected_on,
            },
            soft_error,
        }
    }

    /// Drain a row sequence into a parse outcome; the first reader error aborts
    pub fn collect<I>(&self, rows: I) -> AppResult<ParseOutcome>
    where
        I: IntoIterator<Item = AppResult<RawRow>>,
    {
        let mut outcome = ParseOutcome::default();

        for row in rows {
            let row = row?;
            outcome.total_rows += 1;

            match self.validate(&row) {
                RowVerdict::Accepted {
                    contact,
                    soft_error,
                } => {
                    outcome.contacts.push(contact);
                    outcome.errors.extend(soft_error);
                }
                RowVerdict::Rejected(error) => outcome.errors.push(error),
            }
        }

        outcome.valid_rows = outcome.contacts.len();
        LogContext::parse_summary(outcome.total_rows, outcome.valid_rows, outcome.errors.len());

        Ok(outcome)
    }
}

/// Parse a `Connected On` value into a calendar date
pub fn parse_connected_on(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
