/// Test data factories using builder pattern
///
/// Provides convenient methods to create test data with sensible defaults
use chrono::{NaiveDate, Utc};
use leadbook::modules::contacts::StoredContact;
use leadbook::modules::data_import::CandidateContact;
use uuid::Uuid;

pub struct CandidateFactory {
    first_name: String,
    last_name: String,
    profile_url: String,
    email: Option<String>,
    company: Option<String>,
    position: Option<String>,
    connected_on: Option<NaiveDate>,
}

impl Default for CandidateFactory {
    fn default() -> Self {
        Self {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            profile_url: "https://www.linkedin.com/in/janedoe".to_string(),
            email: None,
            company: None,
            position: None,
            connected_on: None,
        }
    }
}

impl CandidateFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct name and URL per index
    pub fn numbered(index: usize) -> Self {
        Self::new()
            .name(&format!("First{}", index), &format!("Last{}", index))
            .url(&format!("https://www.linkedin.com/in/person-{}", index))
    }

    pub fn name(mut self, first: &str, last: &str) -> Self {
        self.first_name = first.to_string();
        self.last_name = last.to_string();
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.profile_url = url.to_string();
        self
    }

    pub fn company(mut self, company: &str) -> Self {
        self.company = Some(company.to_string());
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn position(mut self, position: &str) -> Self {
        self.position = Some(position.to_string());
        self
    }

    pub fn connected_on(mut self, year: i32, month: u32, day: u32) -> Self {
        self.connected_on = NaiveDate::from_ymd_opt(year, month, day);
        self
    }

    pub fn build(self) -> CandidateContact {
        CandidateContact {
            first_name: self.first_name,
            last_name: self.last_name,
            profile_url: self.profile_url,
            email: self.email,
            company: self.company,
            position: self.position,
            connected_on: self.connected_on,
        }
    }
}

pub struct StoredContactFactory {
    first_name: String,
    last_name: String,
    linkedin_url: Option<String>,
    owner_id: Option<Uuid>,
}

impl Default for StoredContactFactory {
    fn default() -> Self {
        Self {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            linkedin_url: Some("https://www.linkedin.com/in/janedoe".to_string()),
            owner_id: None,
        }
    }
}

impl StoredContactFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, first: &str, last: &str) -> Self {
        self.first_name = first.to_string();
        self.last_name = last.to_string();
        self
    }

    pub fn url(mut self, url: Option<&str>) -> Self {
        self.linkedin_url = url.map(str::to_string);
        self
    }

    pub fn owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn build(self) -> StoredContact {
        StoredContact {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            linkedin_url: self.linkedin_url,
            email: None,
            company: None,
            position: None,
            connected_on: None,
            source: Some("Manual".to_string()),
            owner_id: self.owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Builds a connections export the way the export tool lays it out
pub struct ExportFileBuilder {
    lines: Vec<String>,
    with_notes: bool,
    with_bom: bool,
    line_ending: &'static str,
}

impl Default for ExportFileBuilder {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            with_notes: false,
            with_bom: false,
            line_ending: "\n",
        }
    }
}

impl ExportFileBuilder {
    pub const HEADER: &'static str =
        "First Name,Last Name,URL,Email Address,Company,Position,Connected On";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(mut self) -> Self {
        self.with_notes = true;
        self
    }

    pub fn with_bom(mut self) -> Self {
        self.with_bom = true;
        self
    }

    pub fn crlf(mut self) -> Self {
        self.line_ending = "\r\n";
        self
    }

    /// Append a raw CSV line
    pub fn line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn contact(self, first: &str, last: &str, url: &str, company: &str, connected_on: &str) -> Self {
        let line = format!("{},{},{},,\"{}\",,{}", first, last, url, company, connected_on);
        self.line(&line)
    }

    /// `count` distinct valid contacts
    pub fn numbered_contacts(mut self, count: usize) -> Self {
        for i in 0..count {
            self = self.contact(
                &format!("First{}", i),
                &format!("Last{}", i),
                &format!("https://www.linkedin.com/in/person-{}", i),
                "Acme, Inc.",
                "15 Mar 2023",
            );
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut rows = vec![Self::HEADER.to_string()];
        if self.with_notes {
            rows.push("Notes:,,,,,,".to_string());
            rows.push(
                "\"When exporting your connection data, you may notice that some of the email addresses are missing.\",,,,,,"
                    .to_string(),
            );
            rows.push(",,,,,,".to_string());
        }
        rows.extend(self.lines);

        let mut content = rows.join(self.line_ending);
        content.push_str(self.line_ending);

        let mut bytes = Vec::new();
        if self.with_bom {
            bytes.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
        }
        bytes.extend_from_slice(content.as_bytes());
        bytes
    }
}
