use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// The single LinkedIn profile URL rule used at every boundary:
/// either scheme, optional `www.`, host `linkedin.com`, a non-empty path.
static LINKEDIN_PROFILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(www\.)?linkedin\.com/\S+$").expect("LinkedIn URL pattern is valid")
});

/// A trimmed URL that satisfies the LinkedIn profile rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileUrl(String);

impl ProfileUrl {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if Self::is_valid(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(format!("Invalid LinkedIn profile URL: {}", trimmed))
        }
    }

    pub fn is_valid(raw: &str) -> bool {
        LINKEDIN_PROFILE.is_match(raw.trim())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, the way duplicate matching compares URLs
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl TryFrom<String> for ProfileUrl {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProfileUrl> for String {
    fn from(value: ProfileUrl) -> Self {
        value.0
    }
}

impl std::fmt::Display for ProfileUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
