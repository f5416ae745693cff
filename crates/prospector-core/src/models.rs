//! Core data models used throughout Prospector.
//!
//! A [`RawRecord`] is one imported row, exactly as the backing store hands
//! it over. The normalizer turns it into a [`Contact`], which carries the
//! derived score, executive flag, state, and size bucket. Query surfaces
//! never expose a full `Contact`; they return a [`ContactSummary`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One imported row: source column name → string value.
///
/// Any column may be absent. Numeric columns arrive as strings, possibly
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(column, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Raw value of a column, if the column exists.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Value of a column if it exists and is not blank.
    pub fn present(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.trim().is_empty())
    }

    /// True when the column holds a non-blank value.
    pub fn is_present(&self, column: &str) -> bool {
        self.present(column).is_some()
    }

    /// Interaction flags are exported as `"true"` / `"True"`; anything else is false.
    pub fn flag(&self, column: &str) -> bool {
        matches!(self.get(column), Some("true") | Some("True"))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Outreach state of a contact, derived from interaction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactState {
    Replied,
    Demoed,
    Bounced,
    Opened,
    Sent,
    InterestedNotContacted,
    NotContacted,
    Incomplete,
}

impl ContactState {
    pub const ALL: [ContactState; 8] = [
        ContactState::Replied,
        ContactState::Demoed,
        ContactState::Bounced,
        ContactState::Opened,
        ContactState::Sent,
        ContactState::InterestedNotContacted,
        ContactState::NotContacted,
        ContactState::Incomplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactState::Replied => "REPLIED",
            ContactState::Demoed => "DEMOED",
            ContactState::Bounced => "BOUNCED",
            ContactState::Opened => "OPENED",
            ContactState::Sent => "SENT",
            ContactState::InterestedNotContacted => "INTERESTED_NOT_CONTACTED",
            ContactState::NotContacted => "NOT_CONTACTED",
            ContactState::Incomplete => "INCOMPLETE",
        }
    }

    /// Not yet reached out to, whether or not marked interested.
    pub fn is_uncontacted(&self) -> bool {
        matches!(
            self,
            ContactState::NotContacted | ContactState::InterestedNotContacted
        )
    }
}

impl fmt::Display for ContactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ContactState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactState::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| format!("unknown contact state: {}", s))
    }
}

/// Ordinal company-size bucket derived from the employee count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompanySizeBucket {
    #[serde(rename = "1-10 (Micro)")]
    Micro,
    #[serde(rename = "11-50 (Small)")]
    Small,
    #[serde(rename = "51-200 (Medium)")]
    Medium,
    #[serde(rename = "201-500 (Large)")]
    Large,
    #[serde(rename = "500+ (Enterprise)")]
    Enterprise,
}

impl CompanySizeBucket {
    /// Upper bounds are inclusive: 10 is Micro, 11 is Small.
    pub fn from_size(employees: u64) -> Self {
        match employees {
            0..=10 => CompanySizeBucket::Micro,
            11..=50 => CompanySizeBucket::Small,
            51..=200 => CompanySizeBucket::Medium,
            201..=500 => CompanySizeBucket::Large,
            _ => CompanySizeBucket::Enterprise,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompanySizeBucket::Micro => "1-10 (Micro)",
            CompanySizeBucket::Small => "11-50 (Small)",
            CompanySizeBucket::Medium => "51-200 (Medium)",
            CompanySizeBucket::Large => "201-500 (Large)",
            CompanySizeBucket::Enterprise => "500+ (Enterprise)",
        }
    }
}

impl fmt::Display for CompanySizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Normalized contact. Built fresh from a [`RawRecord`] on every load and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Source contact id; may be empty and is not guaranteed unique.
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Empty string when the record has no email.
    pub email: String,
    pub email_status: String,
    pub title: Option<String>,
    pub seniority: Option<String>,
    pub linkedin_url: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub company_size: u64,
    pub company_size_bucket: CompanySizeBucket,
    pub industry: Option<String>,
    pub technologies: Vec<String>,
    pub keywords: Vec<String>,
    pub stage: String,
    pub contact_state: ContactState,
    /// Data completeness score in `[0, 100]`.
    pub quality_score: u8,
    pub is_executive: bool,
}

/// The bounded projection returned by query surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub quality_score: u8,
    pub is_executive: bool,
    pub contact_state: ContactState,
}

impl From<&Contact> for ContactSummary {
    fn from(c: &Contact) -> Self {
        Self {
            id: c.id.clone(),
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            email: c.email.clone(),
            title: c.title.clone(),
            company_name: c.company_name.clone(),
            industry: c.industry.clone(),
            country: c.country.clone(),
            quality_score: c.quality_score,
            is_executive: c.is_executive,
            contact_state: c.contact_state,
        }
    }
}

impl ContactSummary {
    /// Display name, `"-"` when neither part is known.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(" ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_bucket_boundaries() {
        assert_eq!(CompanySizeBucket::from_size(0), CompanySizeBucket::Micro);
        assert_eq!(CompanySizeBucket::from_size(10), CompanySizeBucket::Micro);
        assert_eq!(CompanySizeBucket::from_size(11), CompanySizeBucket::Small);
        assert_eq!(CompanySizeBucket::from_size(50), CompanySizeBucket::Small);
        assert_eq!(CompanySizeBucket::from_size(51), CompanySizeBucket::Medium);
        assert_eq!(CompanySizeBucket::from_size(200), CompanySizeBucket::Medium);
        assert_eq!(CompanySizeBucket::from_size(201), CompanySizeBucket::Large);
        assert_eq!(CompanySizeBucket::from_size(500), CompanySizeBucket::Large);
        assert_eq!(
            CompanySizeBucket::from_size(501),
            CompanySizeBucket::Enterprise
        );
    }

    #[test]
    fn test_bucket_serializes_as_label() {
        let json = serde_json::to_value(CompanySizeBucket::Medium).unwrap();
        assert_eq!(json, serde_json::json!("51-200 (Medium)"));
    }

    #[test]
    fn test_contact_state_round_trips_through_str() {
        for state in ContactState::ALL {
            assert_eq!(state.as_str().parse::<ContactState>(), Ok(state));
            assert_eq!(
                serde_json::to_value(state).unwrap(),
                serde_json::json!(state.as_str())
            );
        }
        assert!("not_contacted".parse::<ContactState>().is_err());
    }

    #[test]
    fn test_flag_accepts_only_true_spellings() {
        let rec = RawRecord::from_pairs([
            ("a", "true"),
            ("b", "True"),
            ("c", "TRUE"),
            ("d", "1"),
            ("e", ""),
            ("f", " true"),
        ]);
        assert!(rec.flag("a"));
        assert!(rec.flag("b"));
        assert!(!rec.flag("c"));
        assert!(!rec.flag("d"));
        assert!(!rec.flag("e"));
        assert!(!rec.flag("f"));
        assert!(!rec.flag("missing"));
    }

    #[test]
    fn test_blank_values_are_not_present() {
        let rec = RawRecord::from_pairs([("Email", "   "), ("Title", "CEO")]);
        assert!(!rec.is_present("Email"));
        assert!(rec.is_present("Title"));
        assert_eq!(rec.get("Email"), Some("   "));
    }
}
