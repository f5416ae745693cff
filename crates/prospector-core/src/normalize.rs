//! Record normalization: one [`RawRecord`] in, one [`Contact`] out.
//!
//! Normalization is total. Missing or blank columns fall back to defaults
//! and no record is ever rejected.
//!
//! # Quality score
//!
//! | Group | Check | Points |
//! |-------|-------|--------|
//! | Basic | first name, last name | 5 each |
//! | Basic | email, title, company name | 10 each |
//! | Contact | LinkedIn URL | 10 |
//! | Contact | mobile or work-direct phone | 10 |
//! | Rich | keywords, technologies, industry, employee count | 5 each |
//! | Verification | email status `Verified` | 10 |
//! | Verification | catch-all status `Not Catch-all` | 10 |
//!
//! The weights sum to 100.

use crate::models::{CompanySizeBucket, Contact, ContactState, RawRecord};

/// Column names of the contact export.
pub mod columns {
    pub const ID: &str = "Apollo Contact Id";
    pub const FIRST_NAME: &str = "First Name";
    pub const LAST_NAME: &str = "Last Name";
    pub const EMAIL: &str = "Email";
    pub const EMAIL_STATUS: &str = "Email Status";
    pub const CATCH_ALL_STATUS: &str = "Primary Email Catch-all Status";
    pub const TITLE: &str = "Title";
    pub const SENIORITY: &str = "Seniority";
    pub const LINKEDIN_URL: &str = "Person Linkedin Url";
    pub const MOBILE_PHONE: &str = "Mobile Phone";
    pub const WORK_DIRECT_PHONE: &str = "Work Direct Phone";
    pub const COUNTRY: &str = "Country";
    pub const CITY: &str = "City";
    pub const COMPANY_NAME: &str = "Company Name";
    pub const WEBSITE: &str = "Website";
    pub const EMPLOYEES: &str = "# Employees";
    pub const INDUSTRY: &str = "Industry";
    pub const TECHNOLOGIES: &str = "Technologies";
    pub const KEYWORDS: &str = "Keywords";
    pub const STAGE: &str = "Stage";
    pub const REPLIED: &str = "Replied";
    pub const DEMOED: &str = "Demoed";
    pub const EMAIL_BOUNCED: &str = "Email Bounced";
    pub const EMAIL_OPEN: &str = "Email Open";
    pub const EMAIL_SENT: &str = "Email Sent";
}

pub const DEFAULT_EMAIL_STATUS: &str = "User Managed";
pub const DEFAULT_STAGE: &str = "Cold";

/// Substrings that mark a title or seniority as executive.
pub const EXECUTIVE_KEYWORDS: [&str; 7] = ["suite", "founder", "ceo", "cto", "cfo", "coo", "chief"];

/// Normalize one imported record into a [`Contact`].
pub fn normalize(record: &RawRecord) -> Contact {
    let company_size = parse_company_size(record.get(columns::EMPLOYEES));

    Contact {
        id: record.get(columns::ID).unwrap_or_default().to_string(),
        first_name: optional(record, columns::FIRST_NAME),
        last_name: optional(record, columns::LAST_NAME),
        email: record
            .present(columns::EMAIL)
            .unwrap_or_default()
            .to_string(),
        email_status: record
            .present(columns::EMAIL_STATUS)
            .unwrap_or(DEFAULT_EMAIL_STATUS)
            .to_string(),
        title: optional(record, columns::TITLE),
        seniority: optional(record, columns::SENIORITY),
        linkedin_url: optional(record, columns::LINKEDIN_URL),
        country: optional(record, columns::COUNTRY),
        city: optional(record, columns::CITY),
        company_name: optional(record, columns::COMPANY_NAME),
        company_website: optional(record, columns::WEBSITE),
        company_size,
        company_size_bucket: CompanySizeBucket::from_size(company_size),
        industry: optional(record, columns::INDUSTRY),
        technologies: parse_list(record.get(columns::TECHNOLOGIES).unwrap_or_default()),
        keywords: parse_list(record.get(columns::KEYWORDS).unwrap_or_default()),
        stage: record
            .present(columns::STAGE)
            .unwrap_or(DEFAULT_STAGE)
            .to_string(),
        contact_state: contact_state(record),
        quality_score: quality_score(record),
        is_executive: is_executive(
            record.get(columns::SENIORITY).unwrap_or_default(),
            record.get(columns::TITLE).unwrap_or_default(),
        ),
    }
}

fn optional(record: &RawRecord, column: &str) -> Option<String> {
    record.present(column).map(str::to_string)
}

/// Sum of weighted field-presence checks, always within `[0, 100]`.
pub fn quality_score(record: &RawRecord) -> u8 {
    let checks: [(bool, u8); 13] = [
        // Basic info
        (record.is_present(columns::FIRST_NAME), 5),
        (record.is_present(columns::LAST_NAME), 5),
        (record.is_present(columns::EMAIL), 10),
        (record.is_present(columns::TITLE), 10),
        (record.is_present(columns::COMPANY_NAME), 10),
        // Contact details
        (record.is_present(columns::LINKEDIN_URL), 10),
        (
            record.is_present(columns::MOBILE_PHONE)
                || record.is_present(columns::WORK_DIRECT_PHONE),
            10,
        ),
        // Rich data
        (record.is_present(columns::KEYWORDS), 5),
        (record.is_present(columns::TECHNOLOGIES), 5),
        (record.is_present(columns::INDUSTRY), 5),
        (record.is_present(columns::EMPLOYEES), 5),
        // Verification
        (record.get(columns::EMAIL_STATUS) == Some("Verified"), 10),
        (
            record.get(columns::CATCH_ALL_STATUS) == Some("Not Catch-all"),
            10,
        ),
    ];

    checks
        .iter()
        .filter(|(passed, _)| *passed)
        .map(|(_, points)| points)
        .sum()
}

/// Case-insensitive substring match of [`EXECUTIVE_KEYWORDS`] against
/// seniority and title. Not word-bounded: `"chiefly"` matches `chief`.
pub fn is_executive(seniority: &str, title: &str) -> bool {
    let seniority = seniority.to_lowercase();
    let title = title.to_lowercase();
    EXECUTIVE_KEYWORDS
        .iter()
        .any(|kw| seniority.contains(kw) || title.contains(kw))
}

/// First matching rule wins: replied, demoed, bounced, opened, sent, then
/// email presence decides between the not-contacted states and incomplete.
pub fn contact_state(record: &RawRecord) -> ContactState {
    if record.flag(columns::REPLIED) {
        return ContactState::Replied;
    }
    if record.flag(columns::DEMOED) {
        return ContactState::Demoed;
    }
    if record.flag(columns::EMAIL_BOUNCED) {
        return ContactState::Bounced;
    }
    if record.flag(columns::EMAIL_OPEN) {
        return ContactState::Opened;
    }
    if record.flag(columns::EMAIL_SENT) {
        return ContactState::Sent;
    }
    if record.is_present(columns::EMAIL) {
        if record.get(columns::STAGE) == Some("Interested") {
            return ContactState::InterestedNotContacted;
        }
        return ContactState::NotContacted;
    }
    ContactState::Incomplete
}

/// Split a comma-delimited cell into trimmed, non-empty entries.
/// Order is kept and duplicates are not removed.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Employee count; blank or unparseable values become 0.
/// Thousands separators (`"1,200"`) are accepted.
pub fn parse_company_size(raw: Option<&str>) -> u64 {
    raw.map(|s| s.trim().replace(',', ""))
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0)
}
