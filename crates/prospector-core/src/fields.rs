//! Named contact fields for dynamic lookup.
//!
//! Generic filter clauses and stats breakdowns address contact fields by
//! name. Rather than reflecting over arbitrary keys, names resolve to the
//! closed [`ContactField`] enumeration, and each variant maps to a typed
//! accessor returning a [`FieldValue`].

use serde_json::Value;

use crate::models::Contact;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Id,
    FirstName,
    LastName,
    Email,
    EmailStatus,
    Title,
    Seniority,
    LinkedinUrl,
    Country,
    City,
    CompanyName,
    CompanyWebsite,
    CompanySize,
    CompanySizeBucket,
    Industry,
    Technologies,
    Keywords,
    Stage,
    ContactState,
    QualityScore,
    IsExecutive,
}

impl ContactField {
    pub const ALL: [ContactField; 21] = [
        ContactField::Id,
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Email,
        ContactField::EmailStatus,
        ContactField::Title,
        ContactField::Seniority,
        ContactField::LinkedinUrl,
        ContactField::Country,
        ContactField::City,
        ContactField::CompanyName,
        ContactField::CompanyWebsite,
        ContactField::CompanySize,
        ContactField::CompanySizeBucket,
        ContactField::Industry,
        ContactField::Technologies,
        ContactField::Keywords,
        ContactField::Stage,
        ContactField::ContactState,
        ContactField::QualityScore,
        ContactField::IsExecutive,
    ];

    /// Serialized (camelCase) name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            ContactField::Id => "id",
            ContactField::FirstName => "firstName",
            ContactField::LastName => "lastName",
            ContactField::Email => "email",
            ContactField::EmailStatus => "emailStatus",
            ContactField::Title => "title",
            ContactField::Seniority => "seniority",
            ContactField::LinkedinUrl => "linkedinUrl",
            ContactField::Country => "country",
            ContactField::City => "city",
            ContactField::CompanyName => "companyName",
            ContactField::CompanyWebsite => "companyWebsite",
            ContactField::CompanySize => "companySize",
            ContactField::CompanySizeBucket => "companySizeBucket",
            ContactField::Industry => "industry",
            ContactField::Technologies => "technologies",
            ContactField::Keywords => "keywords",
            ContactField::Stage => "stage",
            ContactField::ContactState => "contactState",
            ContactField::QualityScore => "qualityScore",
            ContactField::IsExecutive => "isExecutive",
        }
    }

    /// Resolve a field name. Accepts the camelCase name or its snake_case
    /// spelling (`company_name`); anything else is `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let folded: String = name.chars().filter(|c| *c != '_').collect();
        ContactField::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(&folded))
    }

    pub fn value<'a>(&self, c: &'a Contact) -> FieldValue<'a> {
        fn opt(v: &Option<String>) -> FieldValue<'_> {
            v.as_deref().map_or(FieldValue::Missing, FieldValue::Text)
        }

        match self {
            ContactField::Id => FieldValue::Text(&c.id),
            ContactField::FirstName => opt(&c.first_name),
            ContactField::LastName => opt(&c.last_name),
            ContactField::Email => FieldValue::Text(&c.email),
            ContactField::EmailStatus => FieldValue::Text(&c.email_status),
            ContactField::Title => opt(&c.title),
            ContactField::Seniority => opt(&c.seniority),
            ContactField::LinkedinUrl => opt(&c.linkedin_url),
            ContactField::Country => opt(&c.country),
            ContactField::City => opt(&c.city),
            ContactField::CompanyName => opt(&c.company_name),
            ContactField::CompanyWebsite => opt(&c.company_website),
            ContactField::CompanySize => FieldValue::Number(i64::try_from(c.company_size).unwrap_or(i64::MAX)),
            ContactField::CompanySizeBucket => FieldValue::Text(c.company_size_bucket.label()),
            ContactField::Industry => opt(&c.industry),
            ContactField::Technologies => FieldValue::List(&c.technologies),
            ContactField::Keywords => FieldValue::List(&c.keywords),
            ContactField::Stage => FieldValue::Text(&c.stage),
            ContactField::ContactState => FieldValue::Text(c.contact_state.as_str()),
            ContactField::QualityScore => FieldValue::Number(i64::from(c.quality_score)),
            ContactField::IsExecutive => FieldValue::Bool(c.is_executive),
        }
    }
}

/// A borrowed, typed view of one contact field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    Number(i64),
    Bool(bool),
    List(&'a [String]),
}

impl FieldValue<'_> {
    /// Empty text, empty lists, zero, false and missing values are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Missing => false,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Number(n) => *n != 0,
            FieldValue::Bool(b) => *b,
            FieldValue::List(items) => !items.is_empty(),
        }
    }

    /// String rendering used for substring tests and group-by keys.
    /// Lists join with `", "`. `None` for missing values.
    pub fn render(&self) -> Option<String> {
        match self {
            FieldValue::Missing => None,
            FieldValue::Text(s) => Some((*s).to_string()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::List(items) => Some(items.join(", ")),
        }
    }

    /// Numeric view for ordered comparisons. Missing counts as 0.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Missing => Some(0.0),
            FieldValue::Number(n) => Some(*n as f64),
            FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::List(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Missing => Value::Null,
            FieldValue::Text(s) => Value::String((*s).to_string()),
            FieldValue::Number(n) => Value::from(*n),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::List(items) => {
                Value::Array(items.iter().map(|s| Value::String(s.clone())).collect())
            }
        }
    }
}
