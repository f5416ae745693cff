//! Distribution summaries over the full contact set.
//!
//! Backs the `get_contact_stats` tool and `prospector stats`.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::fields::ContactField;
use crate::models::{Contact, ContactState};

/// Quality score at or above which an uncontacted contact is a high-value target.
pub const HIGH_QUALITY_THRESHOLD: u8 = 70;

/// Group-by key for missing values and unknown field names.
pub const UNKNOWN_KEY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighValueTargets {
    pub executives: usize,
    pub verified_not_contacted: usize,
    pub high_quality_not_contacted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactStats {
    pub total: usize,
    /// Only states that occur appear as keys.
    pub by_state: BTreeMap<ContactState, usize>,
    pub by_stage: BTreeMap<String, usize>,
    pub high_value_targets: HighValueTargets,
    /// Mean quality score rounded to one decimal; 0 for an empty set.
    pub avg_quality_score: f64,
    /// Present only when a `group_by` field was requested.
    pub breakdown: Option<BTreeMap<String, usize>>,
}

/// Aggregate the whole contact set, optionally grouped by one named field.
pub fn aggregate(contacts: &[Contact], group_by: Option<&str>) -> ContactStats {
    let mut by_state: BTreeMap<ContactState, usize> = BTreeMap::new();
    let mut by_stage: BTreeMap<String, usize> = BTreeMap::new();
    let mut executives = 0;
    let mut verified_not_contacted = 0;
    let mut high_quality_not_contacted = 0;
    let mut score_sum: u64 = 0;

    for c in contacts {
        *by_state.entry(c.contact_state).or_insert(0) += 1;
        *by_stage.entry(c.stage.clone()).or_insert(0) += 1;

        if c.is_executive {
            executives += 1;
        }
        if c.email_status == "Verified" && c.contact_state == ContactState::NotContacted {
            verified_not_contacted += 1;
        }
        if c.quality_score >= HIGH_QUALITY_THRESHOLD && c.contact_state.is_uncontacted() {
            high_quality_not_contacted += 1;
        }
        score_sum += u64::from(c.quality_score);
    }

    let avg_quality_score = if contacts.is_empty() {
        0.0
    } else {
        round_one_decimal(score_sum as f64 / contacts.len() as f64)
    };

    let breakdown = group_by
        .filter(|g| !g.is_empty())
        .map(|g| group_counts(contacts, g));

    ContactStats {
        total: contacts.len(),
        by_state,
        by_stage,
        high_value_targets: HighValueTargets {
            executives,
            verified_not_contacted,
            high_quality_not_contacted,
        },
        avg_quality_score,
        breakdown,
    }
}

/// Count contacts by the rendered value of `field`. Missing values, empty
/// text, and unknown field names all land under [`UNKNOWN_KEY`].
pub fn group_counts(contacts: &[Contact], field: &str) -> BTreeMap<String, usize> {
    let field = ContactField::parse(field);
    let mut counts = BTreeMap::new();
    for c in contacts {
        let key = field
            .and_then(|f| f.value(c).render())
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| UNKNOWN_KEY.to_string());
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

fn round_one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
