//! Keyword-overlap relevance ranking for `vector_search_contacts`.
//!
//! Despite the tool name this is not embedding search. The query is reduced
//! to the terms of a fixed domain vocabulary that it mentions, and each
//! contact scores one point per term found in its searchable text.
//!
//! # Algorithm
//!
//! 1. Extract vocabulary terms contained in the lowercased query.
//! 2. Build each contact's text: title, company, industry, keywords,
//!    technologies, space-joined and lowercased.
//! 3. Score = number of extracted terms found in that text (each term
//!    counts once). Contacts scoring 0 are dropped.
//! 4. Apply quality floor, executive flag, and country filters.
//! 5. Stable sort by score (desc); ties keep repository order.
//! 6. Truncate to `top_k`.
//! 7. `relevanceScore = score / extracted terms`, in `[0, 1]`.

use serde::Serialize;

use crate::models::{Contact, ContactSummary};

/// The closed domain vocabulary recognized in queries.
pub const VOCABULARY: [&str; 9] = [
    "fintech",
    "payment",
    "saas",
    "travel",
    "cfo",
    "ceo",
    "executive",
    "colombia",
    "mexico",
];

pub const FALLBACK_NOTE: &str =
    "Using keyword-based fallback. Run embedding generation for true semantic search.";

/// Post-score filters for a ranking request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankFilters {
    pub min_quality_score: Option<i64>,
    pub is_executive: Option<bool>,
    pub country: Option<String>,
}

impl RankFilters {
    fn matches(&self, c: &Contact) -> bool {
        if let Some(min) = self.min_quality_score.filter(|m| *m > 0) {
            if i64::from(c.quality_score) < min {
                return false;
            }
        }
        if let Some(exec) = self.is_executive {
            if c.is_executive != exec {
                return false;
            }
        }
        if let Some(country) = self.country.as_deref().filter(|s| !s.is_empty()) {
            if c.country.as_deref() != Some(country) {
                return false;
            }
        }
        true
    }
}

/// A ranked contact: the summary projection plus its relevance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedContact {
    #[serde(flatten)]
    pub contact: ContactSummary,
    /// Raw count of matched terms.
    #[serde(skip)]
    pub score: usize,
    pub relevance_score: f64,
}

/// Wire shape of the `vector_search_contacts` tool response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub contacts: Vec<RankedContact>,
    /// Number of contacts returned (after truncation).
    pub total_matched: usize,
    pub search_query: String,
    pub extracted_keywords: Vec<String>,
    pub note: String,
}

/// Vocabulary terms present in the query, in vocabulary order.
pub fn extract_keywords(query: &str) -> Vec<String> {
    let query = query.to_lowercase();
    VOCABULARY
        .iter()
        .filter(|term| query.contains(*term))
        .map(|term| term.to_string())
        .collect()
}

/// Lowercased searchable text of a contact.
pub fn searchable_text(c: &Contact) -> String {
    [
        c.title.as_deref().unwrap_or_default().to_string(),
        c.company_name.as_deref().unwrap_or_default().to_string(),
        c.industry.as_deref().unwrap_or_default().to_string(),
        c.keywords.join(" "),
        c.technologies.join(" "),
    ]
    .join(" ")
    .to_lowercase()
}

/// Count of `keywords` occurring in the contact's searchable text.
pub fn score_contact(c: &Contact, keywords: &[String]) -> usize {
    let text = searchable_text(c);
    keywords.iter().filter(|kw| text.contains(kw.as_str())).count()
}

/// Rank contacts against the keywords of `query`.
pub fn rank(contacts: &[Contact], query: &str, top_k: usize, filters: &RankFilters) -> RankResponse {
    let keywords = extract_keywords(query);

    let mut scored: Vec<(&Contact, usize)> = contacts
        .iter()
        .map(|c| (c, score_contact(c, &keywords)))
        .filter(|(_, score)| *score > 0)
        .collect();

    // `sort_by` is stable, so equal scores keep repository order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let ranked: Vec<RankedContact> = scored
        .into_iter()
        .filter(|(c, _)| filters.matches(c))
        .take(top_k)
        .map(|(c, score)| RankedContact {
            contact: ContactSummary::from(c),
            score,
            relevance_score: if keywords.is_empty() {
                0.0
            } else {
                score as f64 / keywords.len() as f64
            },
        })
        .collect();

    RankResponse {
        total_matched: ranked.len(),
        contacts: ranked,
        search_query: query.to_string(),
        extracted_keywords: keywords,
        note: FALLBACK_NOTE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;
    use crate::normalize::{columns, normalize};

    fn contact(id: &str, pairs: &[(&str, &str)]) -> Contact {
        let mut rec = RawRecord::from_pairs(pairs.iter().copied());
        rec.insert(columns::ID, id);
        normalize(&rec)
    }

    fn dataset() -> Vec<Contact> {
        vec![
            contact(
                "travel-analyst",
                &[(columns::TITLE, "Analyst"), (columns::INDUSTRY, "Travel")],
            ),
            contact(
                "fintech-cfo",
                &[
                    (columns::TITLE, "CFO"),
                    (columns::INDUSTRY, "Financial Services"),
                    (columns::KEYWORDS, "fintech, payments"),
                    (columns::COUNTRY, "Colombia"),
                ],
            ),
            contact(
                "saas-ceo",
                &[
                    (columns::TITLE, "CEO"),
                    (columns::TECHNOLOGIES, "SaaS billing"),
                    (columns::COUNTRY, "Mexico"),
                ],
            ),
            contact(
                "payments-ops",
                &[(columns::TITLE, "Ops"), (columns::KEYWORDS, "payment rails")],
            ),
        ]
    }

    fn ids(resp: &RankResponse) -> Vec<&str> {
        resp.contacts.iter().map(|c| c.contact.id.as_str()).collect()
    }

    #[test]
    fn test_extract_keywords_uses_vocabulary_order() {
        assert_eq!(
            extract_keywords("Find CFOs at Fintech payment startups"),
            vec!["fintech", "payment", "cfo"]
        );
        assert!(extract_keywords("marketing managers in Peru").is_empty());
    }

    #[test]
    fn test_each_keyword_counts_once() {
        let c = contact("x", &[(columns::KEYWORDS, "fintech, fintech, fintech")]);
        assert_eq!(score_contact(&c, &["fintech".to_string()]), 1);
    }

    #[test]
    fn test_no_keywords_yields_empty_result() {
        let resp = rank(&dataset(), "who should I call?", 20, &RankFilters::default());
        assert!(resp.extracted_keywords.is_empty());
        assert!(resp.contacts.is_empty());
        assert_eq!(resp.total_matched, 0);
        assert_eq!(resp.note, FALLBACK_NOTE);
    }

    #[test]
    fn test_sorted_by_score_with_stable_ties() {
        let resp = rank(
            &dataset(),
            "fintech payment cfo ceo travel",
            20,
            &RankFilters::default(),
        );
        // fintech-cfo: fintech + payment + cfo = 3; the rest score 1 each.
        assert_eq!(
            ids(&resp),
            vec!["fintech-cfo", "travel-analyst", "saas-ceo", "payments-ops"]
        );
        let scores: Vec<usize> = resp.contacts.iter().map(|c| c.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        for c in &resp.contacts {
            assert!((0.0..=1.0).contains(&c.relevance_score));
        }
        assert!((resp.contacts[0].relevance_score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_filters_and_top_k() {
        let filters = RankFilters {
            is_executive: Some(true),
            ..Default::default()
        };
        let resp = rank(&dataset(), "fintech saas ceo cfo", 20, &filters);
        assert_eq!(ids(&resp), vec!["fintech-cfo", "saas-ceo"]);

        let filters = RankFilters {
            country: Some("Mexico".to_string()),
            ..Default::default()
        };
        let resp = rank(&dataset(), "fintech saas ceo cfo", 20, &filters);
        assert_eq!(ids(&resp), vec!["saas-ceo"]);

        let resp = rank(&dataset(), "fintech saas ceo cfo", 1, &RankFilters::default());
        assert_eq!(resp.total_matched, 1);
    }

    #[test]
    fn test_serialized_shape() {
        let resp = rank(&dataset(), "saas", 5, &RankFilters::default());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["extractedKeywords"], serde_json::json!(["saas"]));
        assert_eq!(json["searchQuery"], "saas");
        let first = &json["contacts"][0];
        assert_eq!(first["id"], "saas-ceo");
        assert_eq!(first["relevanceScore"], 1.0);
        assert!(first.get("score").is_none());
    }
}
