//! Relevance search over contacts.
//!
//! [`search_contacts`] backs the `vector_search_contacts` tool and
//! `prospector search`. Ranking is keyword overlap against a fixed domain
//! vocabulary; see [`prospector_core::search`].

use anyhow::Result;
use prospector_core::search::{self, RankFilters, RankResponse};

use crate::config::Config;
use crate::csv_source::load_contacts;
use crate::query::truncate;

/// Load the contact set and rank it against `query`.
pub async fn search_contacts(
    config: &Config,
    query: &str,
    top_k: Option<usize>,
    filters: RankFilters,
) -> Result<RankResponse> {
    let contacts = load_contacts(config).await?;
    let top_k = config.retrieval.clamp_top_k(top_k);
    let resp = search::rank(&contacts, query, top_k, &filters);

    tracing::debug!(
        loaded = contacts.len(),
        returned = resp.total_matched,
        keywords = ?resp.extracted_keywords,
        "vector_search_contacts"
    );

    Ok(resp)
}

/// Run the search command.
pub async fn run_search(
    config: &Config,
    query: &str,
    top_k: Option<usize>,
    filters: RankFilters,
    json: bool,
) -> Result<()> {
    let resp = search_contacts(config, query, top_k, filters).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
        return Ok(());
    }

    if resp.extracted_keywords.is_empty() {
        println!("No results.");
        println!("No known keywords in query. Try terms like: {}.", search::VOCABULARY.join(", "));
        return Ok(());
    }

    println!("Keywords: {}", resp.extracted_keywords.join(", "));
    println!();

    if resp.contacts.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, r) in resp.contacts.iter().enumerate() {
        let c = &r.contact;
        println!(
            "{}. [{:.2}] {} | {} @ {}",
            i + 1,
            r.relevance_score,
            c.display_name(),
            truncate(c.title.as_deref().unwrap_or("-"), 40),
            c.company_name.as_deref().unwrap_or("-")
        );
        println!(
            "    {} | quality {} | {}",
            c.country.as_deref().unwrap_or("-"),
            c.quality_score,
            c.contact_state
        );
    }

    println!();
    println!("{}", resp.note);
    Ok(())
}
