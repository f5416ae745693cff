//! Filtered contact queries.
//!
//! [`query_contacts`] is shared by the `query_contacts` tool and the
//! `prospector query` command. [`run_query`] prints the result as a table
//! or, with `--json`, as the same JSON the tool returns.

use anyhow::{bail, Result};
use prospector_core::filter::{self, QueryResponse, TypedFilters, WhereClause};
use prospector_core::models::ContactSummary;
use serde_json::Value;

use crate::config::Config;
use crate::csv_source::load_contacts;

/// Load the contact set and apply `filters`, then `clauses`, then the limit.
pub async fn query_contacts(
    config: &Config,
    filters: TypedFilters,
    clauses: &[WhereClause],
    limit: Option<usize>,
) -> Result<QueryResponse> {
    let contacts = load_contacts(config).await?;
    let limit = config.retrieval.clamp_limit(limit);
    let outcome = filter::query(&contacts, &filters, clauses, limit);

    tracing::debug!(
        loaded = contacts.len(),
        matched = outcome.total,
        clauses = clauses.len(),
        "query_contacts"
    );

    Ok(QueryResponse::new(outcome, filters))
}

/// Parse a `--where field:operator:value` argument.
///
/// The value is split off at the second colon, so it may itself contain
/// colons. Integers, booleans, and `null` are read as JSON; anything else
/// stays a string.
pub fn parse_where(s: &str) -> Result<WhereClause, String> {
    let mut parts = s.splitn(3, ':');
    let (field, operator, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(f), Some(o), Some(v)) if !f.is_empty() && !o.is_empty() => (f, o, v),
        _ => {
            return Err(format!(
                "invalid clause '{}': expected field:operator:value",
                s
            ))
        }
    };
    Ok(WhereClause::new(field, operator, clause_value(value)))
}

fn clause_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => v,
        _ => Value::String(raw.to_string()),
    }
}

/// Run the `query` command.
pub async fn run_query(
    config: &Config,
    filters: TypedFilters,
    clauses: Vec<WhereClause>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    if let Some(state) = filters.contact_state.as_deref().filter(|s| !s.is_empty()) {
        if state.parse::<prospector_core::models::ContactState>().is_err() {
            bail!(
                "Unknown contact state: {}. Use one of NOT_CONTACTED, INTERESTED_NOT_CONTACTED, SENT, OPENED, REPLIED, DEMOED, BOUNCED, INCOMPLETE.",
                state
            );
        }
    }

    let resp = query_contacts(config, filters, &clauses, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
        return Ok(());
    }

    if resp.contacts.is_empty() {
        println!("No contacts matched.");
        return Ok(());
    }

    print_contact_table(&resp.contacts);
    println!();
    println!("{} of {} matching contacts shown.", resp.returned, resp.total);
    Ok(())
}

/// Print contact summaries as an aligned table.
pub fn print_contact_table(contacts: &[ContactSummary]) {
    println!(
        "  {:<24} {:<28} {:<24} {:<12} {:>5} {:>4}  {}",
        "NAME", "TITLE", "COMPANY", "COUNTRY", "SCORE", "EXEC", "STATE"
    );
    println!("  {}", "-".repeat(120));
    for c in contacts {
        println!(
            "  {:<24} {:<28} {:<24} {:<12} {:>5} {:>4}  {}",
            truncate(&c.display_name(), 24),
            truncate(c.title.as_deref().unwrap_or("-"), 28),
            truncate(c.company_name.as_deref().unwrap_or("-"), 24),
            truncate(c.country.as_deref().unwrap_or("-"), 12),
            c.quality_score,
            if c.is_executive { "yes" } else { "" },
            c.contact_state
        );
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
