//! Filter engine for `query_contacts`.
//!
//! A query combines typed filters with a small clause language. Everything
//! is AND-combined. Typed filters run first, then clauses narrow the result
//! one at a time in list order.
//!
//! # Clause operators
//!
//! | Operator | Match rule |
//! |----------|------------|
//! | `contains` | case-insensitive substring of `value` in the rendered field; missing or falsy fields never match |
//! | `equals` | field value equals `value` (numbers compare numerically) |
//! | `gte` | field ≥ `value`; numeric when `value` is numeric (missing field counts as 0), lexicographic for text |
//!
//! Clauses with an unknown operator, or without a field name, are skipped
//! and leave the result unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::{ContactField, FieldValue};
use crate::models::{Contact, ContactSummary};

/// Typed filters. Unset (or empty-string) filters do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypedFilters {
    pub min_quality_score: Option<i64>,
    pub is_executive: Option<bool>,
    pub country: Option<String>,
    pub industry: Option<String>,
    pub contact_state: Option<String>,
}

impl TypedFilters {
    /// True when the contact passes every set filter. Categorical fields use
    /// exact, case-sensitive equality.
    pub fn matches(&self, c: &Contact) -> bool {
        if let Some(min) = self.min_quality_score {
            if i64::from(c.quality_score) < min {
                return false;
            }
        }
        if let Some(exec) = self.is_executive {
            if c.is_executive != exec {
                return false;
            }
        }
        if let Some(country) = non_empty(&self.country) {
            if c.country.as_deref() != Some(country) {
                return false;
            }
        }
        if let Some(industry) = non_empty(&self.industry) {
            if c.industry.as_deref() != Some(industry) {
                return false;
            }
        }
        if let Some(state) = non_empty(&self.contact_state) {
            if c.contact_state.as_str() != state {
                return false;
            }
        }
        true
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

/// One `{field, operator, value}` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: Value,
}

impl WhereClause {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseOperator {
    Contains,
    Equals,
    Gte,
}

impl ClauseOperator {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "contains" => Some(ClauseOperator::Contains),
            "equals" => Some(ClauseOperator::Equals),
            "gte" => Some(ClauseOperator::Gte),
            _ => None,
        }
    }
}

/// A clause resolved against the field enumeration, ready to evaluate.
///
/// An unknown field name resolves to `None` and reads as a missing value.
#[derive(Debug, Clone)]
struct CompiledClause<'a> {
    field: Option<ContactField>,
    operator: ClauseOperator,
    value: &'a Value,
}

impl<'a> CompiledClause<'a> {
    /// `None` when the clause has no effect.
    fn compile(clause: &'a WhereClause) -> Option<Self> {
        if clause.field.is_empty() {
            return None;
        }
        let operator = ClauseOperator::parse(&clause.operator)?;
        if operator == ClauseOperator::Contains && clause.value.is_null() {
            return None;
        }
        Some(Self {
            field: ContactField::parse(&clause.field),
            operator,
            value: &clause.value,
        })
    }

    fn matches(&self, c: &Contact) -> bool {
        let fv = self
            .field
            .map_or(FieldValue::Missing, |field| field.value(c));
        match self.operator {
            ClauseOperator::Contains => contains(&fv, self.value),
            ClauseOperator::Equals => equals(&fv, self.value),
            ClauseOperator::Gte => gte(&fv, self.value),
        }
    }
}

fn contains(fv: &FieldValue<'_>, value: &Value) -> bool {
    if !fv.is_truthy() {
        return false;
    }
    let needle = match value {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    };
    fv.render()
        .map(|hay| hay.to_lowercase().contains(&needle))
        .unwrap_or(false)
}

fn equals(fv: &FieldValue<'_>, value: &Value) -> bool {
    if let (FieldValue::Number(n), Some(rhs)) = (fv, value.as_f64()) {
        return (*n as f64) == rhs;
    }
    fv.to_json() == *value
}

fn gte(fv: &FieldValue<'_>, value: &Value) -> bool {
    if let Some(rhs) = numeric(value) {
        return fv.as_number().map(|lhs| lhs >= rhs).unwrap_or(false);
    }
    match (fv, value) {
        (FieldValue::Text(lhs), Value::String(rhs)) => *lhs >= rhs.as_str(),
        _ => false,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Result of a filtered query before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    /// First `limit` matches, projected.
    pub contacts: Vec<ContactSummary>,
    /// Number of matches before truncation.
    pub total: usize,
}

/// Run typed filters, then clauses in order, then truncate to `limit`.
pub fn query(
    contacts: &[Contact],
    filters: &TypedFilters,
    clauses: &[WhereClause],
    limit: usize,
) -> QueryOutcome {
    let compiled: Vec<CompiledClause<'_>> =
        clauses.iter().filter_map(CompiledClause::compile).collect();

    let mut matched: Vec<&Contact> = contacts.iter().filter(|c| filters.matches(c)).collect();
    for clause in &compiled {
        matched.retain(|c| clause.matches(c));
    }

    QueryOutcome {
        total: matched.len(),
        contacts: matched
            .into_iter()
            .take(limit)
            .map(ContactSummary::from)
            .collect(),
    }
}

/// Wire shape of the `query_contacts` tool response.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub contacts: Vec<ContactSummary>,
    pub total: usize,
    pub returned: usize,
    pub filters_applied: TypedFilters,
}

impl QueryResponse {
    pub fn new(outcome: QueryOutcome, filters: TypedFilters) -> Self {
        Self {
            returned: outcome.contacts.len(),
            total: outcome.total,
            contacts: outcome.contacts,
            filters_applied: filters,
        }
    }
}
