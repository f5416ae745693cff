//! Tool trait, registry, and built-in contact tools.
//!
//! Tools are what the assistant layer calls. Each tool publishes a JSON
//! Schema for its parameters and is served by the HTTP server at
//! `POST /tools/{name}`. Custom Rust tools implement [`Tool`] and are
//! registered next to the built-ins.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 ToolRegistry                  │
//! │  ┌────────────────────┐   ┌────────────────┐  │
//! │  │ Built-in           │   │  Custom (Rust) │  │
//! │  │ query_contacts     │   │     Tools      │  │
//! │  │ get_contact_stats  │   │                │  │
//! │  │ vector_search_...  │   │                │  │
//! │  └────────────────────┘   └────────────────┘  │
//! └──────────────────────┬────────────────────────┘
//!                        ▼
//!               run_server() → HTTP API
//! ```
//!
//! # Usage
//!
//! ```rust
//! use prospector::traits::ToolRegistry;
//!
//! let mut tools = ToolRegistry::with_builtins();
//! // tools.register(Box::new(MyTool::new()));
//! assert_eq!(tools.len(), 3);
//! ```

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use prospector_core::filter::{QueryResponse, TypedFilters, WhereClause};
use prospector_core::models::{Contact, ContactState};
use prospector_core::search::{RankFilters, RankResponse};
use prospector_core::stats::ContactStats;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::Config;
use crate::csv_source::load_contacts;
use crate::query::query_contacts;
use crate::search::search_contacts;
use crate::stats::contact_stats;

// ═══════════════════════════════════════════════════════════════════════
// Tool Trait
// ═══════════════════════════════════════════════════════════════════════

/// A tool that the assistant can discover and call.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use anyhow::Result;
/// use serde_json::{json, Value};
/// use prospector::traits::{Tool, ToolContext};
///
/// pub struct CountContactsTool;
///
/// #[async_trait]
/// impl Tool for CountContactsTool {
///     fn name(&self) -> &str { "count_contacts" }
///     fn description(&self) -> &str { "Count all contacts" }
///
///     fn parameters_schema(&self) -> Value {
///         json!({ "type": "object", "properties": {} })
///     }
///
///     async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
///         Ok(json!({ "count": ctx.contacts().await?.len() }))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Route name (`POST /tools/{name}`), lowercase with underscores.
    fn name(&self) -> &str;

    /// One-line description for tool discovery.
    fn description(&self) -> &str;

    /// Whether this tool ships with Prospector. Defaults to `false`.
    fn is_builtin(&self) -> bool {
        false
    }

    /// JSON Schema (`type: "object"`) describing the parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute with parameters already checked by [`validate_params`].
    ///
    /// The returned value is wrapped in `{ "result": ... }` by the server.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

/// Serializable tool info for the `/tools/list` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub builtin: bool,
    /// True for tools proxied from the remote catalog.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub remote: bool,
    pub parameters: Value,
}

impl ToolInfo {
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            builtin: tool.is_builtin(),
            remote: false,
            parameters: tool.parameters_schema(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ToolContext
// ═══════════════════════════════════════════════════════════════════════

/// Access to the contact engine during tool execution.
///
/// Every call reloads the dataset from the configured export; the context
/// holds no contact state between calls.
pub struct ToolContext {
    config: Arc<Config>,
}

impl ToolContext {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load and normalize the full contact set.
    pub async fn contacts(&self) -> Result<Vec<Contact>> {
        load_contacts(&self.config).await
    }

    /// Equivalent to `POST /tools/query_contacts` or `prospector query`.
    pub async fn query(
        &self,
        filters: TypedFilters,
        clauses: &[WhereClause],
        limit: Option<usize>,
    ) -> Result<QueryResponse> {
        query_contacts(&self.config, filters, clauses, limit).await
    }

    /// Equivalent to `POST /tools/get_contact_stats` or `prospector stats`.
    pub async fn stats(&self, group_by: Option<&str>) -> Result<ContactStats> {
        contact_stats(&self.config, group_by).await
    }

    /// Equivalent to `POST /tools/vector_search_contacts` or `prospector search`.
    pub async fn search(
        &self,
        query: &str,
        top_k: Option<usize>,
        filters: RankFilters,
    ) -> Result<RankResponse> {
        search_contacts(&self.config, query, top_k, filters).await
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Parameter validation
// ═══════════════════════════════════════════════════════════════════════

/// Check `params` against a tool's JSON Schema.
///
/// Enforces `required`, primitive `type`s, and `enum`s. `null` counts as
/// absent and an empty string skips the `enum` check.
pub fn validate_params(schema: &Value, params: &Value) -> Result<Value> {
    let params_obj = match params {
        Value::Object(map) => map.clone(),
        Value::Null => serde_json::Map::new(),
        other => bail!("parameters must be a JSON object, got {}", json_type_name(other)),
    };

    let properties = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .cloned()
        .unwrap_or_default();

    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();


    for req_field in &required {
        if params_obj.get(*req_field).map_or(true, Value::is_null) {
            bail!("missing required parameter: {}", req_field);
        }
    }

    for (prop_name, prop_schema) in &properties {
        let Some(value) = params_obj.get(prop_name).filter(|v| !v.is_null()) else {
            continue;
        };

        if let Some(expected_type) = prop_schema.get("type").and_then(|t| t.as_str()) {
            let type_ok = match expected_type {
                "string" => value.is_string(),
                "integer" => value.is_i64() || value.is_u64(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                "array" => value.is_array(),
                "object" => value.is_object(),
                _ => true,
            };
            if !type_ok {
                bail!(
                    "parameter '{}' must be of type '{}', got {}",
                    prop_name,
                    expected_type,
                    json_type_name(value)
                );
            }
        }

        // An empty string means "unset" for typed filters.
        if value.as_str() == Some("") {
            continue;
        }
        if let Some(enum_values) = prop_schema.get("enum").and_then(|e| e.as_array()) {
            if !enum_values.contains(value) {
                let allowed: Vec<String> = enum_values.iter().map(|v| v.to_string()).collect();
                bail!(
                    "parameter '{}' must be one of [{}], got {}",
                    prop_name,
                    allowed.join(", "),
                    value
                );
            }
        }
    }

    Ok(Value::Object(params_obj))
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| anyhow!("invalid parameters: {}", e))
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Tool Implementations
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
struct QueryContactsParams {
    #[serde(default)]
    where_clauses: Option<Vec<WhereClause>>,
    #[serde(default)]
    min_quality_score: Option<i64>,
    #[serde(default)]
    is_executive: Option<bool>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    contact_state: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

/// Built-in filter tool. Delegates to [`ToolContext::query`].
pub struct QueryContactsTool;

#[async_trait]
impl Tool for QueryContactsTool {
    fn name(&self) -> &str {
        "query_contacts"
    }

    fn description(&self) -> &str {
        "Query and filter contacts by quality, executive status, country, industry, state, or ad-hoc field clauses"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        let states: Vec<&str> = ContactState::ALL.iter().map(ContactState::as_str).collect();
        json!({
            "type": "object",
            "properties": {
                "where_clauses": {
                    "type": "array",
                    "description": "Filter clauses like [{\"field\": \"keywords\", \"operator\": \"contains\", \"value\": \"fintech\"}]. Operators: contains, equals, gte.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "field": { "type": "string" },
                            "operator": { "type": "string" },
                            "value": {}
                        }
                    }
                },
                "min_quality_score": { "type": "integer", "description": "Minimum quality score (0-100)" },
                "is_executive": { "type": "boolean", "description": "Filter by executive status" },
                "country": { "type": "string", "description": "Exact country match" },
                "industry": { "type": "string", "description": "Exact industry match" },
                "contact_state": {
                    "type": "string",
                    "description": "Contact state (NOT_CONTACTED, SENT, REPLIED, ...)",
                    "enum": states
                },
                "limit": { "type": "integer", "description": "Maximum contacts to return (default 50)" }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let p: QueryContactsParams = parse_params(params)?;
        let filters = TypedFilters {
            min_quality_score: p.min_quality_score,
            is_executive: p.is_executive,
            country: p.country,
            industry: p.industry,
            contact_state: p.contact_state,
        };
        let clauses = p.where_clauses.unwrap_or_default();
        let resp = ctx.query(filters, &clauses, p.limit).await?;
        Ok(serde_json::to_value(resp)?)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ContactStatsParams {
    #[serde(default)]
    group_by: Option<String>,
}

/// Built-in stats tool. Delegates to [`ToolContext::stats`].
pub struct ContactStatsTool;

#[async_trait]
impl Tool for ContactStatsTool {
    fn name(&self) -> &str {
        "get_contact_stats"
    }

    fn description(&self) -> &str {
        "Summary statistics about the contact database"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "group_by": {
                    "type": "string",
                    "description": "Field to break counts down by (e.g. industry, country, contactState)"
                }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let p: ContactStatsParams = parse_params(params)?;
        let stats = ctx.stats(p.group_by.as_deref()).await?;
        Ok(serde_json::to_value(stats)?)
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchContactsParams {
    query: String,
    #[serde(default)]
    top_k: Option<usize>,
    #[serde(default)]
    min_quality_score: Option<i64>,
    #[serde(default)]
    is_executive: Option<bool>,
    #[serde(default)]
    country: Option<String>,
}

/// Built-in ranking tool. Keyword-overlap heuristic, not embedding search.
pub struct SearchContactsTool;

#[async_trait]
impl Tool for SearchContactsTool {
    fn name(&self) -> &str {
        "vector_search_contacts"
    }

    fn description(&self) -> &str {
        "Find contacts relevant to a natural-language query (keyword-based fallback ranking)"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Natural language search query" },
                "top_k": { "type": "integer", "description": "Number of contacts to return (default 20)" },
                "min_quality_score": { "type": "integer", "description": "Minimum quality score" },
                "is_executive": { "type": "boolean", "description": "Filter by executive status" },
                "country": { "type": "string", "description": "Exact country match" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let p: SearchContactsParams = parse_params(params)?;
        let filters = RankFilters {
            min_quality_score: p.min_quality_score,
            is_executive: p.is_executive,
            country: p.country,
        };
        let resp = ctx.search(&p.query, p.top_k, filters).await?;
        Ok(serde_json::to_value(resp)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Ordered set of tools. Names are unique; the first registration wins.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry pre-loaded with `query_contacts`, `get_contact_stats`, and
    /// `vector_search_contacts`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(QueryContactsTool));
        registry.register(Box::new(ContactStatsTool));
        registry.register(Box::new(SearchContactsTool));
        registry
    }

    /// Register a tool. Returns `false` (and drops the tool) when the
    /// name is already taken.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> bool {
        if self.find(tool.name()).is_some() {
            tracing::warn!(tool = tool.name(), "duplicate tool name, keeping the first registration");
            return false;
        }
        self.tools.push(tool);
        true
    }

    /// Move every tool of `other` into this registry.
    pub fn extend(&mut self, other: ToolRegistry) {
        for tool in other.tools {
            self.register(tool);
        }
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn infos(&self) -> Vec<ToolInfo> {
        self.tools.iter().map(|t| ToolInfo::of(t.as_ref())).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
