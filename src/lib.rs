//! # Prospector
//!
//! Contact filtering, scoring, and ranking over a CRM contact export.
//!
//! Prospector loads a CSV export of sales contacts, normalizes each row into
//! a [`Contact`](prospector_core::models::Contact) with a derived quality
//! score, executive flag, and outreach state, and answers three kinds of
//! questions about the set: filtered queries, distribution statistics, and
//! keyword-relevance search. The same three operations are exposed as tools
//! over HTTP and as CLI commands.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ CSV export  │──▶│  Normalizer   │──▶│ query/stats/rank │
//! │ (csv_source)│   │ (core crate) │   │   (core crate)   │
//! └─────────────┘   └──────────────┘   └────────┬─────────┘
//!                                               │
//!                           ┌───────────────────┤
//!                           ▼                   ▼
//!                     ┌──────────┐        ┌──────────┐
//!                     │   CLI    │        │   HTTP   │
//!                     │          │        │  tools   │
//!                     └──────────┘        └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! prospector stats --group-by industry
//! prospector query --executive --country Colombia
//! prospector search "fintech CFO in Mexico"
//! prospector serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`csv_source`] | CSV backing store |
//! | [`query`] | Filtered queries (`query_contacts`) |
//! | [`stats`] | Distribution summaries (`get_contact_stats`) |
//! | [`search`] | Relevance ranking (`vector_search_contacts`) |
//! | [`traits`] | Tool trait, registry, built-in tools |
//! | [`remote`] | Remote tool catalog |
//! | [`server`] | HTTP tool server |
//! | [`logging`] | Tracing subscriber setup |

pub mod config;
pub mod csv_source;
pub mod logging;
pub mod query;
pub mod remote;
pub mod search;
pub mod server;
pub mod stats;
pub mod traits;
