//! # Prospector Core
//!
//! The contact engine behind Prospector's assistant tools: record
//! normalization, quality scoring, contact-state derivation, filtering,
//! aggregate stats, and keyword-overlap ranking.
//!
//! This crate contains no tokio, HTTP, or filesystem I/O. Records arrive
//! through the [`store::RecordSource`] trait; the calling application
//! decides where they come from.
//!
//! ```text
//! RecordSource ──▶ repository::load_contacts ──▶ Vec<Contact>
//!                        (normalize each row)        │
//!                  ┌──────────────┬──────────────────┤
//!                  ▼              ▼                  ▼
//!            filter::query   stats::aggregate   search::rank
//! ```

pub mod error;
pub mod fields;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod repository;
pub mod search;
pub mod stats;
pub mod store;
