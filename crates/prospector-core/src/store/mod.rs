//! Record source abstraction.
//!
//! The [`RecordSource`] trait is the only way raw records enter the engine,
//! so the repository and every query surface work against CSV exports,
//! in-memory fixtures, or any other tabular backend.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::RawRecord;

/// A row-oriented tabular backing store.
///
/// # Contract
///
/// - Every call reads the full dataset again; sources do not cache.
/// - Rows come back in source order.
/// - A source that does not exist returns `Ok(vec![])`.
/// - A source that exists but cannot be read returns an error carrying a
///   [`SourceError`](crate::error::SourceError).
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable name used in logs and errors (e.g. a file path).
    fn name(&self) -> &str;

    /// Read every record from the source.
    async fn fetch_records(&self) -> Result<Vec<RawRecord>>;
}
