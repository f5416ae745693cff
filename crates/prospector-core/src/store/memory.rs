//! In-memory [`RecordSource`] for tests and embedding.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::RawRecord;

use super::RecordSource;

/// Serves a fixed list of records, cloned on every fetch.
pub struct InMemorySource {
    name: String,
    records: Vec<RawRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            name: "memory".to_string(),
            records,
        }
    }

    pub fn named(name: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_records(&self) -> Result<Vec<RawRecord>> {
        Ok(self.records.clone())
    }
}
