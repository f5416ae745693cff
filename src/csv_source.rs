//! CSV-backed [`RecordSource`].
//!
//! Reads a contact export with a header row. Every fetch re-reads the file;
//! nothing is cached between calls.

use anyhow::Result;
use async_trait::async_trait;
use prospector_core::error::SourceError;
use prospector_core::models::{Contact, RawRecord};
use prospector_core::repository;
use prospector_core::store::RecordSource;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Load and normalize every contact from the configured export.
pub async fn load_contacts(config: &Config) -> Result<Vec<Contact>> {
    let source = CsvSource::new(config.data.path.clone());
    repository::load_contacts(&source).await
}

pub struct CsvSource {
    path: PathBuf,
    name: String,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_records(&self) -> Result<Vec<RawRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %self.name, "contact export not found, loading empty dataset");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(SourceError::Unavailable {
                    source_name: self.name.clone(),
                    reason: e.to_string(),
                }
                .into())
            }
        };

        let records = parse_records(&self.name, &bytes)?;
        tracing::debug!(path = %self.name, records = records.len(), "loaded contact export");
        Ok(records)
    }
}

/// Parse CSV bytes into records keyed by header name.
///
/// Short rows simply lack their trailing columns; extra cells beyond the
/// header are ignored. A leading UTF-8 BOM is skipped.
pub fn parse_records(source_name: &str, bytes: &[u8]) -> Result<Vec<RawRecord>, SourceError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let malformed = |e: csv::Error| SourceError::Malformed {
        source_name: source_name.to_string(),
        line: e.position().map(|p| p.line()).unwrap_or(0),
        reason: e.to_string(),
    };

    let headers = reader.headers().map_err(malformed)?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(malformed)?;
        records.push(RawRecord::from_pairs(
            headers.iter().zip(row.iter()),
        ));
    }
    Ok(records)
}
