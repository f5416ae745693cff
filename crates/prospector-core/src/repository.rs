//! Contact repository: fetch every raw record and normalize it.
//!
//! There is no cache. Each call re-reads the source and re-normalizes the
//! whole dataset, so callers always see the current export.

use anyhow::Result;

use crate::models::Contact;
use crate::normalize::normalize;
use crate::store::RecordSource;

/// Load the full working contact set, in source order.
pub async fn load_contacts<S: RecordSource + ?Sized>(source: &S) -> Result<Vec<Contact>> {
    let records = source.fetch_records().await?;
    Ok(records.iter().map(normalize).collect())
}
