//! Offline record source: a JSON array of normalized records

use std::path::Path;

use shared::Record;
use crate::error::FinderResult;

pub fn load_records(path: &Path) -> FinderResult<Vec<Record>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
