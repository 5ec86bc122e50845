use std::path::Path;

use anyhow::{Context, Result};

use crate::models::CallRecord;

/// Load call records from a JSON file containing an array of calls
pub fn load_calls(path: &Path) -> Result<Vec<CallRecord>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_calls_json(&content)
}

/// Parse a JSON array of call records
pub fn parse_calls_json(json: &str) -> Result<Vec<CallRecord>> {
    serde_json::from_str(json).context("Failed to parse call records JSON")
}

/// Read a bare transcript from a text file
pub fn load_transcript(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}
