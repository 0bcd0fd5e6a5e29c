//! Extraction of string items from JSON Lines records.
//!
//! Every line of the input is expected to hold one JSON object. The configured field is pulled
//! out of each object and collected in input order, duplicates included. Lines that are blank, do
//! not look like an object, fail to parse, or lack a non-empty string in the field are skipped.

use crate::error::{Error, Result};
use log::{debug, info, warn};
use serde_crate::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Field read by [`IngestConfig::default`].
pub const DEFAULT_FIELD: &str = "remote_addr";

/// Which field of each record supplies the item.
///
/// # Examples
///
/// ```
/// use sketchbook::ingest::IngestConfig;
///
/// let config: IngestConfig = serde_json::from_str(r#"{"field": "user"}"#).unwrap();
/// assert_eq!(config.field, "user");
///
/// let config: IngestConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config, IngestConfig::default());
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(crate = "serde_crate", default)]
pub struct IngestConfig {
    /// Name of the top-level field holding the item.
    pub field: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            field: DEFAULT_FIELD.to_owned(),
        }
    }
}

fn extract(line: &str, field: &str) -> Option<String> {
    let record = serde_json::from_str::<Map<String, Value>>(line).ok()?;
    match record.get(field) {
        Some(Value::String(item)) if !item.is_empty() => Some(item.clone()),
        _ => None,
    }
}

/// Reads JSON Lines records from `reader` and returns the configured field of each usable record.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails and [`Error::NoValidItems`] if no record yielded an
/// item.
///
/// # Examples
///
/// ```
/// use sketchbook::ingest::{load_items, IngestConfig};
///
/// let log = "{\"remote_addr\": \"10.0.0.1\"}\nnot json\n{\"remote_addr\": \"10.0.0.2\"}\n";
/// let items = load_items(log.as_bytes(), &IngestConfig::default())?;
///
/// assert_eq!(items, vec!["10.0.0.1", "10.0.0.2"]);
/// # Ok::<(), sketchbook::Error>(())
/// ```
pub fn load_items<R: BufRead>(reader: R, config: &IngestConfig) -> Result<Vec<String>> {
    let mut items = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !line.starts_with('{') {
            warn!("skipping line {}: not a JSON object", index + 1);
            skipped += 1;
            continue;
        }
        match extract(line, &config.field) {
            Some(item) => items.push(item),
            None => {
                warn!(
                    "skipping line {}: no usable `{}` field",
                    index + 1,
                    config.field
                );
                skipped += 1;
            }
        }
    }

    debug!("skipped {} malformed records", skipped);
    if items.is_empty() {
        return Err(Error::NoValidItems);
    }
    info!("loaded {} items from field `{}`", items.len(), config.field);
    Ok(items)
}

/// Opens the file at `path` and reads it with [`load_items`].
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read and [`Error::NoValidItems`] if no
/// record yielded an item.
pub fn load_file<P: AsRef<Path>>(path: P, config: &IngestConfig) -> Result<Vec<String>> {
    let path = path.as_ref();
    debug!("reading records from {}", path.display());
    let file = File::open(path)?;
    load_items(BufReader::new(file), config)
}
