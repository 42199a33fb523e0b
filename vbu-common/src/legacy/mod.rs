//! Legacy (pre-versioning) configuration parsers
//!
//! Each parser turns one domain's historical text format into a version-0
//! [`VersionedDocument`] so the migration ladder can take over. Parsing is
//! all or nothing per file: the first malformed line fails the whole file.

pub mod categories;
pub mod playlists;
pub mod presets;
pub mod settings;

use crate::document::{Domain, VersionedDocument};
use crate::lookup::{CategoryLookup, PlaylistLookup};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Version stamped on documents produced by the legacy parsers
pub const LEGACY_VERSION: u64 = 0;

/// Name lookups used to resolve cross references in legacy presets
#[derive(Clone, Copy)]
pub struct LegacyLookups<'a> {
    pub categories: &'a dyn CategoryLookup,
    pub playlists: &'a dyn PlaylistLookup,
}

/// Parse one domain's legacy text
pub fn parse(domain: Domain, raw: &str, lookups: LegacyLookups<'_>) -> Result<VersionedDocument> {
    match domain {
        Domain::Categories => categories::parse(raw),
        Domain::Playlists => playlists::parse(raw),
        Domain::Presets => presets::parse(raw, lookups),
        Domain::Settings => settings::parse(raw),
    }
}

/// Non-blank lines with their 1-based line numbers
fn records(raw: &str) -> impl Iterator<Item = (usize, &str)> {
    raw.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

/// Split a colon-delimited record into exactly `expected` fields
///
/// There is no escaping: a ':' inside a value yields an extra field and the
/// record is rejected.
fn split_fields<'l>(
    domain: Domain,
    line_no: usize,
    line: &'l str,
    expected: usize,
) -> Result<Vec<&'l str>> {
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() != expected {
        return Err(Error::malformed(
            domain,
            line_no,
            line,
            format!(
                "expected {} ':'-separated fields, found {}",
                expected,
                fields.len()
            ),
        ));
    }
    Ok(fields)
}

/// Version-0 document holding a single list field
fn list_document(domain: Domain, key: &str, items: Vec<Value>) -> VersionedDocument {
    let mut fields = Map::new();
    fields.insert(key.to_string(), Value::Array(items));
    VersionedDocument::new(domain, LEGACY_VERSION, fields)
}
