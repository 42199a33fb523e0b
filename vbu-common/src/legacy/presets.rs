//! Legacy preset files
//!
//! A preset is a run of lines, each starting with a field marker followed by
//! `:` and the value:
//!
//! ```text
//! _presetName:Weekly show
//! _title:Episode $(ep)
//! _description:First line
//! second line of the description
//! _tags:[show, weekly]
//! _visibility:PUBLIC
//! ```
//!
//! Description values continue over every following line that does not
//! start with `_`. A file may hold several presets; a marker that repeats
//! within the current preset starts the next one.

use super::{list_document, LegacyLookups};
use crate::document::{Domain, VersionedDocument};
use crate::{Error, Result};
use serde_json::{Map, Value};
use tracing::warn;

const DOMAIN: Domain = Domain::Presets;

/// Legacy field markers and the version-0 field each one fills
const MARKERS: [(&str, &str); 10] = [
    ("_presetName", "presetName"),
    ("_title", "title"),
    ("_description", "description"),
    ("_category", "category"),
    ("_tags", "tags"),
    ("_playlist", "playlist"),
    ("_visibility", "visibility"),
    ("_tellSubs", "tellSubs"),
    ("_thumbNail", "thumbNail"),
    ("_madeForKids", "madeForKids"),
];

fn field_for_marker(marker: &str) -> Option<&'static str> {
    MARKERS
        .iter()
        .find(|(m, _)| *m == marker)
        .map(|(_, field)| *field)
}

/// Preset being assembled
struct PendingRecord {
    start_line: usize,
    first_line: String,
    seen: Vec<&'static str>,
    fields: Map<String, Value>,
}

impl PendingRecord {
    fn new(start_line: usize, first_line: &str) -> Self {
        Self {
            start_line,
            first_line: first_line.to_string(),
            seen: Vec::new(),
            fields: Map::new(),
        }
    }

    fn finish(self) -> Result<Value> {
        if !self.fields.contains_key("presetName") {
            return Err(Error::malformed(
                DOMAIN,
                self.start_line,
                &self.first_line,
                "preset has no _presetName",
            ));
        }
        Ok(Value::Object(self.fields))
    }
}

pub fn parse(raw: &str, lookups: LegacyLookups<'_>) -> Result<VersionedDocument> {
    let mut presets = Vec::new();
    let mut current: Option<PendingRecord> = None;
    // Description still collecting continuation lines
    let mut description: Option<String> = None;

    for (index, raw_line) in raw.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim_end_matches('\r');

        if let Some(text) = description.as_mut() {
            if !line.starts_with('_') {
                text.push('\n');
                text.push_str(line);
                continue;
            }
        }
        if let (Some(text), Some(record)) = (description.take(), current.as_mut()) {
            record.fields.insert("description".to_string(), Value::String(text));
        }

        if line.trim().is_empty() {
            continue;
        }

        let (marker, value) = line
            .split_once(':')
            .ok_or_else(|| Error::malformed(DOMAIN, line_no, line, "missing ':' separator"))?;
        let field = field_for_marker(marker)
            .ok_or_else(|| Error::malformed(DOMAIN, line_no, line, "unknown field marker"))?;

        let repeats = current
            .as_ref()
            .map(|record| record.seen.contains(&field))
            .unwrap_or(true);
        if repeats {
            if let Some(done) = current.take() {
                presets.push(done.finish()?);
            }
            current = Some(PendingRecord::new(line_no, line));
        }
        let Some(record) = current.as_mut() else {
            continue;
        };
        record.seen.push(field);

        match field {
            "description" => description = Some(value.to_string()),
            "tags" => {
                record.fields.insert(field.to_string(), Value::Array(parse_tags(value)));
            }
            "category" => {
                let resolved = resolve(value, "category", |name| {
                    lookups.categories.find_by_name(name).map(|c| c.id.clone())
                });
                if let Some(id) = resolved {
                    record.fields.insert(field.to_string(), Value::String(id));
                }
            }
            "playlist" => {
                let resolved = resolve(value, "playlist", |name| {
                    lookups.playlists.find_by_name(name).map(|p| p.id.clone())
                });
                if let Some(id) = resolved {
                    record.fields.insert(field.to_string(), Value::String(id));
                }
            }
            _ => {
                record
                    .fields
                    .insert(field.to_string(), Value::String(value.to_string()));
            }
        }
    }

    if let Some(mut record) = current.take() {
        if let Some(text) = description.take() {
            record.fields.insert("description".to_string(), Value::String(text));
        }
        presets.push(record.finish()?);
    }

    Ok(list_document(DOMAIN, "presets", presets))
}

/// `[a, b, c]` → `["a", "b", "c"]`
fn parse_tags(value: &str) -> Vec<Value> {
    let inner = value.trim();
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    let inner = inner.strip_suffix(']').unwrap_or(inner);

    inner
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(|tag| Value::String(tag.to_string()))
        .collect()
}

/// Best-effort name resolution; unresolved names leave the field unset
fn resolve(
    name: &str,
    kind: &str,
    find: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let found = find(name);
    if found.is_none() {
        warn!("Legacy preset references unknown {} '{}' - leaving it unset", kind, name);
    }
    found
}
