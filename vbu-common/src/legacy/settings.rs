//! Legacy settings: flat `key=value` pairs
//!
//! Window geometry is packed into two values per window:
//! `<window>_location = X x Y` and `<window>_size = W x H`.

use super::LEGACY_VERSION;
use crate::document::{Domain, VersionedDocument};
use crate::{Error, Result};
use serde_json::{json, Map, Value};

const DOMAIN: Domain = Domain::Settings;
const LOCATION_SUFFIX: &str = "_location";
const SIZE_SUFFIX: &str = "_size";

pub fn parse(raw: &str) -> Result<VersionedDocument> {
    let mut fields = Map::new();
    let mut windows = Map::new();

    for (index, raw_line) in raw.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| Error::malformed(DOMAIN, line_no, line, "missing '=' separator"))?;
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() {
            return Err(Error::malformed(DOMAIN, line_no, line, "empty key"));
        }

        let geometry = key
            .strip_suffix(LOCATION_SUFFIX)
            .map(|window| (window, "location"))
            .or_else(|| key.strip_suffix(SIZE_SUFFIX).map(|window| (window, "size")));

        match geometry {
            Some((window, part)) if !window.is_empty() => {
                let (a, b) = split_pair(value).ok_or_else(|| {
                    Error::malformed(DOMAIN, line_no, line, "expected two numbers separated by 'x'")
                })?;
                let entry = windows
                    .entry(window.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(window_fields) = entry {
                    window_fields.insert(part.to_string(), json!([a, b]));
                }
            }
            _ => {
                fields.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
    }

    if !windows.is_empty() {
        fields.insert("windows".to_string(), Value::Object(windows));
    }

    Ok(VersionedDocument::new(DOMAIN, LEGACY_VERSION, fields))
}

/// `"1280.0 x 720.0"` → `(1280.0, 720.0)`
fn split_pair(value: &str) -> Option<(f64, f64)> {
    let mut parts = value.split('x');
    let a = parts.next()?.trim().parse::<f64>().ok()?;
    let b = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() || !a.is_finite() || !b.is_finite() {
        return None;
    }
    Some((a, b))
}
