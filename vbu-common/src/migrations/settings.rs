//! Settings document migrations

use super::categories::{LEGACY_COUNTRY_KEY, LEGACY_LANGUAGE_KEY};
use super::{reserved_steps, MigrationContext, MigrationStep};
use crate::document::{Domain, VersionedDocument};
use crate::models::Locale;
use crate::{Error, Result};
use serde_json::{json, Map, Value};

const DOMAIN: Domain = Domain::Settings;

pub(super) fn steps() -> Vec<MigrationStep> {
    let mut steps = vec![MigrationStep {
        from: 0,
        description: "locale, window geometry and preferences sections",
        apply: migrate_v1,
    }];
    steps.extend(reserved_steps());
    steps
}

/// Migration v1: flat legacy keys become `locale`, `windows`, `preferences`
///
/// The category locale keys are dropped here; they move to the categories
/// document during the same upgrade.
fn migrate_v1(doc: &VersionedDocument, _ctx: &MigrationContext) -> Result<VersionedDocument> {
    let defaults = Locale::default();
    let mut locale = Map::new();
    let mut windows = Map::new();
    let mut preferences = Map::new();

    for (key, value) in doc.fields() {
        match key.as_str() {
            "language" | "country" => {
                locale.insert(key.clone(), Value::String(text_of(value)));
            }
            LEGACY_COUNTRY_KEY | LEGACY_LANGUAGE_KEY => {}
            "windows" => {
                let Value::Object(entries) = value else {
                    return Err(Error::format(DOMAIN, "windows should be an object"));
                };
                for (name, packed) in entries {
                    windows.insert(name.clone(), window_geometry(name, packed)?);
                }
            }
            _ => {
                preferences.insert(key.clone(), Value::String(text_of(value)));
            }
        }
    }

    locale
        .entry("language")
        .or_insert_with(|| Value::String(defaults.language.clone()));
    locale
        .entry("country")
        .or_insert_with(|| Value::String(defaults.country.clone()));

    let mut fields = Map::new();
    fields.insert("locale".to_string(), Value::Object(locale));
    fields.insert("windows".to_string(), Value::Object(windows));
    fields.insert("preferences".to_string(), Value::Object(preferences));
    Ok(VersionedDocument::new(DOMAIN, doc.version(), fields))
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `{location: [x, y], size: [w, h]}` → `{x, y, width, height}`
fn window_geometry(name: &str, packed: &Value) -> Result<Value> {
    let pair = |part: &str| -> Result<(f64, f64)> {
        match packed.get(part) {
            None => Ok((0.0, 0.0)),
            Some(Value::Array(values)) if values.len() == 2 => {
                match (values[0].as_f64(), values[1].as_f64()) {
                    (Some(a), Some(b)) => Ok((a, b)),
                    _ => Err(Error::format(
                        DOMAIN,
                        format!("window '{}' {} is not numeric", name, part),
                    )),
                }
            }
            Some(other) => Err(Error::format(
                DOMAIN,
                format!("window '{}' {} should be a pair, found {}", name, part, other),
            )),
        }
    };

    let (x, y) = pair("location")?;
    let (width, height) = pair("size")?;
    Ok(json!({ "x": x, "y": y, "width": width, "height": height }))
}
