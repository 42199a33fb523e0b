//! Category document migrations

use super::{
    as_record, list_field, required_string, reserved_steps, string_member, CategoryLocale,
    MigrationContext, MigrationStep, DEFAULT_CATEGORY_COUNTRY, DEFAULT_CATEGORY_LANGUAGE,
};
use crate::document::{Domain, VersionedDocument};
use crate::Result;
use serde_json::{json, Map, Value};
use tracing::warn;

const DOMAIN: Domain = Domain::Categories;

/// Legacy settings key holding the category region
pub const LEGACY_COUNTRY_KEY: &str = "category_country";
/// Legacy settings key holding the category language
pub const LEGACY_LANGUAGE_KEY: &str = "category_language";

pub(super) fn steps() -> Vec<MigrationStep> {
    let mut steps = vec![MigrationStep {
        from: 0,
        description: "structured category list with region and language",
        apply: migrate_v1,
    }];
    steps.extend(reserved_steps());
    steps
}

/// Read the category locale out of a legacy (version 0) settings document
///
/// Returns `None` for already-migrated settings or when neither key is set.
pub fn category_locale_from_legacy_settings(settings: &VersionedDocument) -> Option<CategoryLocale> {
    if settings.domain() != Domain::Settings || settings.version() != 0 {
        return None;
    }

    let country = settings.field(LEGACY_COUNTRY_KEY).and_then(Value::as_str);
    let language = settings.field(LEGACY_LANGUAGE_KEY).and_then(Value::as_str);
    if country.is_none() && language.is_none() {
        return None;
    }

    Some(CategoryLocale {
        country: country.unwrap_or(DEFAULT_CATEGORY_COUNTRY).to_string(),
        language: language.unwrap_or(DEFAULT_CATEGORY_LANGUAGE).to_string(),
    })
}

/// Migration v1: `[{name, id}]` → `{country, language, categories: [{id, name}]}`
///
/// **Background:** legacy builds kept the region/language the categories were
/// fetched for in the settings file. The loader hands them over through the
/// migration context for this single upgrade.
fn migrate_v1(doc: &VersionedDocument, ctx: &MigrationContext) -> Result<VersionedDocument> {
    let mut categories = Vec::new();
    for item in list_field(doc, "categories")? {
        let record = as_record(DOMAIN, item)?;
        categories.push(json!({
            "id": required_string(DOMAIN, record, "id")?,
            "name": string_member(DOMAIN, record, "name")?.unwrap_or_default(),
        }));
    }

    let locale = ctx.category_locale.clone().unwrap_or_else(|| {
        warn!(
            "No category locale in legacy settings - using {}/{}",
            DEFAULT_CATEGORY_COUNTRY, DEFAULT_CATEGORY_LANGUAGE
        );
        CategoryLocale {
            country: DEFAULT_CATEGORY_COUNTRY.to_string(),
            language: DEFAULT_CATEGORY_LANGUAGE.to_string(),
        }
    });

    let mut fields = Map::new();
    fields.insert("country".to_string(), Value::String(locale.country));
    fields.insert("language".to_string(), Value::String(locale.language));
    fields.insert("categories".to_string(), Value::Array(categories));
    Ok(VersionedDocument::new(DOMAIN, doc.version(), fields))
}
