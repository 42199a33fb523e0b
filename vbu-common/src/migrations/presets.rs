//! Preset document migrations

use super::{
    as_record, list_field, parse_flag, required_string, reserved_steps, string_member,
    MigrationContext, MigrationStep,
};
use crate::document::{Domain, VersionedDocument};
use crate::models::Visibility;
use crate::{Error, Result};
use serde_json::{Map, Value};

const DOMAIN: Domain = Domain::Presets;

pub(super) fn steps() -> Vec<MigrationStep> {
    let mut steps = vec![MigrationStep {
        from: 0,
        description: "rename legacy preset fields, typed flags, validated visibility",
        apply: migrate_v1,
    }];
    steps.extend(reserved_steps());
    steps
}

/// Migration v1: legacy marker names become the structured preset layout
///
/// | legacy        | latest              |
/// |---------------|---------------------|
/// | `presetName`  | `name`              |
/// | `category`    | `categoryId`        |
/// | `playlist`    | `playlistId`        |
/// | `tellSubs`    | `notifySubscribers` |
/// | `thumbNail`   | `thumbnail`         |
fn migrate_v1(doc: &VersionedDocument, _ctx: &MigrationContext) -> Result<VersionedDocument> {
    let mut presets = Vec::new();
    for item in list_field(doc, "presets")? {
        presets.push(Value::Object(migrate_preset(as_record(DOMAIN, item)?)?));
    }

    let mut fields = Map::new();
    fields.insert("presets".to_string(), Value::Array(presets));
    Ok(VersionedDocument::new(DOMAIN, doc.version(), fields))
}

fn migrate_preset(record: &Map<String, Value>) -> Result<Map<String, Value>> {
    let name = required_string(DOMAIN, record, "presetName")?;
    let text = |key: &str| -> Result<Value> {
        Ok(Value::String(
            string_member(DOMAIN, record, key)?.unwrap_or_default().to_string(),
        ))
    };

    let visibility = match string_member(DOMAIN, record, "visibility")?.map(str::trim) {
        None | Some("") => Visibility::default(),
        Some(raw) => raw
            .parse::<Visibility>()
            .map_err(|e| Error::format(DOMAIN, format!("preset '{}': {}", name, e)))?,
    };

    let tags = match record.get("tags") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(tags)) => tags.clone(),
        Some(other) => {
            return Err(Error::format(
                DOMAIN,
                format!("preset '{}': tags should be a list, found {}", name, other),
            ))
        }
    };

    let mut out = Map::new();
    out.insert("name".to_string(), Value::String(name.to_string()));
    out.insert("title".to_string(), text("title")?);
    out.insert("description".to_string(), text("description")?);
    out.insert(
        "visibility".to_string(),
        Value::String(visibility.as_str().to_string()),
    );
    out.insert("tags".to_string(), Value::Array(tags));

    for (legacy_key, key) in [("category", "categoryId"), ("playlist", "playlistId"), ("thumbNail", "thumbnail")] {
        if let Some(value) = string_member(DOMAIN, record, legacy_key)?.filter(|v| !v.trim().is_empty()) {
            out.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    out.insert(
        "notifySubscribers".to_string(),
        Value::Bool(parse_flag(DOMAIN, "tellSubs", string_member(DOMAIN, record, "tellSubs")?)?),
    );
    out.insert(
        "madeForKids".to_string(),
        Value::Bool(parse_flag(DOMAIN, "madeForKids", string_member(DOMAIN, record, "madeForKids")?)?),
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::{self, LegacyLookups};
    use crate::lookup::{CategoryRegistry, PlaylistRegistry};
    use crate::migrations::MigrationLadder;
    use crate::models::PresetsDocument;
    use std::path::PathBuf;

    fn parse_legacy(raw: &str) -> VersionedDocument {
        let categories = CategoryRegistry::default();
        let playlists = PlaylistRegistry::default();
        legacy::presets::parse(
            raw,
            LegacyLookups {
                categories: &categories,
                playlists: &playlists,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_legacy_preset_reaches_latest() {
        let legacy = parse_legacy(
            "_presetName:Weekly\n_title:Ep $(ep)\n_visibility:UNLISTED\n_tellSubs:true\n\
             _thumbNail:/thumbs/weekly.png\n_madeForKids:false\n_tags:[show, weekly, show]",
        );
        let doc = MigrationLadder::for_domain(DOMAIN)
            .migrate(&legacy, &MigrationContext::default())
            .unwrap();
        assert_eq!(doc.version(), 3);

        let typed: PresetsDocument = doc.decode().unwrap();
        let preset = &typed.presets[0];
        assert_eq!(preset.name, "Weekly");
        assert_eq!(preset.title, "Ep $(ep)");
        assert_eq!(preset.description, "");
        assert_eq!(preset.visibility, Visibility::Unlisted);
        assert_eq!(preset.tags, vec!["show", "weekly", "show"]);
        assert!(preset.notify_subscribers);
        assert!(!preset.made_for_kids);
        assert_eq!(preset.thumbnail, Some(PathBuf::from("/thumbs/weekly.png")));
        assert_eq!(preset.playlist_id, None);
    }

    #[test]
    fn test_unknown_visibility_is_fatal() {
        let legacy = parse_legacy("_presetName:Weekly\n_visibility:FRIENDS");
        let err = MigrationLadder::for_domain(DOMAIN)
            .migrate(&legacy, &MigrationContext::default())
            .unwrap_err();
        match err {
            Error::Format { domain, message } => {
                assert_eq!(domain, Domain::Presets);
                assert!(message.contains("FRIENDS"));
            }
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_visibility_defaults_to_private() {
        let legacy = parse_legacy("_presetName:Weekly");
        let doc = MigrationLadder::for_domain(DOMAIN)
            .migrate(&legacy, &MigrationContext::default())
            .unwrap();
        let typed: PresetsDocument = doc.decode().unwrap();
        assert_eq!(typed.presets[0].visibility, Visibility::Private);
    }
}
