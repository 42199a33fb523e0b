//! Playlist document migrations

use super::{
    as_record, list_field, parse_flag, required_string, reserved_steps, string_member,
    MigrationContext, MigrationStep,
};
use crate::document::{Domain, VersionedDocument};
use crate::Result;
use serde_json::{json, Map, Value};

const DOMAIN: Domain = Domain::Playlists;

pub(super) fn steps() -> Vec<MigrationStep> {
    let mut steps = vec![MigrationStep {
        from: 0,
        description: "typed ownership flag, hidden flag",
        apply: migrate_v1,
    }];
    steps.extend(reserved_steps());
    steps
}

/// Migration v1: `isOwned` text becomes the `owned` flag; `hidden` added
fn migrate_v1(doc: &VersionedDocument, _ctx: &MigrationContext) -> Result<VersionedDocument> {
    let mut playlists = Vec::new();
    for item in list_field(doc, "playlists")? {
        let record = as_record(DOMAIN, item)?;
        playlists.push(json!({
            "id": required_string(DOMAIN, record, "id")?,
            "name": string_member(DOMAIN, record, "name")?.unwrap_or_default(),
            "owned": parse_flag(DOMAIN, "isOwned", string_member(DOMAIN, record, "isOwned")?)?,
            "hidden": false,
        }));
    }

    let mut fields = Map::new();
    fields.insert("playlists".to_string(), Value::Array(playlists));
    Ok(VersionedDocument::new(DOMAIN, doc.version(), fields))
}
