//! Integration tests for legacy parsing and migration ladders

use serde_json::json;
use vbu_common::legacy::{self, LegacyLookups};
use vbu_common::lookup::{CategoryRegistry, PlaylistRegistry};
use vbu_common::migrations::{MigrationContext, MigrationLadder, LATEST_VERSION};
use vbu_common::models::{PlaylistsDocument, PresetsDocument, Settings};
use vbu_common::{Domain, Error, VersionedDocument, Visibility, VERSION_KEY};

fn migrate_legacy(domain: Domain, raw: &str) -> vbu_common::Result<VersionedDocument> {
    let categories = CategoryRegistry::default();
    let playlists = PlaylistRegistry::default();
    let lookups = LegacyLookups {
        categories: &categories,
        playlists: &playlists,
    };
    let legacy_doc = legacy::parse(domain, raw, lookups)?;
    assert_eq!(legacy_doc.version(), 0);
    MigrationLadder::for_domain(domain).migrate(&legacy_doc, &MigrationContext::default())
}

#[test]
fn test_legacy_categories_reach_latest_version() {
    let doc = migrate_legacy(Domain::Categories, "Gaming:20\nMusic:10\n").unwrap();
    let value = doc.to_value();

    assert_eq!(value[VERSION_KEY], json!(LATEST_VERSION));
    assert_eq!(value["country"], "US");
    assert_eq!(value["language"], "en");
    assert_eq!(
        value["categories"],
        json!([{"id": "20", "name": "Gaming"}, {"id": "10", "name": "Music"}])
    );
}

#[test]
fn test_legacy_playlists_reach_latest_version() {
    let doc = migrate_legacy(Domain::Playlists, "true:PL1:Season 1\nFALSE:PL2:Clips\n").unwrap();
    assert_eq!(doc.to_value()[VERSION_KEY], json!(3));

    let playlists: PlaylistsDocument = doc.decode().unwrap();
    assert_eq!(playlists.playlists.len(), 2);
    assert_eq!(playlists.playlists[0].id, "PL1");
    assert!(playlists.playlists[0].owned);
    assert!(!playlists.playlists[1].owned);
    assert!(!playlists.playlists[1].hidden);
}

#[test]
fn test_too_new_document_is_rejected_and_untouched() {
    let doc = VersionedDocument::parse(
        Domain::Playlists,
        r#"{"versionFormat": 4, "playlists": []}"#,
    )
    .unwrap();
    let before = doc.clone();

    let err = MigrationLadder::for_domain(Domain::Playlists)
        .migrate(&doc, &MigrationContext::default())
        .unwrap_err();

    match err {
        Error::VersionTooNew { domain, found, latest } => {
            assert_eq!(domain, Domain::Playlists);
            assert_eq!(found, 4);
            assert_eq!(latest, LATEST_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(doc, before);
}

#[test]
fn test_current_document_is_returned_as_is() {
    let doc = VersionedDocument::parse(
        Domain::Presets,
        r#"{"versionFormat": 3, "presets": [{"name": "a"}]}"#,
    )
    .unwrap();
    let migrated = MigrationLadder::for_domain(Domain::Presets)
        .migrate(&doc, &MigrationContext::default())
        .unwrap();
    assert_eq!(migrated, doc);
}

#[test]
fn test_intermediate_version_walks_remaining_steps() {
    let doc = VersionedDocument::parse(
        Domain::Playlists,
        r#"{"versionFormat": 1, "playlists": [{"id": "PL1", "name": "a", "owned": true, "hidden": false}]}"#,
    )
    .unwrap();
    let migrated = MigrationLadder::for_domain(Domain::Playlists)
        .migrate(&doc, &MigrationContext::default())
        .unwrap();
    assert_eq!(migrated.version(), 3);
    assert_eq!(migrated.field("playlists"), doc.field("playlists"));
}

#[test]
fn test_multi_line_description_and_tags() {
    let raw = "_presetName:Show\n_description:Line one\nLine two\n_tags:[a,b]\n";
    let doc = migrate_legacy(Domain::Presets, raw).unwrap();
    let presets: PresetsDocument = doc.decode().unwrap();

    assert_eq!(presets.presets.len(), 1);
    let preset = &presets.presets[0];
    assert_eq!(preset.name, "Show");
    assert_eq!(preset.description, "Line one\nLine two");
    assert_eq!(preset.tags, vec!["a", "b"]);
    assert_eq!(preset.visibility, Visibility::Private);
}

#[test]
fn test_legacy_preset_with_bad_visibility_fails() {
    let raw = "_presetName:Show\n_visibility:SECRET\n";
    let err = migrate_legacy(Domain::Presets, raw).unwrap_err();

    assert!(matches!(err, Error::Format { domain: Domain::Presets, .. }));
    assert!(err.to_string().contains("SECRET"));
}

#[test]
fn test_malformed_legacy_category_reports_line() {
    let err = migrate_legacy(Domain::Categories, "Gaming:20\nMusic\n").unwrap_err();
    match err {
        Error::MalformedLegacyRecord { domain, line, record, .. } => {
            assert_eq!(domain, Domain::Categories);
            assert_eq!(line, 2);
            assert_eq!(record, "Music");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_legacy_settings_windows_and_preferences() {
    let raw = "# saved by old build\nmain_location=10x20\nmain_size=800x600\ntheme=dark\n";
    let doc = migrate_legacy(Domain::Settings, raw).unwrap();
    let settings: Settings = doc.decode().unwrap();

    let main = settings.windows.get("main").unwrap();
    assert_eq!((main.x, main.y, main.width, main.height), (10.0, 20.0, 800.0, 600.0));
    assert_eq!(settings.preferences.get("theme").map(String::as_str), Some("dark"));
    assert_eq!(settings.locale.language, "en");
}
