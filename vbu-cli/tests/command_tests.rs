//! Command tests against a temporary root folder

use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vbu_cli::commands::{self, RenderOptions};
use vbu_cli::FsDocumentStore;
use vbu_common::templating::MetadataMarkerMode;
use vbu_common::Domain;

fn write_legacy(root: &Path) {
    fs::write(root.join("categories.txt"), "Gaming:20\n").unwrap();
    fs::write(root.join("playlists.txt"), "true:PL1:Season 1\n").unwrap();
    fs::write(
        root.join("presets.txt"),
        "_presetName:Weekly\n_title:Ep $(ep): $(rawname)\n\
         _description:Size $(metadata:size) bytes\n$(playlist)\n\
         _tags:[$(rawname), weekly]\n_playlist:Season 1\n_category:Gaming\n",
    )
    .unwrap();
}

fn options(inputs: Vec<std::path::PathBuf>) -> RenderOptions {
    RenderOptions {
        preset: "Weekly".to_string(),
        starting_number: 3,
        parallel: false,
        metadata_markers: MetadataMarkerMode::Substitute,
        inputs,
    }
}

#[test]
fn test_migrate_writes_versioned_documents() {
    let root = TempDir::new().unwrap();
    write_legacy(root.path());
    let store = FsDocumentStore::new(root.path());

    let report = commands::migrate(&store, false);
    assert!(report.is_success(), "{}", report.summary());
    assert_eq!(report.migrated.len(), 3);

    for domain in [Domain::Categories, Domain::Playlists, Domain::Presets] {
        let text = fs::read_to_string(store.document_path(domain)).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["versionFormat"], 3, "{domain}");
    }

    let again = commands::migrate(&store, false);
    assert!(again.migrated.is_empty());
    assert!(again.summary().contains("up to date"));
}

#[test]
fn test_dry_run_leaves_files_alone() {
    let root = TempDir::new().unwrap();
    write_legacy(root.path());
    let store = FsDocumentStore::new(root.path());

    let report = commands::migrate(&store, true);
    assert!(report.is_success());
    assert!(report.summary().contains("would migrate"));
    assert!(!store.document_path(Domain::Presets).exists());
}

#[test]
fn test_migrate_reports_broken_domain() {
    let root = TempDir::new().unwrap();
    write_legacy(root.path());
    fs::write(root.path().join("categories.txt"), "no separator here\n").unwrap();
    let store = FsDocumentStore::new(root.path());

    let report = commands::migrate(&store, false);
    assert!(!report.is_success());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, Domain::Categories);
    assert!(store.document_path(Domain::Playlists).exists());
}

#[test]
fn test_render_batch_from_directory() {
    let root = TempDir::new().unwrap();
    write_legacy(root.path());
    let videos = TempDir::new().unwrap();
    fs::write(videos.path().join("show02.mp4"), b"12345").unwrap();
    fs::write(videos.path().join("show01.mp4"), b"123").unwrap();
    fs::write(videos.path().join("notes.txt"), b"skip").unwrap();

    let store = FsDocumentStore::new(root.path());
    let rendered = commands::render(&store, &options(vec![videos.path().to_path_buf()])).unwrap();

    assert_eq!(rendered.len(), 2);
    assert_eq!(rendered[0].title, "Ep 3: show01");
    assert_eq!(rendered[1].title, "Ep 4: show02");
    assert_eq!(
        rendered[0].description,
        "Size 3 bytes\nhttps://www.youtube.com/playlist?list=PL1"
    );
    assert_eq!(rendered[1].tags, vec!["show02", "weekly"]);
    assert_eq!(rendered[0].category_id.as_deref(), Some("20"));
}

#[test]
fn test_parallel_render_matches_sequential() {
    let root = TempDir::new().unwrap();
    write_legacy(root.path());
    let videos = TempDir::new().unwrap();
    for name in ["a.mp4", "b.mkv", "c.webm", "d.mov"] {
        fs::write(videos.path().join(name), b"x").unwrap();
    }
    let store = FsDocumentStore::new(root.path());

    let sequential = commands::render(&store, &options(vec![videos.path().to_path_buf()])).unwrap();
    let mut parallel_options = options(vec![videos.path().to_path_buf()]);
    parallel_options.parallel = true;
    let parallel = commands::render(&store, &parallel_options).unwrap();

    assert_eq!(sequential, parallel);
}

#[test]
fn test_render_unknown_preset() {
    let root = TempDir::new().unwrap();
    write_legacy(root.path());
    let videos = TempDir::new().unwrap();
    fs::write(videos.path().join("a.mp4"), b"x").unwrap();

    let store = FsDocumentStore::new(root.path());
    let mut opts = options(vec![videos.path().to_path_buf()]);
    opts.preset = "Daily".to_string();

    let err = commands::render(&store, &opts).unwrap_err();
    assert!(err.to_string().contains("Daily"));
}

#[test]
fn test_render_rejects_overflowing_start() {
    let root = TempDir::new().unwrap();
    write_legacy(root.path());
    let videos = TempDir::new().unwrap();
    fs::write(videos.path().join("a.mp4"), b"x").unwrap();
    fs::write(videos.path().join("b.mp4"), b"x").unwrap();

    let store = FsDocumentStore::new(root.path());
    let mut opts = options(vec![videos.path().to_path_buf()]);
    opts.starting_number = u64::MAX;

    let err = commands::render(&store, &opts).unwrap_err();
    assert!(err.to_string().contains("too large"));

    opts.inputs = vec![videos.path().join("a.mp4")];
    let rendered = commands::render(&store, &opts).unwrap();
    assert_eq!(rendered[0].title, format!("Ep {}: a", u64::MAX));
}

#[test]
fn test_init_config_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    commands::init_config(&path, false).unwrap();
    assert!(path.exists());
    assert!(commands::init_config(&path, false).is_err());
    commands::init_config(&path, true).unwrap();
}
