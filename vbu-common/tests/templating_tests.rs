//! Integration tests for the templating pipeline

use vbu_common::lookup::{PlaylistLookup, PlaylistRegistry};
use vbu_common::models::Playlist;
use vbu_common::templating::{MetadataMarkerMode, TemplatingPipeline};
use vbu_common::{Preset, TargetFile};

/// Playlist lookup serving pages from a custom host
struct PlaylistSite {
    base: String,
    registry: PlaylistRegistry,
}

impl PlaylistLookup for PlaylistSite {
    fn find_by_name(&self, name: &str) -> Option<&Playlist> {
        self.registry.find_by_name(name)
    }

    fn find_by_id(&self, id: &str) -> Option<&Playlist> {
        self.registry.find_by_id(id)
    }

    fn url_of(&self, playlist: &Playlist) -> String {
        format!("{}{}", self.base, playlist.id)
    }
}

fn files(names: &[&str]) -> Vec<TargetFile> {
    names.iter().map(|name| TargetFile::new(*name)).collect()
}

#[test]
fn test_end_to_end_title_and_description() {
    let site = PlaylistSite {
        base: "https://x/".to_string(),
        registry: PlaylistRegistry::new(vec![Playlist {
            id: "y".to_string(),
            name: "Show".to_string(),
            owned: true,
            hidden: false,
        }]),
    };
    let preset = Preset {
        name: "show".to_string(),
        title: "Ep $(ep): $(rawname)".to_string(),
        description: "See playlist: $(playlist)".to_string(),
        playlist_id: Some("y".to_string()),
        ..Default::default()
    };

    let mut pipeline = TemplatingPipeline::standard(preset, 1, &site, MetadataMarkerMode::Substitute);
    let out = pipeline.render(&TargetFile::new("show01.mp4"));

    assert_eq!(out.title, "Ep 1: show01");
    assert_eq!(out.description, "See playlist: https://x/y");
    assert_eq!(out.playlist_id.as_deref(), Some("y"));
}

#[test]
fn test_playlist_resolved_by_name() {
    let playlists = PlaylistRegistry::new(vec![Playlist {
        id: "PL7".to_string(),
        name: "Season 7".to_string(),
        owned: true,
        hidden: false,
    }]);
    let preset = Preset {
        name: "p".to_string(),
        description: "$(playlist)".to_string(),
        playlist_id: Some("Season 7".to_string()),
        ..Default::default()
    };

    let mut pipeline = TemplatingPipeline::standard(preset, 1, &playlists, MetadataMarkerMode::Substitute);
    let out = pipeline.render(&TargetFile::new("a.mp4"));
    assert_eq!(out.description, "https://www.youtube.com/playlist?list=PL7");
}

#[test]
fn test_sequential_numbering_from_start() {
    let preset = Preset {
        name: "p".to_string(),
        title: "Part $(ep)".to_string(),
        ..Default::default()
    };
    let playlists = PlaylistRegistry::default();
    let mut pipeline = TemplatingPipeline::standard(preset, 5, &playlists, MetadataMarkerMode::Substitute);

    let titles: Vec<String> = pipeline
        .render_batch(&files(&["a.mp4", "b.mp4", "c.mp4"]))
        .into_iter()
        .map(|out| out.title)
        .collect();
    assert_eq!(titles, vec!["Part 5", "Part 6", "Part 7"]);
}

#[test]
fn test_parallel_numbering_matches_sequential() {
    let preset = Preset {
        name: "p".to_string(),
        title: "$(rawname) #$(ep)".to_string(),
        ..Default::default()
    };
    let playlists = PlaylistRegistry::default();
    let batch = files(&["a.mp4", "b.mp4", "c.mp4"]);

    let mut sequential =
        TemplatingPipeline::standard(preset.clone(), 5, &playlists, MetadataMarkerMode::Substitute);
    let mut parallel = TemplatingPipeline::standard(preset, 5, &playlists, MetadataMarkerMode::Substitute);

    let expected = sequential.render_batch(&batch);
    let actual = parallel.render_batch_parallel(&batch);

    let mut numbers: Vec<String> = actual
        .iter()
        .map(|out| out.title.rsplit('#').next().unwrap_or_default().to_string())
        .collect();
    numbers.sort();
    assert_eq!(numbers, vec!["5", "6", "7"]);
    assert_eq!(actual, expected);
}

#[test]
fn test_positions_continue_across_calls() {
    let preset = Preset {
        name: "p".to_string(),
        title: "$(ep)".to_string(),
        ..Default::default()
    };
    let playlists = PlaylistRegistry::default();
    let mut pipeline = TemplatingPipeline::standard(preset, 1, &playlists, MetadataMarkerMode::Substitute);

    pipeline.render(&TargetFile::new("a.mp4"));
    let rest = pipeline.render_batch_parallel(&files(&["b.mp4", "c.mp4"]));
    let next = pipeline.render(&TargetFile::new("d.mp4"));

    assert_eq!(rest[0].title, "2");
    assert_eq!(rest[1].title, "3");
    assert_eq!(next.title, "4");
}

#[test]
fn test_numbering_at_u64_max_does_not_wrap() {
    let preset = Preset {
        name: "p".to_string(),
        title: "$(ep)".to_string(),
        ..Default::default()
    };
    let playlists = PlaylistRegistry::default();
    let batch = files(&["a.mp4", "b.mp4"]);

    let mut sequential =
        TemplatingPipeline::standard(preset.clone(), u64::MAX, &playlists, MetadataMarkerMode::Substitute);
    let titles: Vec<String> = sequential.render_batch(&batch).into_iter().map(|out| out.title).collect();
    assert_eq!(titles, vec![u64::MAX.to_string(), "$(ep)".to_string()]);

    let mut parallel = TemplatingPipeline::standard(preset, u64::MAX, &playlists, MetadataMarkerMode::Substitute);
    let titles: Vec<String> = parallel
        .render_batch_parallel(&batch)
        .into_iter()
        .map(|out| out.title)
        .collect();
    assert_eq!(titles, vec![u64::MAX.to_string(), "$(ep)".to_string()]);
}

#[test]
fn test_stages_chain_on_each_field() {
    let preset = Preset {
        name: "p".to_string(),
        title: "$(rawname) ($(metadata:duration,0:00))".to_string(),
        description: "$(metadata:artist) - $(rawname)".to_string(),
        tags: vec!["$(rawname)".to_string(), "$(metadata:genre)".to_string(), "$(unknown)".to_string()],
        ..Default::default()
    };
    let playlists = PlaylistRegistry::default();
    let mut pipeline = TemplatingPipeline::standard(preset, 1, &playlists, MetadataMarkerMode::Substitute);

    let file = TargetFile::new("/v/intro.mkv")
        .with_metadata("duration", "3:05")
        .with_metadata("artist", "Band");
    let out = pipeline.render(&file);

    assert_eq!(out.title, "intro (3:05)");
    assert_eq!(out.description, "Band - intro");
    assert_eq!(out.tags, vec!["intro", "$(metadata:genre)", "$(unknown)"]);
}

#[test]
fn test_preset_without_markers_is_copied() {
    let preset = Preset {
        name: "plain".to_string(),
        title: "Static title".to_string(),
        description: "Static description".to_string(),
        tags: vec!["one".to_string(), "one".to_string()],
        ..Default::default()
    };
    let playlists = PlaylistRegistry::default();
    let mut pipeline =
        TemplatingPipeline::standard(preset.clone(), 1, &playlists, MetadataMarkerMode::KeyList);

    let out = pipeline.render(&TargetFile::new("x.mp4"));
    assert_eq!(out.title, preset.title);
    assert_eq!(out.description, preset.description);
    assert_eq!(out.tags, preset.tags);
}
