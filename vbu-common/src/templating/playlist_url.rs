//! Playlist URL stage

use super::{FileJob, TemplateTagProcessor};
use crate::lookup::PlaylistLookup;
use crate::models::Preset;
use tracing::warn;

pub const PLAYLIST_MARKER: &str = "$(playlist)";

/// Replaces `$(playlist)` in the description with the preset's playlist URL
///
/// The playlist is resolved once per batch. A preset without a playlist, or
/// one whose playlist is unknown, gets an empty string.
pub struct PlaylistUrlProcessor<'a> {
    playlists: &'a dyn PlaylistLookup,
    url: Option<String>,
}

impl<'a> PlaylistUrlProcessor<'a> {
    pub fn new(playlists: &'a dyn PlaylistLookup) -> Self {
        Self {
            playlists,
            url: None,
        }
    }

    fn resolve(&self, reference: &str) -> Option<String> {
        self.playlists
            .find_by_id(reference)
            .or_else(|| self.playlists.find_by_name(reference))
            .map(|playlist| self.playlists.url_of(playlist))
    }
}

impl TemplateTagProcessor for PlaylistUrlProcessor<'_> {
    fn name(&self) -> &'static str {
        "playlist-url"
    }

    fn init(&mut self, preset: &Preset, _starting_number: u64) {
        if !preset.description.contains(PLAYLIST_MARKER) {
            self.url = None;
            return;
        }

        let url = match preset.playlist_id.as_deref() {
            None => String::new(),
            Some(reference) => self.resolve(reference).unwrap_or_else(|| {
                warn!(
                    "Preset '{}' references unknown playlist '{}' - {} left empty",
                    preset.name, reference, PLAYLIST_MARKER
                );
                String::new()
            }),
        };
        self.url = Some(url);
    }

    fn process_description(&self, description: String, _job: &FileJob<'_>) -> String {
        match &self.url {
            Some(url) => description.replace(PLAYLIST_MARKER, url),
            None => description,
        }
    }
}
