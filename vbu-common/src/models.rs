//! Typed configuration models
//!
//! These mirror the latest (version 3) document layouts. Older documents are
//! migrated to this layout before they are decoded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Base URL of a playlist page; the playlist id is appended
pub const PLAYLIST_URL_PREFIX: &str = "https://www.youtube.com/playlist?list=";

/// Video visibility
///
/// Only the three literal upper-case names are accepted; anything else is
/// a format error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    #[default]
    Private,
    Unlisted,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "PRIVATE",
            Visibility::Unlisted => "UNLISTED",
            Visibility::Public => "PUBLIC",
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRIVATE" => Ok(Visibility::Private),
            "UNLISTED" => Ok(Visibility::Unlisted),
            "PUBLIC" => Ok(Visibility::Public),
            other => Err(format!("unknown visibility '{}'", other)),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reusable video-metadata template
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visibility: Visibility,
    /// Insertion order is significant; duplicates allowed
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub notify_subscribers: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PathBuf>,
    #[serde(default)]
    pub made_for_kids: bool,
}

/// Latest presets document body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetsDocument {
    #[serde(default)]
    pub presets: Vec<Preset>,
}

/// Video category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Latest categories document body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesDocument {
    /// Region the category list was fetched for
    pub country: String,
    pub language: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Default for CategoriesDocument {
    fn default() -> Self {
        Self {
            country: crate::migrations::DEFAULT_CATEGORY_COUNTRY.to_string(),
            language: crate::migrations::DEFAULT_CATEGORY_LANGUAGE.to_string(),
            categories: Vec::new(),
        }
    }
}

/// Playlist on the hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    /// Owned by the signed-in account (as opposed to merely saved)
    #[serde(default)]
    pub owned: bool,
    /// Hidden from pickers
    #[serde(default)]
    pub hidden: bool,
}

impl Playlist {
    pub fn url(&self) -> String {
        format!("{}{}", PLAYLIST_URL_PREFIX, self.id)
    }
}

/// Latest playlists document body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistsDocument {
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

/// UI locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub language: String,
    pub country: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            country: "US".to_string(),
        }
    }
}

/// Window position and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Latest settings document body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub windows: BTreeMap<String, WindowGeometry>,
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,
}

/// One file of an upload batch
///
/// `metadata` is filled by the caller (tags, duration, ...); the templating
/// pipeline never touches the file system.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetFile {
    pub path: PathBuf,
    pub metadata: BTreeMap<String, String>,
}

impl TargetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// File name with only the last extension removed
    ///
    /// Files without an extension (and dot-files) keep their full name.
    pub fn raw_name(&self) -> String {
        raw_name_of(&self.path)
    }
}

fn raw_name_of(path: &Path) -> String {
    match path.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

/// Pipeline output for one target file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcreteVideoMetadata {
    pub file: PathBuf,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub notify_subscribers: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PathBuf>,
    pub made_for_kids: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_name_strips_last_extension_only() {
        assert_eq!(TargetFile::new("/videos/clip.final.mp4").raw_name(), "clip.final");
        assert_eq!(TargetFile::new("show01.mp4").raw_name(), "show01");
    }

    #[test]
    fn test_raw_name_without_extension() {
        assert_eq!(TargetFile::new("/videos/README").raw_name(), "README");
        assert_eq!(TargetFile::new(".hidden").raw_name(), ".hidden");
    }

    #[test]
    fn test_visibility_literals() {
        assert_eq!("PUBLIC".parse::<Visibility>(), Ok(Visibility::Public));
        assert!("public".parse::<Visibility>().is_err());
        assert!("SECRET".parse::<Visibility>().is_err());

        let parsed: Result<Preset, _> =
            serde_json::from_str(r#"{"name":"a","visibility":"HIDDEN"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_playlist_url() {
        let playlist = Playlist {
            id: "PL123".to_string(),
            name: "Season 1".to_string(),
            owned: true,
            hidden: false,
        };
        assert_eq!(playlist.url(), "https://www.youtube.com/playlist?list=PL123");
    }
}
