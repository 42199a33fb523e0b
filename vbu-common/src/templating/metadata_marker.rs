//! Media metadata marker stage
//!
//! `$(metadata:key)` and `$(metadata:key,fallback)` pull values from the
//! target file's metadata map. The fallback may contain `\(`, `\)` and `\\`.

use super::{FileJob, TemplateTagProcessor};
use crate::models::{Preset, TargetFile};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\(metadata:([^,)]*)(?:,((?:\\.|[^\\)])*))?\)")
        .expect("metadata marker pattern is valid")
});

/// One `$(metadata:...)` occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataMarker {
    pub key: String,
    pub fallback: Option<String>,
}

impl MetadataMarker {
    fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            key: caps[1].to_string(),
            fallback: caps.get(2).map(|m| unescape(m.as_str())),
        }
    }
}

/// All metadata markers in `text`, in order of appearance
pub fn find_markers(text: &str) -> Vec<MetadataMarker> {
    MARKER_RE
        .captures_iter(text)
        .map(|caps| MetadataMarker::from_captures(&caps))
        .collect()
}

fn unescape(fallback: &str) -> String {
    let mut out = String::with_capacity(fallback.len());
    let mut chars = fallback.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('(' | ')' | '\\')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// How metadata markers are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataMarkerMode {
    /// Value from the file, else the fallback, else the marker stays
    #[default]
    Substitute,
    /// Field becomes the comma-joined list of marker keys
    KeyList,
}

impl MetadataMarkerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataMarkerMode::Substitute => "substitute",
            MetadataMarkerMode::KeyList => "key-list",
        }
    }
}

impl FromStr for MetadataMarkerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "substitute" => Ok(MetadataMarkerMode::Substitute),
            "key-list" => Ok(MetadataMarkerMode::KeyList),
            other => Err(format!(
                "unknown metadata marker mode '{}' (expected 'substitute' or 'key-list')",
                other
            )),
        }
    }
}

impl fmt::Display for MetadataMarkerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves `$(metadata:...)` in title, description and tags
#[derive(Debug, Default)]
pub struct MetadataMarkerProcessor {
    mode: MetadataMarkerMode,
    in_title: bool,
    in_description: bool,
    in_tags: bool,
}

impl MetadataMarkerProcessor {
    pub fn new(mode: MetadataMarkerMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> MetadataMarkerMode {
        self.mode
    }

    fn apply(&self, text: String, file: &TargetFile) -> String {
        if !MARKER_RE.is_match(&text) {
            return text;
        }

        match self.mode {
            MetadataMarkerMode::Substitute => MARKER_RE
                .replace_all(&text, |caps: &Captures<'_>| {
                    let marker = MetadataMarker::from_captures(caps);
                    file.metadata
                        .get(&marker.key)
                        .cloned()
                        .or(marker.fallback)
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned(),
            MetadataMarkerMode::KeyList => find_markers(&text)
                .into_iter()
                .map(|marker| marker.key)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl TemplateTagProcessor for MetadataMarkerProcessor {
    fn name(&self) -> &'static str {
        "metadata-marker"
    }

    fn init(&mut self, preset: &Preset, _starting_number: u64) {
        self.in_title = MARKER_RE.is_match(&preset.title);
        self.in_description = MARKER_RE.is_match(&preset.description);
        self.in_tags = preset.tags.iter().any(|tag| MARKER_RE.is_match(tag));
    }

    fn process_title(&self, title: String, job: &FileJob<'_>) -> String {
        if !self.in_title {
            return title;
        }
        self.apply(title, job.file)
    }

    fn process_description(&self, description: String, job: &FileJob<'_>) -> String {
        if !self.in_description {
            return description;
        }
        self.apply(description, job.file)
    }

    fn process_tags(&self, tags: Vec<String>, job: &FileJob<'_>) -> Vec<String> {
        if !self.in_tags {
            return tags;
        }
        tags.into_iter().map(|tag| self.apply(tag, job.file)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(mode: MetadataMarkerMode, preset: &Preset, file: &TargetFile) -> (String, String, Vec<String>) {
        let mut stage = MetadataMarkerProcessor::new(mode);
        stage.init(preset, 1);
        let job = FileJob { file, position: 0 };
        (
            stage.process_title(preset.title.clone(), &job),
            stage.process_description(preset.description.clone(), &job),
            stage.process_tags(preset.tags.clone(), &job),
        )
    }

    #[test]
    fn test_find_markers_key_and_fallback() {
        assert_eq!(
            find_markers("$(metadata:duration,00:00)"),
            vec![MetadataMarker {
                key: "duration".to_string(),
                fallback: Some("00:00".to_string()),
            }]
        );
        assert_eq!(
            find_markers("len $(metadata:duration)"),
            vec![MetadataMarker {
                key: "duration".to_string(),
                fallback: None,
            }]
        );
    }

    #[test]
    fn test_find_markers_escaped_fallback() {
        let markers = find_markers(r"$(metadata:artist,Unknown \(n/a\)) and $(metadata:album,a\\b)");
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].fallback.as_deref(), Some("Unknown (n/a)"));
        assert_eq!(markers[1].key, "album");
        assert_eq!(markers[1].fallback.as_deref(), Some("a\\b"));
    }

    #[test]
    fn test_substitute_value_then_fallback_then_verbatim() {
        let preset = Preset {
            name: "p".to_string(),
            title: "$(metadata:title) by $(metadata:artist,Anonymous)".to_string(),
            description: "Length: $(metadata:duration)".to_string(),
            tags: vec!["$(metadata:genre,misc)".to_string(), "fixed".to_string()],
            ..Default::default()
        };
        let file = TargetFile::new("a.mp4").with_metadata("title", "Sunrise");

        let (title, description, tags) = run(MetadataMarkerMode::Substitute, &preset, &file);
        assert_eq!(title, "Sunrise by Anonymous");
        assert_eq!(description, "Length: $(metadata:duration)");
        assert_eq!(tags, vec!["misc", "fixed"]);
    }

    #[test]
    fn test_key_list_mode() {
        let preset = Preset {
            name: "p".to_string(),
            title: "$(metadata:title) - $(metadata:year,2020)".to_string(),
            description: "no markers here".to_string(),
            ..Default::default()
        };
        let file = TargetFile::new("a.mp4").with_metadata("title", "Sunrise");

        let (title, description, _) = run(MetadataMarkerMode::KeyList, &preset, &file);
        assert_eq!(title, "title,year");
        assert_eq!(description, "no markers here");
    }

    #[test]
    fn test_mode_names() {
        assert_eq!("key-list".parse::<MetadataMarkerMode>(), Ok(MetadataMarkerMode::KeyList));
        assert!("keylist".parse::<MetadataMarkerMode>().is_err());
        assert_eq!(MetadataMarkerMode::default().to_string(), "substitute");
    }
}
