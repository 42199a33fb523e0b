//! Media metadata extraction
//!
//! Fills the metadata map of a [`TargetFile`] for `$(metadata:key)` markers.
//!
//! Keys:
//! - `title`, `artist`, `album`, `genre`, `comment`, `year`, `track` from tags
//! - `duration` as `M:SS` or `H:MM:SS`
//! - `size` in bytes, `modified` as `YYYY-MM-DD`
//!
//! Files whose tags cannot be read still get the file system keys.

use chrono::{DateTime, Local};
use lofty::prelude::*;
use lofty::probe::Probe;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use vbu_common::TargetFile;

#[derive(Debug, Error)]
pub enum MetadataError {
    /// I/O error (file metadata)
    #[error("I/O error on {0}: {1}")]
    IoError(PathBuf, std::io::Error),
}

/// Metadata extractor service
#[derive(Debug, Default)]
pub struct MetadataExtractor {}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self {}
    }

    /// Build the target file for one path
    pub fn extract(&self, file_path: &Path) -> Result<TargetFile, MetadataError> {
        let fs_meta = std::fs::metadata(file_path)
            .map_err(|e| MetadataError::IoError(file_path.to_path_buf(), e))?;

        let mut target = TargetFile::new(file_path).with_metadata("size", fs_meta.len().to_string());
        if let Ok(modified) = fs_meta.modified() {
            let modified: DateTime<Local> = modified.into();
            target = target.with_metadata("modified", modified.format("%Y-%m-%d").to_string());
        }

        let tagged_file = match Probe::open(file_path).and_then(|probe| probe.read()) {
            Ok(tagged_file) => tagged_file,
            Err(e) => {
                tracing::debug!(file = %file_path.display(), "No readable tags: {}", e);
                return Ok(target);
            }
        };

        let duration = tagged_file.properties().duration();
        if !duration.is_zero() {
            target = target.with_metadata("duration", format_duration(duration));
        }

        if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
            let text_fields = [
                ("title", tag.title()),
                ("artist", tag.artist()),
                ("album", tag.album()),
                ("genre", tag.genre()),
                ("comment", tag.comment()),
            ];
            for (key, value) in text_fields {
                if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                    target.metadata.insert(key.to_string(), value.into_owned());
                }
            }
            if let Some(year) = tag.year() {
                target.metadata.insert("year".to_string(), year.to_string());
            }
            if let Some(track) = tag.track() {
                target.metadata.insert("track".to_string(), track.to_string());
            }
        }

        tracing::debug!(
            file = %file_path.display(),
            keys = target.metadata.len(),
            "Extracted metadata"
        );

        Ok(target)
    }

    /// Extract a whole batch on the rayon pool, keeping input order
    ///
    /// A file whose metadata cannot be read at all is kept with an empty map.
    pub fn extract_all(&self, paths: &[PathBuf]) -> Vec<TargetFile> {
        paths
            .par_iter()
            .map(|path| match self.extract(path) {
                Ok(target) => target,
                Err(e) => {
                    tracing::warn!("{}", e);
                    TargetFile::new(path)
                }
            })
            .collect()
    }
}

/// `M:SS` below one hour, `H:MM:SS` above
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
