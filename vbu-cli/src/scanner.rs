//! Video file discovery
//!
//! Turns the paths given on the command line into an ordered upload batch.
//! Explicit files keep their argument order. Directories are walked
//! recursively and their files sorted by path.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Extensions treated as video files (lower case)
pub const VIDEO_EXTENSIONS: [&str; 10] = [
    "mp4", "m4v", "mov", "mkv", "webm", "avi", "wmv", "flv", "mpeg", "mpg",
];

#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Video file scanner
pub struct VideoScanner {
    ignore_patterns: Vec<String>,
    max_depth: Option<usize>,
}

impl Default for VideoScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoScanner {
    /// Scanner ignoring `.git`, `.DS_Store` and `Thumbs.db`
    pub fn new() -> Self {
        Self {
            ignore_patterns: vec![
                ".DS_Store".to_string(),
                "Thumbs.db".to_string(),
                ".git".to_string(),
            ],
            max_depth: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Collect video files from `inputs` in batch order, without duplicates
    ///
    /// The first occurrence of a path decides its position.
    pub fn scan(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>, ScanError> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();

        for input in inputs {
            if !input.exists() {
                return Err(ScanError::PathNotFound(input.clone()));
            }

            if input.is_file() {
                // Named explicitly: trust the caller
                if seen.insert(input.clone()) {
                    found.push(input.clone());
                }
                continue;
            }

            let mut walked = Vec::new();

            let walker = WalkDir::new(input)
                .follow_links(false)
                .max_depth(self.max_depth.unwrap_or(usize::MAX))
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !self.is_ignored(e));

            for entry in walker {
                match entry {
                    Ok(entry) => {
                        if entry.file_type().is_file() && is_video_file(entry.path()) {
                            walked.push(entry.into_path());
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Error accessing entry: {}", e);
                    }
                }
            }

            walked.sort();
            for path in walked {
                if seen.insert(path.clone()) {
                    found.push(path);
                }
            }
        }

        tracing::debug!("Found {} video files", found.len());
        Ok(found)
    }

    fn is_ignored(&self, entry: &DirEntry) -> bool {
        let file_name = entry.file_name().to_string_lossy();
        self.ignore_patterns.iter().any(|pattern| file_name == pattern.as_str())
    }
}

/// True if the extension is a known video extension (any case)
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}
