//! Raw file name stage

use super::{FileJob, TemplateTagProcessor};
use crate::models::Preset;

pub const RAW_NAME_MARKER: &str = "$(rawname)";

/// Replaces `$(rawname)` with the file name minus its last extension
#[derive(Debug, Default)]
pub struct RawFilenameProcessor {
    in_title: bool,
    in_description: bool,
    in_tags: bool,
}

impl RawFilenameProcessor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateTagProcessor for RawFilenameProcessor {
    fn name(&self) -> &'static str {
        "raw-filename"
    }

    fn init(&mut self, preset: &Preset, _starting_number: u64) {
        self.in_title = preset.title.contains(RAW_NAME_MARKER);
        self.in_description = preset.description.contains(RAW_NAME_MARKER);
        self.in_tags = preset.tags.iter().any(|tag| tag.contains(RAW_NAME_MARKER));
    }

    fn process_title(&self, title: String, job: &FileJob<'_>) -> String {
        if !self.in_title {
            return title;
        }
        title.replace(RAW_NAME_MARKER, &job.file.raw_name())
    }

    fn process_description(&self, description: String, job: &FileJob<'_>) -> String {
        if !self.in_description {
            return description;
        }
        description.replace(RAW_NAME_MARKER, &job.file.raw_name())
    }

    fn process_tags(&self, tags: Vec<String>, job: &FileJob<'_>) -> Vec<String> {
        if !self.in_tags {
            return tags;
        }
        let raw_name = job.file.raw_name();
        tags.into_iter()
            .map(|tag| {
                if tag.contains(RAW_NAME_MARKER) {
                    tag.replace(RAW_NAME_MARKER, &raw_name)
                } else {
                    tag
                }
            })
            .collect()
    }
}
