//! Preset templating pipeline
//!
//! Turns one [`Preset`] into concrete metadata for every file of an upload
//! batch. Each marker family is handled by one [`TemplateTagProcessor`]
//! stage; stages run in a fixed order and each consumes the previous stage's
//! output for title, description and tags independently.
//!
//! Stage order:
//! 1. [`NumberingProcessor`] - `$(ep)`
//! 2. [`RawFilenameProcessor`] - `$(rawname)`
//! 3. [`PlaylistUrlProcessor`] - `$(playlist)`
//! 4. [`MetadataMarkerProcessor`] - `$(metadata:key)` / `$(metadata:key,fallback)`
//!
//! Markers no stage recognizes are left verbatim.

mod metadata_marker;
mod numbering;
mod playlist_url;
mod raw_filename;

pub use metadata_marker::{find_markers, MetadataMarker, MetadataMarkerMode, MetadataMarkerProcessor};
pub use numbering::{check_numbering_range, NumberingProcessor, EPISODE_MARKER};
pub use playlist_url::{PlaylistUrlProcessor, PLAYLIST_MARKER};
pub use raw_filename::{RawFilenameProcessor, RAW_NAME_MARKER};

use crate::lookup::PlaylistLookup;
use crate::models::{ConcreteVideoMetadata, Preset, TargetFile};
use rayon::prelude::*;
use tracing::debug;

/// One file of a batch together with its position in the batch
///
/// Positions are assigned by the pipeline in batch order before any
/// per-file work starts, so numbering does not depend on execution order.
#[derive(Debug, Clone, Copy)]
pub struct FileJob<'f> {
    pub file: &'f TargetFile,
    /// Zero-based position within the batch
    pub position: u64,
}

/// One stage of the templating pipeline
///
/// `init` runs once per batch. The per-file transforms must not keep state
/// between files; a stage that found nothing to do in `init` should return
/// its input untouched.
pub trait TemplateTagProcessor: Send + Sync {
    /// Stage name for diagnostics
    fn name(&self) -> &'static str;

    fn init(&mut self, preset: &Preset, starting_number: u64);

    fn process_title(&self, title: String, _job: &FileJob<'_>) -> String {
        title
    }

    fn process_description(&self, description: String, _job: &FileJob<'_>) -> String {
        description
    }

    fn process_tags(&self, tags: Vec<String>, _job: &FileJob<'_>) -> Vec<String> {
        tags
    }
}

/// Ordered stages bound to one preset for one batch
pub struct TemplatingPipeline<'a> {
    preset: Preset,
    stages: Vec<Box<dyn TemplateTagProcessor + 'a>>,
    next_position: u64,
}

impl<'a> TemplatingPipeline<'a> {
    /// Initialize every stage once against the preset
    pub fn new(
        preset: Preset,
        starting_number: u64,
        mut stages: Vec<Box<dyn TemplateTagProcessor + 'a>>,
    ) -> Self {
        for stage in stages.iter_mut() {
            stage.init(&preset, starting_number);
            debug!("Initialized templating stage '{}' for preset '{}'", stage.name(), preset.name);
        }

        Self {
            preset,
            stages,
            next_position: 0,
        }
    }

    /// Pipeline with the four standard stages in canonical order
    pub fn standard(
        preset: Preset,
        starting_number: u64,
        playlists: &'a dyn PlaylistLookup,
        metadata_mode: MetadataMarkerMode,
    ) -> Self {
        let stages: Vec<Box<dyn TemplateTagProcessor + 'a>> = vec![
            Box::new(NumberingProcessor::new()),
            Box::new(RawFilenameProcessor::new()),
            Box::new(PlaylistUrlProcessor::new(playlists)),
            Box::new(MetadataMarkerProcessor::new(metadata_mode)),
        ];
        Self::new(preset, starting_number, stages)
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Render the next file of the batch
    pub fn render(&mut self, file: &TargetFile) -> ConcreteVideoMetadata {
        let job = FileJob {
            file,
            position: self.next_position,
        };
        self.next_position = self.next_position.saturating_add(1);
        self.render_job(&job)
    }

    /// Render files strictly in batch order
    pub fn render_batch(&mut self, files: &[TargetFile]) -> Vec<ConcreteVideoMetadata> {
        files.iter().map(|file| self.render(file)).collect()
    }

    /// Render files on the rayon pool
    ///
    /// Positions are reserved up front, so the output (returned in input
    /// order) is identical to [`render_batch`](Self::render_batch).
    pub fn render_batch_parallel(&mut self, files: &[TargetFile]) -> Vec<ConcreteVideoMetadata> {
        let first = self.next_position;
        self.next_position = first.saturating_add(files.len() as u64);

        let jobs: Vec<FileJob<'_>> = files
            .iter()
            .enumerate()
            .map(|(index, file)| FileJob {
                file,
                position: first.saturating_add(index as u64),
            })
            .collect();

        let pipeline = &*self;
        jobs.par_iter().map(|job| pipeline.render_job(job)).collect()
    }

    /// Run every stage over one file
    pub fn render_job(&self, job: &FileJob<'_>) -> ConcreteVideoMetadata {
        let mut title = self.preset.title.clone();
        let mut description = self.preset.description.clone();
        let mut tags = self.preset.tags.clone();

        for stage in &self.stages {
            title = stage.process_title(title, job);
            description = stage.process_description(description, job);
            tags = stage.process_tags(tags, job);
        }

        ConcreteVideoMetadata {
            file: job.file.path.clone(),
            title,
            description,
            tags,
            visibility: self.preset.visibility,
            playlist_id: self.preset.playlist_id.clone(),
            category_id: self.preset.category_id.clone(),
            notify_subscribers: self.preset.notify_subscribers,
            thumbnail: self.preset.thumbnail.clone(),
            made_for_kids: self.preset.made_for_kids,
        }
    }
}
