//! Episode numbering stage

use super::{FileJob, TemplateTagProcessor};
use crate::models::Preset;
use crate::{Error, Result};
use tracing::warn;

pub const EPISODE_MARKER: &str = "$(ep)";

/// Reject a starting number whose batch would run past `u64::MAX`
pub fn check_numbering_range(starting_number: u64, file_count: usize) -> Result<()> {
    let last_offset = (file_count as u64).saturating_sub(1);
    match starting_number.checked_add(last_offset) {
        Some(_) => Ok(()),
        None => Err(Error::InvalidInput(format!(
            "starting number {} is too large for a batch of {} files",
            starting_number, file_count
        ))),
    }
}

/// Replaces `$(ep)` in the title with a running number
///
/// The file at batch position `p` gets `starting_number + p`. A number past
/// `u64::MAX` leaves the marker in place.
#[derive(Debug, Default)]
pub struct NumberingProcessor {
    start: Option<u64>,
}

impl NumberingProcessor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateTagProcessor for NumberingProcessor {
    fn name(&self) -> &'static str {
        "numbering"
    }

    fn init(&mut self, preset: &Preset, starting_number: u64) {
        self.start = preset
            .title
            .contains(EPISODE_MARKER)
            .then_some(starting_number);
    }

    fn process_title(&self, title: String, job: &FileJob<'_>) -> String {
        match self.start {
            Some(start) => match start.checked_add(job.position) {
                Some(number) => title.replace(EPISODE_MARKER, &number.to_string()),
                None => {
                    warn!(
                        "Episode number {} + {} overflows - {} left in place",
                        start, job.position, EPISODE_MARKER
                    );
                    title
                }
            },
            None => title,
        }
    }
}
