use crate::config::Settings;
use crate::error::Result;
use crate::frame::FrameSequence;
use crate::output::PartialOutput;
use crate::transcoder::Transcoder;

use super::progress::{Progress, Reporter};

use std::path::Path;

pub struct Merge;

impl Merge {
    /// Remuxes `frames` into a hidden sibling of `target`. The caller commits
    /// it once nothing else can fail.
    pub fn execute(
        transcoder: &dyn Transcoder,
        frames: &FrameSequence,
        source: &Path,
        settings: &Settings,
        target: &Path,
        reporter: &Reporter,
    ) -> Result<PartialOutput> {
        reporter.report(Progress::Merging);
        let partial = PartialOutput::new(target);
        let audio_source = settings.keep_audio.then_some(source);
        transcoder.mux(frames, settings.frame_rate, audio_source, partial.path())?;
        tracing::info!("Remuxed {} frames into {}", frames.len(), target.display());
        Ok(partial)
    }
}
