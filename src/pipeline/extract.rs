use crate::error::Result;
use crate::frame::FrameSequence;
use crate::transcoder::Transcoder;
use crate::workspace::TempWorkspace;

use super::progress::{Progress, Reporter};

use std::path::Path;

pub struct Extract;

impl Extract {
    pub fn execute(
        transcoder: &dyn Transcoder,
        video: &Path,
        frame_rate: u32,
        workspace: &TempWorkspace,
        reporter: &Reporter,
    ) -> Result<FrameSequence> {
        let frames = transcoder.demux(video, frame_rate, workspace.path())?;
        tracing::info!(
            "Extracted {} frames from {} at {} fps into {}",
            frames.len(),
            video.display(),
            frame_rate,
            frames.dir().display()
        );
        reporter.report(Progress::Extracted {
            frames: frames.len(),
        });
        Ok(frames)
    }
}
