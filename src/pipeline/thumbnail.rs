use crate::config::Settings;
use crate::error::Result;
use crate::media;
use crate::transcoder::Transcoder;
use crate::workspace::TempWorkspace;

use std::path::Path;

use image::DynamicImage;

/// A single preview still taken from a video. Not part of any upscale job.
pub struct Thumbnail;

impl Thumbnail {
    const FILE_NAME: &'static str = "thumbnail.png";

    pub fn execute(transcoder: &dyn Transcoder, video: &Path, settings: &Settings) -> Result<DynamicImage> {
        let workspace = TempWorkspace::create(settings.temp_root.as_deref())?;
        let still = workspace.path().join(Self::FILE_NAME);

        transcoder.extract_frame(video, settings.thumbnail_at, &still)?;
        let image = media::load_image(&still)?;
        workspace.close()?;

        tracing::debug!(
            "Extracted {}x{} thumbnail from {}",
            image.width(),
            image.height(),
            video.display()
        );
        Ok(image)
    }
}
