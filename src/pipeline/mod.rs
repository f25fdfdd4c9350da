mod extract;
mod merge;
mod progress;
mod still;
mod thumbnail;
mod upscale;

pub use progress::{Progress, Reporter};

use extract::Extract;
use merge::Merge;
use still::Still;
use thumbnail::Thumbnail;
use upscale::Upscale;

use crate::config::Settings;
use crate::error::Result;
use crate::job::{Backend, MediaJob, UpscaleResult};
use crate::media::{self, Dimensions, MediaKind};
use crate::model::Upscaler;
use crate::output::PartialOutput;
use crate::workspace::TempWorkspace;

use std::path::Path;

use image::DynamicImage;

/// Runs one job to its single outcome on the calling thread.
pub struct Pipeline<'a> {
    backend: &'a Backend,
    settings: &'a Settings,
    reporter: Reporter,
}

impl<'a> Pipeline<'a> {
    pub fn new(backend: &'a Backend, settings: &'a Settings) -> Self {
        Self {
            backend,
            settings,
            reporter: Reporter::silent(),
        }
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn execute(&self, job: &MediaJob) -> Result<UpscaleResult> {
        let kind = job.kind();
        tracing::info!(
            "Upscaling {} {} with {}",
            kind,
            job.input().display(),
            job.model()
        );
        if job.scale_factor() != job.model().scale() {
            tracing::warn!(
                "Requested x{} but {} upscales x{}",
                job.scale_factor(),
                job.model(),
                job.model().scale()
            );
        }
        self.reporter.report(Progress::Started { kind });

        match kind {
            MediaKind::Image => Still::execute(self.backend.engine.as_ref(), job),
            MediaKind::Video => self.execute_video(job),
        }
    }

    fn execute_video(&self, job: &MediaJob) -> Result<UpscaleResult> {
        let target = job.output_path();
        let upscaler = self.backend.engine.create(job.model())?;
        let workspace = TempWorkspace::create(self.settings.temp_root.as_deref())?;

        // Every early return below drops the workspace and the partial output.
        let partial = self.process_video(job.input(), upscaler.as_ref(), &workspace, &target)?;
        workspace.close()?;
        let output_path = partial.commit()?;

        Ok(UpscaleResult {
            output_path,
            media_kind: MediaKind::Video,
        })
    }

    fn process_video(
        &self,
        source: &Path,
        upscaler: &dyn Upscaler,
        workspace: &TempWorkspace,
        target: &Path,
    ) -> Result<PartialOutput> {
        let transcoder = self.backend.transcoder.as_ref();
        let frame_rate = self.settings.frame_rate;

        let frames = Extract::execute(transcoder, source, frame_rate, workspace, &self.reporter)?;
        Upscale::execute(&frames, upscaler, &self.reporter)?;
        Merge::execute(transcoder, &frames, source, self.settings, target, &self.reporter)
    }

    /// Grabs the preview still of a video.
    pub fn thumbnail(&self, video: &Path) -> Result<DynamicImage> {
        Thumbnail::execute(self.backend.transcoder.as_ref(), video, self.settings)
    }

    /// Resolution of the media at `path`, read from the file header for
    /// images and from the thumbnail for videos.
    pub fn dimensions(&self, path: &Path) -> Result<Dimensions> {
        match media::classify(path) {
            MediaKind::Image => Dimensions::of_image(path),
            MediaKind::Video => {
                let thumbnail = self.thumbnail(path)?;
                Ok(Dimensions::new(thumbnail.width(), thumbnail.height()))
            }
        }
    }
}
