use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::job::{MediaJob, UpscaleResult};
use crate::media::{self, MediaKind};
use crate::output::{self, PartialOutput};

use image::ImageFormat;

pub struct Still;

impl Still {
    /// The explicit override, else the output extension, else whatever the
    /// source was decoded as.
    fn output_format(job: &MediaJob, decoded_as: Option<ImageFormat>) -> Result<ImageFormat> {
        if let Some(format) = job.format() {
            return Ok(format.image_format());
        }
        let target = job.output_path();
        match ImageFormat::from_path(&target) {
            Ok(format) => Ok(format),
            Err(source) => decoded_as.ok_or_else(|| Error::UnsupportedImage {
                path: target,
                source,
            }),
        }
    }

    /// One attempt: load, upscale once, write next to the source.
    pub fn execute(engine: &dyn Engine, job: &MediaJob) -> Result<UpscaleResult> {
        let (image, decoded_as) = media::load_image_with_format(job.input())?;
        let target = job.output_path();
        let format = Self::output_format(job, decoded_as)?;
        let (width, height) = (image.width(), image.height());
        let upscaler = engine.create(job.model())?;
        let upscaled = upscaler.upscale(image)?;
        tracing::info!(
            "Upscaled {} from {}x{} to {}x{} with {}",
            job.input().display(),
            width,
            height,
            upscaled.width(),
            upscaled.height(),
            upscaler.model()
        );

        let partial = PartialOutput::new(&target);
        output::write_image(&upscaled, partial.path(), format)?;
        let output_path = partial.commit()?;

        Ok(UpscaleResult {
            output_path,
            media_kind: MediaKind::Image,
        })
    }
}
