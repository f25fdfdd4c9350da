use crate::error::Result;
use crate::frame::{Frame, FrameSequence};
use crate::media;
use crate::model::Upscaler;
use crate::output;

use super::progress::{Progress, Reporter};

use image::ImageFormat;

pub struct Upscale;

impl Upscale {
    fn process_frame(frame: &Frame, upscaler: &dyn Upscaler) -> Result<()> {
        let image = media::load_image(&frame.path)?;
        let upscaled = upscaler.upscale(image)?;
        output::write_image(&upscaled, &frame.path, ImageFormat::Png)
    }

    /// Upscales every frame in place, strictly one after another. The first
    /// failure stops the loop; later frames are left untouched.
    pub fn execute(frames: &FrameSequence, upscaler: &dyn Upscaler, reporter: &Reporter) -> Result<()> {
        let total = frames.len();
        for frame in frames {
            Self::process_frame(frame, upscaler).inspect_err(|e| {
                tracing::warn!("Frame {}/{} failed: {}", frame.index, total, e);
            })?;
            tracing::debug!("Upscaled frame {}/{} with {}", frame.index, total, upscaler.model());
            reporter.report(Progress::Upscaled {
                frame: frame.index,
                total,
            });
        }
        Ok(())
    }
}
