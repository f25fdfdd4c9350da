use crate::error::{Error, Result};
use crate::model::{Model, Upscaler};

use super::Engine;

use image::{DynamicImage, RgbImage};
use realesrgan_rs::{Options, OptionsModel, RealEsrgan};

/// In-process Real-ESRGAN. Only the x4plus weights are compiled in.
#[derive(Clone, Copy, Debug, Default)]
pub struct Embedded;

impl Engine for Embedded {
    fn create(&self, model: Model) -> Result<Box<dyn Upscaler>> {
        let weights = match model {
            Model::PlusX4 => OptionsModel::RealESRGANPlusx4,
            Model::PlusAnimeX4 => OptionsModel::RealESRGANPlusx4Anime,
            other => {
                return Err(Error::InvalidModel(format!(
                    "{} is not bundled with the embedded engine",
                    other
                )))
            }
        };
        let options = Options::default().model(weights);
        let esrgan = RealEsrgan::new(options).map_err(|e| Error::EngineUnavailable(format!("{:?}", e)))?;
        Ok(Box::new(EmbeddedSession { esrgan, model }))
    }
}

struct EmbeddedSession {
    esrgan: RealEsrgan,
    model: Model,
}

impl Upscaler for EmbeddedSession {
    fn model(&self) -> Model {
        self.model
    }

    fn upscale(&self, image: DynamicImage) -> Result<DynamicImage> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let bytes = self
            .esrgan
            .process(rgb.as_raw(), width as usize, height as usize)
            .map_err(Error::UpscaleFailed)?;

        let scale = self.model.scale();
        RgbImage::from_raw(width * scale, height * scale, bytes)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| Error::UpscaleFailed("engine returned a truncated image buffer".to_string()))
    }
}
