mod ncnn;
#[cfg(feature = "realesrgan")]
mod embedded;

pub use ncnn::NcnnVulkan;
#[cfg(feature = "realesrgan")]
pub use embedded::Embedded;

use crate::error::Result;
use crate::model::{Model, Upscaler};

/// Loads models. Each job asks for exactly one [`Upscaler`] and keeps it for
/// all of its frames.
pub trait Engine: Send + Sync {
    fn create(&self, model: Model) -> Result<Box<dyn Upscaler>>;
}
