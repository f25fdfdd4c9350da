use crate::error::{Error, Result};

use std::fmt;
use std::str::FromStr;

use image::DynamicImage;

/// Pretrained super-resolution models, in selector order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Model {
    AnimeVideoX2,
    AnimeVideoX3,
    AnimeVideoX4,
    PlusAnimeX4,
    PlusX4,
}

impl Model {
    pub const ALL: [Model; 5] = [
        Model::AnimeVideoX2,
        Model::AnimeVideoX3,
        Model::AnimeVideoX4,
        Model::PlusAnimeX4,
        Model::PlusX4,
    ];

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| Error::InvalidModel(index.to_string()))
    }

    pub fn index(&self) -> usize {
        match self {
            Model::AnimeVideoX2 => 0,
            Model::AnimeVideoX3 => 1,
            Model::AnimeVideoX4 => 2,
            Model::PlusAnimeX4 => 3,
            Model::PlusX4 => 4,
        }
    }

    /// Name of the model files the engine loads.
    pub fn name(&self) -> &'static str {
        match self {
            Model::AnimeVideoX2 | Model::AnimeVideoX3 | Model::AnimeVideoX4 => "realesr-animevideov3",
            Model::PlusAnimeX4 => "realesrgan-x4plus-anime",
            Model::PlusX4 => "realesrgan-x4plus",
        }
    }

    /// Factor the model multiplies width and height by.
    pub fn scale(&self) -> u32 {
        match self {
            Model::AnimeVideoX2 => 2,
            Model::AnimeVideoX3 => 3,
            Model::AnimeVideoX4 | Model::PlusAnimeX4 | Model::PlusX4 => 4,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::AnimeVideoX2 | Model::AnimeVideoX3 | Model::AnimeVideoX4 => {
                write!(f, "{}-x{}", self.name(), self.scale())
            }
            Model::PlusAnimeX4 | Model::PlusX4 => write!(f, "{}", self.name()),
        }
    }
}

impl FromStr for Model {
    type Err = Error;

    /// Accepts either the selector index or the display name.
    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        if let Ok(index) = value.parse::<usize>() {
            return Self::from_index(index);
        }
        Self::ALL
            .into_iter()
            .find(|model| model.to_string().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::InvalidModel(value.to_string()))
    }
}

/// A loaded model, reused for every image of one job.
pub trait Upscaler: Send {
    fn model(&self) -> Model;

    fn upscale(&self, image: DynamicImage) -> Result<DynamicImage>;
}
