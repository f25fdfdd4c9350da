use crate::error::{Error, Result};

use std::fmt;
use std::path::Path;

use image::error::ImageError;
use image::{DynamicImage, ImageFormat, ImageReader};

/// Container extensions routed to the video path. Matched case-insensitively.
pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Classifies a path by its extension alone. The file is never opened, so a
/// misnamed file is routed by its name.
pub fn classify(path: impl AsRef<Path>) -> MediaKind {
    let is_video = path
        .as_ref()
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_lowercase)
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()));

    if is_video {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}

fn read_error(path: &Path, e: ImageError) -> Error {
    match e {
        ImageError::IoError(e) => Error::io(format!("reading {}", path.display()), e),
        other => Error::UnsupportedImage {
            path: path.to_path_buf(),
            source: other,
        },
    }
}

/// Decodes an image, sniffing the content when the extension lies. Failing to
/// read the file is an I/O failure; failing to decode it is an engine one.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    load_image_with_format(path).map(|(image, _)| image)
}

/// Like [`load_image`], also returning the format the content was decoded as.
pub fn load_image_with_format(path: &Path) -> Result<(DynamicImage, Option<ImageFormat>)> {
    let reader = ImageReader::open(path)
        .map_err(|e| Error::io(format!("reading {}", path.display()), e))?
        .with_guessed_format()
        .map_err(|e| Error::io(format!("reading {}", path.display()), e))?;
    let format = reader.format();
    let image = reader.decode().map_err(|e| read_error(path, e))?;
    Ok((image, format))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reads the header of an image file without decoding its pixels.
    pub fn of_image(path: &Path) -> Result<Self> {
        image::image_dimensions(path)
            .map(|(width, height)| Self::new(width, height))
            .map_err(|e| read_error(path, e))
    }

    /// Saturates at `u32::MAX` instead of overflowing.
    pub fn scaled(&self, factor: u32) -> Self {
        Self::new(self.width.saturating_mul(factor), self.height.saturating_mul(factor))
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
