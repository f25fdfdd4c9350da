use crate::error::{Error, Result};

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{DynamicImage, ImageFormat};

/// Infix inserted between the original base name and its extension.
pub const SUFFIX: &str = "_upscaled";

/// `<dir>/<base>_upscaled<.ext>`, keeping the original extension.
pub fn upscaled_path(input: &Path) -> PathBuf {
    let extension = input.extension().map(|ext| ext.to_os_string());
    upscaled_path_with_extension(input, extension)
}

pub fn upscaled_path_as(input: &Path, format: OutputFormat) -> PathBuf {
    upscaled_path_with_extension(input, Some(OsString::from(format.extension())))
}

fn upscaled_path_with_extension(input: &Path, extension: Option<OsString>) -> PathBuf {
    let mut name = input.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
    name.push(SUFFIX);
    if let Some(extension) = extension {
        name.push(".");
        name.push(extension);
    }
    input.with_file_name(name)
}

/// Still-image encodings the user may pick instead of the source's own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Webp => ImageFormat::WebP,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::Webp),
            other => Err(format!("unsupported output format: {}", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "PNG"),
            OutputFormat::Jpeg => write!(f, "JPEG"),
            OutputFormat::Webp => write!(f, "WEBP"),
        }
    }
}

/// A hidden sibling of the final output that only becomes visible under the
/// final name through [`PartialOutput::commit`]. Dropping it uncommitted
/// removes whatever was written so far.
pub struct PartialOutput {
    partial: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl PartialOutput {
    pub fn new(target: &Path) -> Self {
        let mut name = OsString::from(".");
        name.push(target.file_stem().unwrap_or_default());
        name.push(".partial");
        if let Some(extension) = target.extension() {
            name.push(".");
            name.push(extension);
        }
        Self {
            partial: target.with_file_name(name),
            target: target.to_path_buf(),
            committed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.partial
    }

    pub fn commit(mut self) -> Result<PathBuf> {
        fs::rename(&self.partial, &self.target).map_err(|e| {
            Error::io(format!("moving output into place at {}", self.target.display()), e)
        })?;
        self.committed = true;
        Ok(self.target.clone())
    }
}

impl Drop for PartialOutput {
    fn drop(&mut self) {
        if self.committed || !self.partial.exists() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.partial) {
            tracing::warn!("Failed to remove partial output {}: {}", self.partial.display(), e);
        }
    }
}

/// Encodes `image` at `path` in `format`. JPEG has no alpha channel, so the
/// image is flattened to RGB first.
pub fn write_image(image: &DynamicImage, path: &Path, format: ImageFormat) -> Result<()> {
    let result = if format == ImageFormat::Jpeg && image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, format)
    } else {
        image.save_with_format(path, format)
    };
    result.map_err(|source| Error::ImageWrite {
        path: path.to_path_buf(),
        source,
    })
}
