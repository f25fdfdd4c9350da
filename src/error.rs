use std::io;
use std::path::PathBuf;

use image::error::ImageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The three terminal failure families a job can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Engine,
    Transcode,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown model selector: {0}")]
    InvalidModel(String),
    #[error("Upscale engine is not available: {0}")]
    EngineUnavailable(String),
    #[error("Upscaling operation failed: {0}")]
    UpscaleFailed(String),
    #[error("Unsupported image {}: {source}", .path.display())]
    UnsupportedImage {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("Worker thread panicked: {0}")]
    WorkerPanicked(String),

    #[error("FFmpeg is not available on this system")]
    FFmpegNotAvailable,
    #[error("FFmpeg {operation} failed: {message}")]
    FfmpegFailed {
        operation: &'static str,
        message: String,
    },
    #[error("No frames were extracted into {}", .0.display())]
    NoFrames(PathBuf),
    #[error("Frame sequence has a gap: expected frame {expected}, found frame {found}")]
    FrameSequenceGap { expected: usize, found: usize },

    #[error("I/O operation failed while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write image {}: {source}", .path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

impl Error {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    pub fn ffmpeg(operation: &'static str, message: impl Into<String>) -> Self {
        Error::FfmpegFailed {
            operation,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidModel(_)
            | Error::EngineUnavailable(_)
            | Error::UpscaleFailed(_)
            | Error::UnsupportedImage { .. }
            | Error::WorkerPanicked(_) => ErrorKind::Engine,
            Error::FFmpegNotAvailable
            | Error::FfmpegFailed { .. }
            | Error::NoFrames(_)
            | Error::FrameSequenceGap { .. } => ErrorKind::Transcode,
            Error::Io { .. } | Error::ImageWrite { .. } => ErrorKind::Io,
        }
    }
}
