//! Upscales still images and short videos with an external super-resolution
//! engine, off the caller's thread.
//!
//! Still images go through the engine once. Videos are demuxed into numbered
//! PNG frames inside a temporary workspace, each frame is upscaled in place
//! in order, and the frames are remuxed at the same fixed rate. The workspace
//! never outlives the job.

pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod job;
pub mod media;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod transcoder;
pub mod workspace;

pub use config::Settings;
pub use engine::{Engine, NcnnVulkan};
pub use error::{Error, ErrorKind, Result};
pub use job::{submit, Backend, JobHandle, MediaJob, Outcome, UpscaleResult};
pub use media::{classify, Dimensions, MediaKind};
pub use model::{Model, Upscaler};
pub use output::OutputFormat;
pub use pipeline::{Pipeline, Progress};
pub use transcoder::{Ffmpeg, Transcoder};
