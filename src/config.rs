use std::path::PathBuf;
use std::time::Duration;

/// Fixed configuration shared by every job of one application instance.
///
/// The frame rate is used for both demuxing and remuxing; it is not probed
/// from the source video.
#[derive(Clone, Debug)]
pub struct Settings {
    pub ffmpeg: PathBuf,
    pub engine: PathBuf,
    pub gpu_id: i32,
    pub frame_rate: u32,
    pub encoder: String,
    pub thumbnail_at: Duration,
    /// Parent directory for job workspaces, `None` for the system temp dir.
    pub temp_root: Option<PathBuf>,
    pub keep_audio: bool,
}

impl Settings {
    pub const DEFAULT_FRAME_RATE: u32 = 30;
    pub const DEFAULT_THUMBNAIL_AT: Duration = Duration::from_secs(1);
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            engine: PathBuf::from("realesrgan-ncnn-vulkan"),
            gpu_id: 0,
            frame_rate: Self::DEFAULT_FRAME_RATE,
            encoder: String::from("libx264"),
            thumbnail_at: Self::DEFAULT_THUMBNAIL_AT,
            temp_root: None,
            keep_audio: true,
        }
    }
}
