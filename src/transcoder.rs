use crate::error::{Error, Result};
use crate::frame::{Frame, FrameSequence};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// Splits videos into stills and joins stills back into videos.
pub trait Transcoder: Send + Sync {
    /// Writes `frame_00000001.png`, `frame_00000002.png`, ... into `dir`.
    fn demux(&self, video: &Path, frame_rate: u32, dir: &Path) -> Result<FrameSequence>;

    /// Encodes `frames` in order at `frame_rate`. Audio is copied from
    /// `audio_source` when one is given and it has any.
    fn mux(
        &self,
        frames: &FrameSequence,
        frame_rate: u32,
        audio_source: Option<&Path>,
        output: &Path,
    ) -> Result<()>;

    fn extract_frame(&self, video: &Path, at: Duration, output: &Path) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct Ffmpeg {
    binary: PathBuf,
    encoder: String,
}

impl Ffmpeg {
    const STDERR_TAIL_LINES: usize = 5;

    pub fn new(binary: impl Into<PathBuf>, encoder: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            encoder: encoder.into(),
        }
    }

    pub fn check_available(&self) -> Result<()> {
        Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|_| ())
            .map_err(|_| Error::FFmpegNotAvailable)
    }

    pub fn validate_encoder(&self) -> Result<()> {
        let output = Command::new(&self.binary)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .output()
            .map_err(|_| Error::FFmpegNotAvailable)?;

        let encoders = String::from_utf8_lossy(&output.stdout);
        let supported = encoders
            .lines()
            .filter_map(|line| line.split_whitespace().nth(1))
            .any(|name| name == self.encoder);
        if !supported {
            return Err(Error::ffmpeg(
                "encoder check",
                format!("encoder {} is not supported", self.encoder),
            ));
        }
        Ok(())
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .args(["-hide_banner", "-loglevel", "error", "-y"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }

    fn demux_command(&self, video: &Path, frame_rate: u32, dir: &Path) -> Command {
        let mut command = self.command();
        command
            .arg("-i")
            .arg(video)
            .args(["-vf", &format!("fps={}", frame_rate)])
            .args(["-start_number", "1"])
            .arg(Frame::pattern(dir));
        command
    }

    fn mux_command(
        &self,
        frames: &FrameSequence,
        frame_rate: u32,
        audio_source: Option<&Path>,
        output: &Path,
    ) -> Command {
        let rate = frame_rate.to_string();
        let mut command = self.command();
        command
            .args(["-framerate", &rate, "-start_number", "1"])
            .arg("-i")
            .arg(frames.pattern());
        if let Some(source) = audio_source {
            command
                .arg("-i")
                .arg(source)
                .args(["-map", "0:v:0", "-map", "1:a?", "-c:a", "copy", "-shortest"]);
        }
        command
            .args(["-c:v", &self.encoder, "-pix_fmt", "yuv420p", "-r", &rate])
            .arg(output);
        command
    }

    fn extract_frame_command(&self, video: &Path, at: Duration, output: &Path) -> Command {
        let mut command = self.command();
        command
            .args(["-ss", &format!("{:.3}", at.as_secs_f64())])
            .arg("-i")
            .arg(video)
            .args(["-frames:v", "1"])
            .arg(output);
        command
    }

    fn run(&self, operation: &'static str, mut command: Command) -> Result<()> {
        tracing::debug!("Running ffmpeg {}: {:?}", operation, command);
        let output = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::FFmpegNotAvailable,
            _ => Error::ffmpeg(operation, e.to_string()),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(Self::STDERR_TAIL_LINES)..].join("\n");
            return Err(Error::ffmpeg(
                operation,
                format!("exited with {}: {}", output.status, tail.trim()),
            ));
        }
        Ok(())
    }
}

impl Transcoder for Ffmpeg {
    fn demux(&self, video: &Path, frame_rate: u32, dir: &Path) -> Result<FrameSequence> {
        self.run("demux", self.demux_command(video, frame_rate, dir))?;
        FrameSequence::collect(dir)
    }

    fn mux(
        &self,
        frames: &FrameSequence,
        frame_rate: u32,
        audio_source: Option<&Path>,
        output: &Path,
    ) -> Result<()> {
        self.run("remux", self.mux_command(frames, frame_rate, audio_source, output))?;
        if !output.is_file() {
            return Err(Error::ffmpeg("remux", "no output file was written"));
        }
        Ok(())
    }

    fn extract_frame(&self, video: &Path, at: Duration, output: &Path) -> Result<()> {
        self.run("frame extraction", self.extract_frame_command(video, at, output))?;
        if !output.is_file() {
            return Err(Error::ffmpeg(
                "frame extraction",
                format!("no frame at {:.3}s", at.as_secs_f64()),
            ));
        }
        Ok(())
    }
}
