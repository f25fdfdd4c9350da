use std::io;
use std::path::PathBuf;

use clap::{value_parser, Parser};
use zenith_upscaler::{
    classify, Backend, Error, Ffmpeg, MediaJob, MediaKind, Model, NcnnVulkan, OutputFormat, Settings,
};

/// Upscale an image or a short video with a Real-ESRGAN model.
#[derive(Parser, Debug)]
#[command(name = "zenith", version)]
pub struct Args {
    /// Image or video to upscale
    #[arg(short, long)]
    pub input: PathBuf,

    /// Model index (0-4) or name, e.g. realesrgan-x4plus
    #[arg(short, long, default_value = "0")]
    pub model: Model,

    /// Requested scale factor
    #[arg(short, long, default_value_t = 2, value_parser = value_parser!(u32).range(2..=4))]
    pub scale: u32,

    /// Re-encode a still image as png, jpeg or webp
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Frame rate used to split and rejoin videos
    #[arg(long, default_value_t = Settings::DEFAULT_FRAME_RATE, value_parser = value_parser!(u32).range(1..=240))]
    pub frame_rate: u32,

    /// Video encoder passed to ffmpeg
    #[arg(short, long, default_value = "libx264")]
    pub encoder: String,

    /// GPU the engine runs on
    #[arg(short, long, default_value_t = 0)]
    pub gpu: i32,

    #[arg(long, env = "ZENITH_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    #[arg(long, env = "ZENITH_ENGINE", default_value = "realesrgan-ncnn-vulkan")]
    pub engine: PathBuf,

    /// Directory for temporary frames (defaults to the system temp dir)
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,

    /// Drop the source audio track from upscaled videos
    #[arg(long)]
    pub no_audio: bool,

    /// Print the original and expected resolution, then exit
    #[arg(long)]
    pub preview: bool,

    /// Use the in-process engine instead of the external binary
    #[cfg(feature = "realesrgan")]
    #[arg(long)]
    pub embedded: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn settings(&self) -> Settings {
        Settings {
            ffmpeg: self.ffmpeg.clone(),
            engine: self.engine.clone(),
            gpu_id: self.gpu,
            frame_rate: self.frame_rate,
            encoder: self.encoder.clone(),
            temp_root: self.temp_dir.clone(),
            keep_audio: !self.no_audio,
            ..Settings::default()
        }
    }

    #[cfg(feature = "realesrgan")]
    pub fn backend(&self, settings: &Settings) -> Backend {
        if !self.embedded {
            return Backend::from_settings(settings);
        }
        Backend::new(
            std::sync::Arc::new(zenith_upscaler::engine::Embedded),
            std::sync::Arc::new(Ffmpeg::new(&settings.ffmpeg, &settings.encoder)),
        )
    }

    #[cfg(not(feature = "realesrgan"))]
    pub fn backend(&self, settings: &Settings) -> Backend {
        Backend::from_settings(settings)
    }

    pub fn job(&self) -> MediaJob {
        let job = MediaJob::new(&self.input, self.model, self.scale);
        match self.format {
            Some(format) => job.with_format(format),
            None => job,
        }
    }

    pub fn kind(&self) -> MediaKind {
        classify(&self.input)
    }

    /// Image headers are cheap to read. Video resolution needs an ffmpeg run,
    /// so outside `--preview` it is skipped.
    pub fn reads_resolution_up_front(&self) -> bool {
        self.preview || self.kind() == MediaKind::Image
    }

    pub fn print_options(&self) {
        println!("Input:      {}", self.input.display());
        if !self.preview {
            println!("Output:     {}", self.job().output_path().display());
        }
        println!("Model:      {}", self.model);
        println!("Scale:      {}x", self.scale);
        if self.kind() == MediaKind::Video {
            println!("Encoder:    {}", self.encoder);
            println!("Frame rate: {}", self.frame_rate);
        } else if let Some(format) = self.format {
            println!("Format:     {}", format);
        }
    }

    /// Checks the input and the external tools this run needs before any
    /// work starts.
    pub fn validate(&self, settings: &Settings) -> Result<(), Error> {
        self.validate_input()?;
        if self.kind() == MediaKind::Video {
            let ffmpeg = Ffmpeg::new(&settings.ffmpeg, &settings.encoder);
            ffmpeg.check_available()?;
            if !self.preview {
                ffmpeg.validate_encoder()?;
            }
        }
        if !self.preview && !self.uses_embedded_engine() {
            NcnnVulkan::new(&settings.engine, settings.gpu_id).check_available()?;
        }
        Ok(())
    }

    #[cfg(feature = "realesrgan")]
    fn uses_embedded_engine(&self) -> bool {
        self.embedded
    }

    #[cfg(not(feature = "realesrgan"))]
    fn uses_embedded_engine(&self) -> bool {
        false
    }

    fn validate_input(&self) -> Result<(), Error> {
        if !self.input.is_file() {
            return Err(Error::io(
                format!("opening {}", self.input.display()),
                io::Error::new(io::ErrorKind::NotFound, "input is not a file"),
            ));
        }
        Ok(())
    }
}
