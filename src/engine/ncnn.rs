use crate::error::{Error, Result};
use crate::model::{Model, Upscaler};
use crate::output;

use super::Engine;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::{DynamicImage, ImageFormat};
use tempfile::TempDir;

/// Drives the `realesrgan-ncnn-vulkan` executable.
#[derive(Clone, Debug)]
pub struct NcnnVulkan {
    binary: PathBuf,
    gpu_id: i32,
}

impl NcnnVulkan {
    pub fn new(binary: impl Into<PathBuf>, gpu_id: i32) -> Self {
        Self {
            binary: binary.into(),
            gpu_id,
        }
    }

    /// Spawns the binary once to make sure it is installed.
    pub fn check_available(&self) -> Result<()> {
        match Command::new(&self.binary)
            .arg("-h")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::EngineUnavailable(format!(
                "{} not found",
                self.binary.display()
            ))),
            Err(e) => Err(Error::EngineUnavailable(e.to_string())),
            Ok(_) => Ok(()),
        }
    }
}

impl Engine for NcnnVulkan {
    fn create(&self, model: Model) -> Result<Box<dyn Upscaler>> {
        self.check_available()?;
        let scratch = tempfile::Builder::new()
            .prefix("zenith-engine-")
            .tempdir()
            .map_err(|e| Error::io("creating engine scratch directory", e))?;
        tracing::debug!("Loaded {} from {}", model, self.binary.display());
        Ok(Box::new(NcnnSession {
            binary: self.binary.clone(),
            gpu_id: self.gpu_id,
            model,
            scratch,
        }))
    }
}

struct NcnnSession {
    binary: PathBuf,
    gpu_id: i32,
    model: Model,
    scratch: TempDir,
}

impl NcnnSession {
    const INPUT: &'static str = "input.png";
    const OUTPUT: &'static str = "output.png";

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .args(["-n", self.model.name()])
            .args(["-s", &self.model.scale().to_string()])
            .args(["-g", &self.gpu_id.to_string()])
            .args(["-f", "png"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }

    fn run(&self, input: &Path, output: &Path) -> Result<DynamicImage> {
        let mut command = self.command(input, output);
        tracing::debug!("Running {:?}", command);

        let result = command
            .output()
            .map_err(|e| Error::UpscaleFailed(format!("failed to spawn engine: {}", e)))?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::UpscaleFailed(format!(
                "engine exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        image::open(output)
            .map_err(|e| Error::UpscaleFailed(format!("engine produced no readable image: {}", e)))
    }
}

impl Upscaler for NcnnSession {
    fn model(&self) -> Model {
        self.model
    }

    fn upscale(&self, image: DynamicImage) -> Result<DynamicImage> {
        let input = self.scratch.path().join(Self::INPUT);
        let output = self.scratch.path().join(Self::OUTPUT);
        output::write_image(&image, &input, ImageFormat::Png)?;
        drop(image);

        let result = self.run(&input, &output);
        for path in [&input, &output] {
            if let Err(e) = fs::remove_file(path) {
                tracing::debug!("Could not remove scratch file {}: {}", path.display(), e);
            }
        }
        result
    }
}
