use crate::config::Settings;
use crate::engine::{Engine, NcnnVulkan};
use crate::error::{Error, Result};
use crate::media::{self, MediaKind};
use crate::model::Model;
use crate::output::{self, OutputFormat};
use crate::pipeline::{Pipeline, Progress, Reporter};
use crate::transcoder::{Ffmpeg, Transcoder};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, TryRecvError};

/// What to upscale and how. Fixed once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaJob {
    input: PathBuf,
    model: Model,
    scale_factor: u32,
    format: Option<OutputFormat>,
}

impl MediaJob {
    pub fn new(input: impl Into<PathBuf>, model: Model, scale_factor: u32) -> Self {
        Self {
            input: input.into(),
            model,
            scale_factor,
            format: None,
        }
    }

    /// Re-encodes still-image output; ignored for video.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn scale_factor(&self) -> u32 {
        self.scale_factor
    }

    pub fn format(&self) -> Option<OutputFormat> {
        self.format
    }

    pub fn kind(&self) -> MediaKind {
        media::classify(&self.input)
    }

    pub fn output_path(&self) -> PathBuf {
        match (self.kind(), self.format) {
            (MediaKind::Image, Some(format)) => output::upscaled_path_as(&self.input, format),
            _ => output::upscaled_path(&self.input),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpscaleResult {
    pub output_path: PathBuf,
    pub media_kind: MediaKind,
}

pub type Outcome = Result<UpscaleResult>;

/// The external collaborators a job delegates to.
#[derive(Clone)]
pub struct Backend {
    pub engine: Arc<dyn Engine>,
    pub transcoder: Arc<dyn Transcoder>,
}

impl Backend {
    pub fn new(engine: Arc<dyn Engine>, transcoder: Arc<dyn Transcoder>) -> Self {
        Self { engine, transcoder }
    }

    /// `realesrgan-ncnn-vulkan` and `ffmpeg` as configured.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Arc::new(NcnnVulkan::new(&settings.engine, settings.gpu_id)),
            Arc::new(Ffmpeg::new(&settings.ffmpeg, &settings.encoder)),
        )
    }
}

/// A job running on its own worker thread. It yields exactly one outcome,
/// taken by [`JobHandle::wait`] or [`JobHandle::try_wait`].
pub struct JobHandle {
    progress: Receiver<Progress>,
    outcome: Receiver<Outcome>,
    finished: Receiver<()>,
    worker: Option<JoinHandle<()>>,
}

impl JobHandle {
    /// Progress events. The channel disconnects before the outcome is sent.
    pub fn progress(&self) -> &Receiver<Progress> {
        &self.progress
    }

    /// Never carries a message. It disconnects once the outcome is ready, so
    /// front ends can `select!` on it and then call `try_wait`. Receiving from
    /// it does not consume anything.
    pub fn finished(&self) -> &Receiver<()> {
        &self.finished
    }

    /// Blocks until the job finishes.
    pub fn wait(mut self) -> Outcome {
        let outcome = self.outcome.recv().unwrap_or_else(|_| Err(Self::lost()));
        self.join();
        outcome
    }

    /// Returns the outcome if the job has finished, otherwise hands the
    /// handle back.
    pub fn try_wait(mut self) -> std::result::Result<Outcome, JobHandle> {
        match self.outcome.try_recv() {
            Ok(outcome) => {
                self.join();
                Ok(outcome)
            }
            Err(TryRecvError::Empty) => Err(self),
            Err(TryRecvError::Disconnected) => {
                self.join();
                Ok(Err(Self::lost()))
            }
        }
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    /// Only reachable when the worker died without sending, since the
    /// outcome receiver never leaves the handle.
    fn lost() -> Error {
        Error::WorkerPanicked("worker exited without reporting an outcome".to_string())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Starts `job` on a background thread and returns immediately.
pub fn submit(job: MediaJob, backend: Backend, settings: Settings) -> JobHandle {
    let (progress_sender, progress) = unbounded();
    let (outcome_sender, outcome) = bounded::<Outcome>(1);
    let (finished_sender, finished) = bounded::<()>(0);
    let spawn_failure = outcome_sender.clone();

    let spawned = thread::Builder::new()
        .name("zenith-job".to_string())
        .spawn(move || {
            let reporter = Reporter::new(progress_sender);
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                Pipeline::new(&backend, &settings)
                    .with_reporter(reporter)
                    .execute(&job)
            }));
            let outcome = result.unwrap_or_else(|payload| {
                Err(Error::WorkerPanicked(panic_message(payload.as_ref())))
            });

            match &outcome {
                Ok(result) => tracing::info!("Finished {}", result.output_path.display()),
                Err(e) => tracing::error!("Upscaling {} failed: {}", job.input().display(), e),
            }
            let _ = outcome_sender.send(outcome);
            drop(finished_sender);
        });

    let worker = match spawned {
        Ok(worker) => Some(worker),
        Err(e) => {
            let _ = spawn_failure.send(Err(Error::io("spawning worker thread", e)));
            None
        }
    };

    JobHandle {
        progress,
        outcome,
        finished,
        worker,
    }
}
