#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use tempfile::TempDir;
use zenith_upscaler::frame::{Frame, FrameSequence};
use zenith_upscaler::{Backend, Error, Model, Result, Settings, Transcoder, Upscaler};

pub const FRAME_SIZE: u32 = 4;

/// Resizes by the model's factor. Can be told to fail or panic on the Nth
/// upscale call, counted from 1 across all upscalers it creates.
#[derive(Clone, Default)]
pub struct FakeEngine {
    pub calls: Arc<AtomicUsize>,
    pub created: Arc<AtomicUsize>,
    /// Name of the thread each upscale call ran on.
    pub threads: Arc<Mutex<Vec<Option<String>>>>,
    /// Directory removed right before the `remove_workspace_on` call returns.
    pub workspace: Arc<Mutex<Option<PathBuf>>>,
    pub remove_workspace_on: Option<usize>,
    pub fail_on: Option<usize>,
    pub panic_on: Option<usize>,
}

impl FakeEngine {
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    pub fn panicking_on(call: usize) -> Self {
        Self {
            panic_on: Some(call),
            ..Self::default()
        }
    }

    /// Pulls the workspace out from under the video job on the given call,
    /// so writing that frame back fails.
    pub fn removing_workspace_on(call: usize, transcoder: &FakeTranscoder) -> Self {
        Self {
            workspace: transcoder.demux_dir.clone(),
            remove_workspace_on: Some(call),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl zenith_upscaler::Engine for FakeEngine {
    fn create(&self, model: Model) -> Result<Box<dyn Upscaler>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeUpscaler {
            model,
            engine: self.clone(),
        }))
    }
}

struct FakeUpscaler {
    model: Model,
    engine: FakeEngine,
}

impl Upscaler for FakeUpscaler {
    fn model(&self) -> Model {
        self.model
    }

    fn upscale(&self, image: DynamicImage) -> Result<DynamicImage> {
        let call = self.engine.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.engine
            .threads
            .lock()
            .unwrap()
            .push(thread::current().name().map(str::to_string));
        if self.engine.remove_workspace_on == Some(call) {
            if let Some(dir) = self.engine.workspace.lock().unwrap().as_ref() {
                fs::remove_dir_all(dir).unwrap();
            }
        }
        if self.engine.panic_on == Some(call) {
            panic!("fake engine crashed on call {}", call);
        }
        if self.engine.fail_on == Some(call) {
            return Err(Error::UpscaleFailed(format!("fake engine refused call {}", call)));
        }
        let scale = self.model.scale();
        let resized = imageops::resize(&image, image.width() * scale, image.height() * scale, FilterType::Nearest);
        Ok(DynamicImage::ImageRgba8(resized))
    }
}

/// Demuxes to tiny frames whose red channel holds the frame index. Muxing
/// writes the indices it read, one per line, so tests can check the order.
#[derive(Clone)]
pub struct FakeTranscoder {
    pub frames: usize,
    pub fail_demux: bool,
    pub fail_mux: bool,
    pub muxed: Arc<Mutex<Vec<usize>>>,
    pub muxed_sizes: Arc<Mutex<Vec<(u32, u32)>>>,
    pub audio_sources: Arc<Mutex<Vec<Option<PathBuf>>>>,
    pub extracted_at: Arc<Mutex<Vec<Duration>>>,
    pub demux_dir: Arc<Mutex<Option<PathBuf>>>,
}

impl FakeTranscoder {
    pub fn with_frames(frames: usize) -> Self {
        Self {
            frames,
            fail_demux: false,
            fail_mux: false,
            muxed: Arc::default(),
            muxed_sizes: Arc::default(),
            audio_sources: Arc::default(),
            extracted_at: Arc::default(),
            demux_dir: Arc::default(),
        }
    }

    pub fn muxed(&self) -> Vec<usize> {
        self.muxed.lock().unwrap().clone()
    }
}

impl Transcoder for FakeTranscoder {
    fn demux(&self, _video: &Path, _frame_rate: u32, dir: &Path) -> Result<FrameSequence> {
        if self.fail_demux {
            return Err(Error::ffmpeg("demux", "fake demux failure"));
        }
        *self.demux_dir.lock().unwrap() = Some(dir.to_path_buf());
        for index in 1..=self.frames {
            let frame = Frame::new(dir, index);
            RgbImage::from_pixel(FRAME_SIZE, FRAME_SIZE, Rgb([index as u8, 0, 0]))
                .save(&frame.path)
                .unwrap();
        }
        FrameSequence::collect(dir)
    }

    fn mux(&self, frames: &FrameSequence, _frame_rate: u32, audio_source: Option<&Path>, output: &Path) -> Result<()> {
        self.audio_sources
            .lock()
            .unwrap()
            .push(audio_source.map(Path::to_path_buf));

        let mut lines = Vec::new();
        for frame in frames {
            let image = image::open(&frame.path).unwrap().to_rgb8();
            self.muxed_sizes.lock().unwrap().push(image.dimensions());
            let index = image.get_pixel(0, 0)[0] as usize;
            self.muxed.lock().unwrap().push(index);
            lines.push(index.to_string());
        }
        fs::write(output, lines.join("\n")).unwrap();

        if self.fail_mux {
            return Err(Error::ffmpeg("mux", "fake mux failure"));
        }
        Ok(())
    }

    fn extract_frame(&self, _video: &Path, at: Duration, output: &Path) -> Result<()> {
        self.extracted_at.lock().unwrap().push(at);
        RgbImage::from_pixel(16, 9, Rgb([10, 20, 30])).save(output).unwrap();
        Ok(())
    }
}

/// A media directory plus a private temp root, so tests can assert that
/// nothing is left behind in either.
pub struct Fixture {
    pub media: TempDir,
    pub temp_root: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            media: tempfile::tempdir().unwrap(),
            temp_root: tempfile::tempdir().unwrap(),
        }
    }

    pub fn settings(&self) -> Settings {
        Settings {
            temp_root: Some(self.temp_root.path().to_path_buf()),
            ..Settings::default()
        }
    }

    pub fn image(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.media.path().join(name);
        RgbImage::from_pixel(width, height, Rgb([200, 100, 50])).save(&path).unwrap();
        path
    }

    pub fn video(&self, name: &str) -> PathBuf {
        let path = self.media.path().join(name);
        fs::write(&path, b"not really a video").unwrap();
        path
    }

    pub fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.media.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Sorted file names in the media directory, hidden ones included.
    pub fn media_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.media.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn temp_root_is_empty(&self) -> bool {
        fs::read_dir(self.temp_root.path()).unwrap().next().is_none()
    }
}

pub fn backend(engine: &FakeEngine, transcoder: &FakeTranscoder) -> Backend {
    Backend::new(Arc::new(engine.clone()), Arc::new(transcoder.clone()))
}
