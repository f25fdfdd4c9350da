use crate::error::{Error, Result};

use std::fs;
use std::path::{Path, PathBuf};

/// One extracted still, numbered from 1 in temporal order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub index: usize,
    pub path: PathBuf,
}

impl Frame {
    pub const PREFIX: &'static str = "frame_";
    pub const EXTENSION: &'static str = "png";
    const DIGITS: usize = 8;

    pub fn new(dir: &Path, index: usize) -> Self {
        let name = format!(
            "{}{:0width$}.{}",
            Self::PREFIX,
            index,
            Self::EXTENSION,
            width = Self::DIGITS
        );
        Self {
            index,
            path: dir.join(name),
        }
    }

    /// The printf-style pattern ffmpeg reads and writes, e.g. `frame_%08d.png`.
    pub fn pattern(dir: &Path) -> PathBuf {
        dir.join(format!("{}%0{}d.{}", Self::PREFIX, Self::DIGITS, Self::EXTENSION))
    }

    fn parse_index(path: &Path) -> Option<usize> {
        if path.extension()?.to_str()? != Self::EXTENSION {
            return None;
        }
        let digits = path.file_stem()?.to_str()?.strip_prefix(Self::PREFIX)?;
        if digits.len() != Self::DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

/// The frames of one video run, ordered and contiguous from 1.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    dir: PathBuf,
    frames: Vec<Frame>,
}

impl FrameSequence {
    /// Collects every `frame_NNNNNNNN.png` in `dir`. Other files are ignored.
    pub fn collect(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir)
            .map_err(|e| Error::io(format!("reading frame directory {}", dir.display()), e))?;

        let mut frames = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("reading frame directory entry", e))?;
            let path = entry.path();
            if let Some(index) = Frame::parse_index(&path) {
                frames.push(Frame { index, path });
            }
        }
        frames.sort_by_key(|frame| frame.index);

        if frames.is_empty() {
            return Err(Error::NoFrames(dir.to_path_buf()));
        }
        for (position, frame) in frames.iter().enumerate() {
            let expected = position + 1;
            if frame.index != expected {
                return Err(Error::FrameSequenceGap {
                    expected,
                    found: frame.index,
                });
            }
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            frames,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pattern(&self) -> PathBuf {
        Frame::pattern(&self.dir)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
