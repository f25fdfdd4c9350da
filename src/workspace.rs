use crate::error::{Error, Result};

use std::path::Path;

use tempfile::TempDir;

/// A uniquely named directory owned by one run. It and everything written
/// into it are removed when the workspace is dropped, whichever way the run
/// ends.
#[derive(Debug)]
pub struct TempWorkspace {
    dir: TempDir,
}

impl TempWorkspace {
    const PREFIX: &'static str = "zenith-";

    pub fn create(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(Self::PREFIX);
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| Error::io("creating temporary workspace", e))?;

        tracing::debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the workspace now and reports a failure to do so instead of
    /// swallowing it the way drop does.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|e| Error::io(format!("removing workspace {}", path.display()), e))?;
        tracing::debug!("Removed workspace {}", path.display());
        Ok(())
    }
}
