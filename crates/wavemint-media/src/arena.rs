//! Per-run scratch space for rendered artifacts.
//!
//! Every render gets a unique path `<job>_<n>.mp4` inside a temporary
//! directory owned by the arena. Artifacts are deleted when their guard is
//! dropped or consumed, and the directory goes away with the arena, so an
//! aborted run leaves nothing behind.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::TempDir;
use tracing::{debug, warn};

use wavemint_models::JobId;

use crate::error::MediaResult;

/// Hands out unique artifact paths for one run.
#[derive(Debug)]
pub struct RenderArena {
    dir: TempDir,
    prefix: String,
    next: AtomicU64,
}

impl RenderArena {
    /// Create the arena directory under `work_dir`, creating `work_dir` if needed.
    pub fn new(work_dir: impl AsRef<Path>, job_id: &JobId) -> MediaResult<Self> {
        let work_dir = work_dir.as_ref();
        std::fs::create_dir_all(work_dir)?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("wavemint_{}_", job_id.short()))
            .tempdir_in(work_dir)?;
        debug!(dir = %dir.path().display(), "Created render arena");

        Ok(Self {
            dir,
            prefix: job_id.short().to_string(),
            next: AtomicU64::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Reserve the next artifact path. The file itself is created by the renderer.
    pub fn allocate(&self) -> ArtifactGuard {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        ArtifactGuard {
            path: self.dir.path().join(format!("{}_{}.mp4", self.prefix, n)),
        }
    }

    /// Remove the arena directory, reporting failures instead of ignoring them.
    pub fn close(self) -> MediaResult<()> {
        self.dir.close()?;
        Ok(())
    }
}

/// Owns one artifact path; the file is removed when the guard goes away.
#[derive(Debug)]
pub struct ArtifactGuard {
    path: PathBuf,
}

impl ArtifactGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the artifact and release it.
    pub async fn consume(self) -> MediaResult<Vec<u8>> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(bytes)
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove artifact"),
        }
    }
}
