use std::{
    io,
    path::{Path, PathBuf},
};

use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Extension given to every stored photo regardless of the upstream content type.
pub const PHOTO_EXTENSION: &str = "jpg";

/// Local directory holding uploaded photo binaries, served under `/uploads`.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Store rooted at `root`; the directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory served under `/uploads`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the uploads directory when absent.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Write `bytes` under a freshly generated `<uuid>.jpg` name and return that name.
    pub async fn save_photo(&self, bytes: &[u8]) -> io::Result<String> {
        self.ensure_dir().await?;
        let filename = format!("{}.{PHOTO_EXTENSION}", Uuid::new_v4());
        fs::write(self.root.join(&filename), bytes).await?;
        debug!(%filename, size = bytes.len(), "photo stored");
        Ok(filename)
    }

    /// Read a previously stored photo back, used by the archive worker.
    pub async fn read(&self, filename: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(filename)).await
    }
}
