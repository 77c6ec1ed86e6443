use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use futures::future::BoxFuture;
use tokio::{fs, io::AsyncWriteExt};

use super::{ArchiveError, ArchiveReceipt, ArchiveResult, Archiver};

/// Copies photos into a local (typically synced or mounted) backup directory.
#[derive(Debug, Clone)]
pub struct DirectoryArchiver {
    root: Arc<PathBuf>,
}

impl DirectoryArchiver {
    /// Archive into `root`, created on first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    async fn store(&self, name: &str, bytes: &[u8]) -> ArchiveResult<ArchiveReceipt> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(ArchiveError::InvalidName { name: name.into() });
        }

        fs::create_dir_all(self.root.as_path())
            .await
            .map_err(|source| ArchiveError::Io {
                path: self.root.to_path_buf(),
                source,
            })?;

        let path = self.root.join(name);
        // create_new makes the existence check and the write a single step.
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Ok(ArchiveReceipt::AlreadyPresent);
            }
            Err(source) => return Err(ArchiveError::Io { path, source }),
        };

        let written = async {
            file.write_all(bytes).await?;
            file.sync_all().await
        }
        .await;
        if let Err(source) = written {
            let _ = fs::remove_file(&path).await;
            return Err(ArchiveError::Io { path, source });
        }
        Ok(ArchiveReceipt::Stored)
    }
}

impl Archiver for DirectoryArchiver {
    fn archive(&self, name: String, bytes: Vec<u8>) -> BoxFuture<'static, ArchiveResult<ArchiveReceipt>> {
        let archiver = self.clone();
        Box::pin(async move { archiver.store(&name, &bytes).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn archiving_twice_keeps_the_first_copy() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = DirectoryArchiver::new(dir.path().join("backup"));

        let first = archiver.archive("a.jpg".into(), b"one".to_vec()).await.unwrap();
        let second = archiver.archive("a.jpg".into(), b"two".to_vec()).await.unwrap();

        assert_eq!(first, ArchiveReceipt::Stored);
        assert_eq!(second, ArchiveReceipt::AlreadyPresent);
        let stored = std::fs::read(dir.path().join("backup/a.jpg")).unwrap();
        assert_eq!(stored, b"one");
    }

    #[tokio::test]
    async fn names_cannot_escape_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = DirectoryArchiver::new(dir.path());

        for name in ["../x.jpg", "nested/x.jpg", "", ".hidden"] {
            assert!(matches!(
                archiver.archive(name.into(), Vec::new()).await,
                Err(ArchiveError::InvalidName { .. })
            ));
        }
    }
}
