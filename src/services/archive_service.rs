use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::{
    archive::{ArchiveReceipt, Archiver},
    dao::{media::MediaStore, now_timestamp},
    dto::public::{ArchiveJobResponse, ArchiveJobStatus},
};

/// Background queue copying stored photos to the configured [`Archiver`].
///
/// Jobs are enqueued after the photo row is committed; failures are recorded
/// in the status table and never reach the guest who uploaded the photo.
#[derive(Clone)]
pub struct ArchiveQueue {
    sender: mpsc::UnboundedSender<String>,
    statuses: Arc<DashMap<String, ArchiveJobResponse>>,
    pending: Arc<watch::Sender<usize>>,
}

impl ArchiveQueue {
    /// Spawn the worker task and return a handle to feed it.
    pub fn start(archiver: Arc<dyn Archiver>, media: MediaStore) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let statuses = Arc::new(DashMap::new());
        let (pending, _) = watch::channel(0usize);
        let pending = Arc::new(pending);

        tokio::spawn(run_worker(
            receiver,
            archiver,
            media,
            statuses.clone(),
            pending.clone(),
        ));

        Self {
            sender,
            statuses,
            pending,
        }
    }

    /// Queue `filename` for archival.
    pub fn enqueue(&self, filename: &str) {
        self.record(filename, ArchiveJobStatus::Queued, None);
        self.pending.send_modify(|count| *count += 1);
        if self.sender.send(filename.to_string()).is_err() {
            warn!(filename, "archive worker stopped; job dropped");
            self.pending.send_modify(|count| *count = count.saturating_sub(1));
            self.record(
                filename,
                ArchiveJobStatus::Failed,
                Some("archive worker stopped".into()),
            );
        }
    }

    /// Every known job, oldest update first.
    pub fn statuses(&self) -> Vec<ArchiveJobResponse> {
        let mut jobs: Vec<_> = self
            .statuses
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        jobs.sort_by(|a, b| {
            a.updated_at
                .cmp(&b.updated_at)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        jobs
    }

    /// Latest status recorded for `filename`.
    pub fn status_of(&self, filename: &str) -> Option<ArchiveJobStatus> {
        self.statuses.get(filename).map(|entry| entry.status)
    }

    /// Jobs queued but not yet finished.
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    /// Resolve once every queued job has finished.
    pub async fn wait_idle(&self) {
        let mut receiver = self.pending.subscribe();
        let _ = receiver.wait_for(|count| *count == 0).await;
    }

    fn record(&self, filename: &str, status: ArchiveJobStatus, error: Option<String>) {
        record(&self.statuses, filename, status, error);
    }
}

fn record(
    statuses: &DashMap<String, ArchiveJobResponse>,
    filename: &str,
    status: ArchiveJobStatus,
    error: Option<String>,
) {
    statuses.insert(
        filename.to_string(),
        ArchiveJobResponse {
            filename: filename.to_string(),
            status,
            error,
            updated_at: now_timestamp(),
        },
    );
}

async fn run_worker(
    mut receiver: mpsc::UnboundedReceiver<String>,
    archiver: Arc<dyn Archiver>,
    media: MediaStore,
    statuses: Arc<DashMap<String, ArchiveJobResponse>>,
    pending: Arc<watch::Sender<usize>>,
) {
    while let Some(filename) = receiver.recv().await {
        let outcome = match media.read(&filename).await {
            Ok(bytes) => archiver
                .archive(filename.clone(), bytes)
                .await
                .map_err(|err| err.to_string()),
            Err(err) => Err(format!("failed to read stored photo: {err}")),
        };

        match outcome {
            Ok(ArchiveReceipt::Stored) => {
                info!(%filename, "photo archived");
                record(&statuses, &filename, ArchiveJobStatus::Archived, None);
            }
            Ok(ArchiveReceipt::AlreadyPresent) => {
                debug!(%filename, "photo already archived");
                record(&statuses, &filename, ArchiveJobStatus::AlreadyPresent, None);
            }
            Err(error) => {
                warn!(%filename, %error, "photo archival failed");
                record(&statuses, &filename, ArchiveJobStatus::Failed, Some(error));
            }
        }
        pending.send_modify(|count| *count = count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{DirectoryArchiver, DisabledArchiver};

    #[tokio::test]
    async fn queued_photos_end_up_in_the_archive() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path().join("uploads"));
        let filename = media.save_photo(b"jpeg bytes").await.unwrap();
        let queue = ArchiveQueue::start(
            Arc::new(DirectoryArchiver::new(dir.path().join("backup"))),
            media,
        );

        queue.enqueue(&filename);
        queue.wait_idle().await;

        assert_eq!(queue.status_of(&filename), Some(ArchiveJobStatus::Archived));
        assert_eq!(queue.pending(), 0);
        assert!(dir.path().join("backup").join(&filename).exists());

        queue.enqueue(&filename);
        queue.wait_idle().await;
        assert_eq!(
            queue.status_of(&filename),
            Some(ArchiveJobStatus::AlreadyPresent)
        );
    }

    #[tokio::test]
    async fn failures_are_recorded_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let queue = ArchiveQueue::start(
            Arc::new(DisabledArchiver),
            MediaStore::new(dir.path()),
        );

        queue.enqueue("missing.jpg");
        queue.wait_idle().await;

        let jobs = queue.statuses();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].status, ArchiveJobStatus::Failed);
        assert!(jobs[0].error.is_some());
    }
}
