use std::{io, path::PathBuf};

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`ArchiveError`] failures.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Failures raised while copying a photo to its archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No archive destination is configured.
    #[error("archiving is disabled")]
    Disabled,
    /// The blob name would escape the archive root.
    #[error("invalid archive name `{name}`")]
    InvalidName {
        /// Rejected name.
        name: String,
    },
    /// Writing the local copy failed.
    #[error("failed to write archive file `{}`", path.display())]
    Io {
        /// Destination file.
        path: PathBuf,
        /// Filesystem error.
        #[source]
        source: io::Error,
    },
    /// Building the HTTP client failed.
    #[error("failed to build archive client")]
    ClientBuilder {
        /// HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// A request to the remote endpoint could not be sent.
    #[error("failed to send archive request for `{name}`")]
    RequestSend {
        /// Blob name.
        name: String,
        /// HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// The remote endpoint answered with an unexpected status.
    #[error("unexpected archive response status {status} for `{name}`")]
    RequestStatus {
        /// Blob name.
        name: String,
        /// Status returned.
        status: StatusCode,
    },
}
