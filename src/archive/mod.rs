//! Durable copies of uploaded photos kept outside the uploads directory.

mod directory;
mod error;
mod http;

use futures::future::BoxFuture;

pub use self::directory::DirectoryArchiver;
pub use self::error::{ArchiveError, ArchiveResult};
pub use self::http::{HttpArchiveConfig, HttpArchiver};

/// What happened to an archive request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveReceipt {
    /// A new copy was written.
    Stored,
    /// A blob with that name already existed; nothing was written.
    AlreadyPresent,
}

/// Destination for photo backups. Archiving the same name twice is harmless.
pub trait Archiver: Send + Sync {
    /// Copy `bytes` under `name`, reporting whether it was already there.
    fn archive(&self, name: String, bytes: Vec<u8>) -> BoxFuture<'static, ArchiveResult<ArchiveReceipt>>;
}

/// Archiver used when no destination is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledArchiver;

impl Archiver for DisabledArchiver {
    fn archive(&self, _name: String, _bytes: Vec<u8>) -> BoxFuture<'static, ArchiveResult<ArchiveReceipt>> {
        Box::pin(async { Err(ArchiveError::Disabled) })
    }
}
