mod config;
mod error;
mod models;
mod schema;
mod store;

pub use config::{DEFAULT_DATABASE_URL, SqliteConfig};
pub use error::SqliteDaoError;
pub use store::SqlitePartyStore;

use crate::dao::storage::StorageError;

impl From<SqliteDaoError> for StorageError {
    fn from(err: SqliteDaoError) -> Self {
        match err {
            SqliteDaoError::InvalidUrl { .. } | SqliteDaoError::Connect { .. } => {
                StorageError::unavailable(err.to_string(), err)
            }
            SqliteDaoError::Decode { .. } => StorageError::corrupt(err.to_string()),
            _ => StorageError::operation(err.to_string(), err),
        }
    }
}
