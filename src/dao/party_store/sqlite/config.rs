use std::time::Duration;

/// Default on-disk database used when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://wedding_game.db";

/// Runtime configuration describing how to open the SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// `sqlite:` connection URL.
    pub url: String,
    /// Pool size for on-disk databases.
    pub max_connections: u32,
    /// How long a writer waits on a locked database.
    pub busy_timeout: Duration,
}

impl SqliteConfig {
    /// Construct a configuration for the given `sqlite:` URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Private in-memory database, used by tests.
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    /// Every connection to `:memory:` opens a distinct database, so the pool must be pinned to one.
    pub fn is_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// Effective pool size after accounting for in-memory databases.
    pub fn pool_size(&self) -> u32 {
        if self.is_memory() {
            1
        } else {
            self.max_connections.max(1)
        }
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_databases_use_a_single_connection() {
        assert_eq!(SqliteConfig::in_memory().pool_size(), 1);
        assert_eq!(SqliteConfig::default().pool_size(), 5);
    }
}
