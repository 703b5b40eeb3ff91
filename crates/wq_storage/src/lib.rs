use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use wq_core::{Error, QuizRecord, QuizStorage, Result, StoredQuiz};

pub mod backends;

pub use backends::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    #[default]
    Memory,
    Sqlite,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "sqlite" => Ok(StorageKind::Sqlite),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}'. Available backends: memory, sqlite",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Memory => f.write_str("memory"),
            StorageKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub kind: StorageKind,
    /// Backend location, e.g. `sqlite://quizzes.db`. Ignored by memory storage.
    pub url: Option<String>,
}

impl StorageConfig {
    pub fn new(kind: StorageKind) -> Self {
        Self { kind, url: None }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Open the configured backend. The caller owns the handle and must `close` it.
pub async fn open_storage(config: &StorageConfig) -> Result<Arc<dyn QuizStorage>> {
    match config.kind {
        StorageKind::Memory => Ok(Arc::new(InMemoryStorage::new())),
        #[cfg(feature = "sqlite")]
        StorageKind::Sqlite => {
            let url = config.url.as_deref().unwrap_or(sqlite::DEFAULT_DATABASE_URL);
            Ok(Arc::new(SQLiteStorage::open(url).await?))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageKind::Sqlite => Err(Error::Config(
            "SQLite storage is not compiled in; rebuild wq_storage with the 'sqlite' feature".to_string(),
        )),
    }
}

pub(crate) fn assign_identity(record: &QuizRecord) -> StoredQuiz {
    StoredQuiz {
        id: uuid::Uuid::new_v4().to_string(),
        date_generated: Utc::now(),
        record: record.clone(),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{open_storage, StorageConfig, StorageKind};
}
