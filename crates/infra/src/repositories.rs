//! Storage backend selection

use std::sync::Arc;

use clubsched_core::{EventRepository, PatternRepository};
use clubsched_domain::{Result, StorageBackend, StorageConfig};
use tracing::info;

use crate::database::{DbManager, SqliteEventRepository, SqlitePatternRepository};
use crate::memory::{InMemoryEventRepository, InMemoryPatternRepository};

/// Pattern and event repositories for one storage backend.
pub enum Repositories {
    Sqlite {
        db: Arc<DbManager>,
        patterns: Arc<SqlitePatternRepository>,
        events: Arc<SqliteEventRepository>,
    },
    Memory {
        patterns: Arc<InMemoryPatternRepository>,
        events: Arc<InMemoryEventRepository>,
    },
}

impl Repositories {
    /// Open the configured backend, running migrations for SQLite.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::Sqlite => {
                let db = Arc::new(DbManager::new(&config.path, config.pool_size)?);
                db.run_migrations()?;
                Ok(Self::sqlite(db))
            }
            StorageBackend::Memory => {
                info!("using in-memory storage; nothing will be persisted");
                Ok(Self::memory())
            }
        }
    }

    pub fn sqlite(db: Arc<DbManager>) -> Self {
        Self::Sqlite {
            patterns: Arc::new(SqlitePatternRepository::new(Arc::clone(&db))),
            events: Arc::new(SqliteEventRepository::new(Arc::clone(&db))),
            db,
        }
    }

    pub fn memory() -> Self {
        Self::Memory {
            patterns: Arc::new(InMemoryPatternRepository::new()),
            events: Arc::new(InMemoryEventRepository::new()),
        }
    }

    pub fn backend(&self) -> StorageBackend {
        match self {
            Self::Sqlite { .. } => StorageBackend::Sqlite,
            Self::Memory { .. } => StorageBackend::Memory,
        }
    }

    pub fn patterns(&self) -> Arc<dyn PatternRepository> {
        match self {
            Self::Sqlite { patterns, .. } => patterns.clone(),
            Self::Memory { patterns, .. } => patterns.clone(),
        }
    }

    pub fn events(&self) -> Arc<dyn EventRepository> {
        match self {
            Self::Sqlite { events, .. } => events.clone(),
            Self::Memory { events, .. } => events.clone(),
        }
    }

    /// Connectivity check; always succeeds for the memory backend.
    pub fn health_check(&self) -> Result<()> {
        match self {
            Self::Sqlite { db, .. } => db.health_check(),
            Self::Memory { .. } => Ok(()),
        }
    }
}
