use super::executor::TursoEngine;
use crate::error::SqlTableError;
use crate::executor::EngineHandle;

/// Options for opening a Turso database.
#[derive(Debug, Clone)]
pub struct TursoOptions {
    /// File path, or `:memory:`.
    pub db_path: String,
}

impl TursoOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }
}

/// Fluent builder for Turso options.
#[derive(Debug, Clone)]
pub struct TursoOptionsBuilder {
    opts: TursoOptions,
}

impl TursoOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: TursoOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn finish(self) -> TursoOptions {
        self.opts
    }

    /// Open the database and wrap it in an [`EngineHandle`].
    ///
    /// # Errors
    /// Returns `SqlTableError::ConnectionError` if the database cannot be created or connected.
    pub async fn build(self) -> Result<EngineHandle, SqlTableError> {
        EngineHandle::new_turso(self.finish()).await
    }
}

impl EngineHandle {
    #[must_use]
    pub fn turso_builder(db_path: impl Into<String>) -> TursoOptionsBuilder {
        TursoOptionsBuilder::new(db_path.into())
    }

    /// Create a local Turso database and open one connection to it.
    ///
    /// # Errors
    /// Returns `SqlTableError::ConnectionError` if database creation or connection fails.
    pub async fn new_turso(opts: TursoOptions) -> Result<Self, SqlTableError> {
        let db_path = opts.db_path;

        let db = turso::Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| {
                SqlTableError::ConnectionError(format!("Failed to create Turso database: {e}"))
            })?;

        let conn = db.connect().map_err(|e| {
            SqlTableError::ConnectionError(format!("Failed to connect Turso database: {e}"))
        })?;

        tracing::info!(db_path = %db_path, "opened turso engine");
        Ok(EngineHandle::Turso(TursoEngine::new(db, conn)))
    }
}
