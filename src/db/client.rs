//! Database client: pool construction and thin prepared-statement helpers.

use sqlx::any::{AnyArguments, AnyPoolOptions, AnyQueryResult, AnyRow};
use sqlx::{Any, AnyPool};
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::observability::{EventKind, EventLog};

/// Database failure. The message is logged; users see a generic error.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// SQL flavor, derived from the connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    MySql,
    Sqlite,
}

/// Shared database handle. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
    flavor: Flavor,
    events: EventLog,
}

impl Database {
    /// Connect and bootstrap the schema.
    pub async fn connect(config: &DatabaseConfig, events: EventLog) -> Result<Self, DbError> {
        sqlx::any::install_default_drivers();

        let url = config.connection_url();
        let flavor = if url.starts_with("sqlite") {
            Flavor::Sqlite
        } else {
            Flavor::MySql
        };

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&url)
            .await
            .map_err(|e| {
                events.write(
                    EventKind::Database,
                    &format!("Database connection failed: {e}"),
                );
                DbError::Sqlx(e)
            })?;

        let db = Self {
            pool,
            flavor,
            events,
        };
        db.ensure_schema().await?;
        Ok(db)
    }

    async fn ensure_schema(&self) -> Result<(), DbError> {
        let id_column = match self.flavor {
            Flavor::MySql => "id BIGINT PRIMARY KEY AUTO_INCREMENT",
            Flavor::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
        };
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS contact_submissions (
                {id_column},
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                company VARCHAR(255) NOT NULL,
                phone VARCHAR(64) NOT NULL,
                service VARCHAR(255) NOT NULL,
                other_service VARCHAR(255) NULL,
                quantity VARCHAR(64) NOT NULL,
                message TEXT NOT NULL,
                language VARCHAR(8) NOT NULL,
                ip_address VARCHAR(64) NOT NULL,
                user_agent VARCHAR(512) NULL,
                status VARCHAR(32) NOT NULL,
                priority VARCHAR(32) NOT NULL,
                created_at VARCHAR(32) NOT NULL
            )"
        );
        self.execute(sqlx::query(&sql)).await?;
        Ok(())
    }

    /// Run a statement, logging any failure to database.log.
    pub async fn execute<'a>(
        &self,
        query: sqlx::query::Query<'a, Any, AnyArguments<'a>>,
    ) -> Result<AnyQueryResult, DbError> {
        query.execute(&self.pool).await.map_err(|e| self.log(e))
    }

    /// Fetch at most one row.
    pub async fn fetch_optional<'a>(
        &self,
        query: sqlx::query::Query<'a, Any, AnyArguments<'a>>,
    ) -> Result<Option<AnyRow>, DbError> {
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.log(e))
    }

    /// Fetch all rows.
    pub async fn fetch_all<'a>(
        &self,
        query: sqlx::query::Query<'a, Any, AnyArguments<'a>>,
    ) -> Result<Vec<AnyRow>, DbError> {
        query.fetch_all(&self.pool).await.map_err(|e| self.log(e))
    }

    fn log(&self, e: sqlx::Error) -> DbError {
        self.events
            .write(EventKind::Database, &format!("Query failed: {e}"));
        tracing::error!(error = %e, "Database query failed");
        DbError::Sqlx(e)
    }
}
