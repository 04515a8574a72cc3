//! Database service for the bias analysis store.

use crate::error::AppError;
use crate::models::{BiasAnalysis, NewAnalysis};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new connection pool, creating the database file if absent.
    #[instrument(skip(database_url), fields(service = "bias-service"))]
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Invalid database URL: {}", e))
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("SQLite connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Persist a new analysis. The timestamp is assigned here, at insert
    /// time, so the returned record carries actual store time.
    #[instrument(skip(self, input), fields(analysis_id = %input.id))]
    pub async fn insert_analysis(&self, input: &NewAnalysis) -> Result<BiasAnalysis, AppError> {
        let timestamp = Utc::now();

        let record = sqlx::query_as::<_, BiasAnalysis>(
            r#"
            INSERT INTO bias_analyses (id, text, results, summary, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, text, results, summary, timestamp
            "#,
        )
        .bind(&input.id)
        .bind(&input.text)
        .bind(Json(&input.results))
        .bind(&input.summary)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::DatabaseError(anyhow::anyhow!(
                    "Analysis '{}' already exists",
                    input.id
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to insert analysis: {}", e)),
        })?;

        info!(analysis_id = %record.id, "Analysis persisted");

        Ok(record)
    }

    /// List all analyses, newest first. Rows sharing a timestamp fall back
    /// to insertion order.
    #[instrument(skip(self))]
    pub async fn list_analyses(&self) -> Result<Vec<BiasAnalysis>, AppError> {
        sqlx::query_as::<_, BiasAnalysis>(
            r#"
            SELECT id, text, results, summary, timestamp
            FROM bias_analyses
            ORDER BY timestamp DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list analyses: {}", e)))
    }
}
