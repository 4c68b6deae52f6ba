// src/core/database.rs
//! Key-value persistence for the profile record and the last scrape

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::core::FsOps;
use crate::errors::AppError;
use crate::types::{JobPosting, Profile};

pub const USER_PROFILE_KEY: &str = "userProfile";
pub const SCRAPED_JOB_KEY: &str = "scrapedJob";
pub const SCRAPED_QUESTIONS_KEY: &str = "scrapedQuestions";

/// Whole-record reads and writes; `set` always overwrites.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError>;
    async fn set(&self, key: &str, value: &Value) -> Result<(), AppError>;
}

// ===== SQLite Store =====

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database file and its schema
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!("Database connection established: {}", database_path.display());

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database; lives as long as its single connection.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create kv_store table")?;

        debug!("Database migrations completed");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        raw.map(|text| {
            serde_json::from_str(&text)
                .with_context(|| format!("Stored value for '{}' is not valid JSON", key))
                .map_err(AppError::from)
        })
        .transpose()
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value.to_string())
        .execute(&self.pool)
        .await?;

        debug!("Stored key '{}'", key);
        Ok(())
    }
}

// ===== In-Memory Store =====

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Value>>, AppError> {
        self.values
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Memory store lock poisoned")))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), AppError> {
        self.lock()?.insert(key.to_string(), value.clone());
        Ok(())
    }
}

// ===== Profile Repository =====

/// Typed access to the records under `userProfile`, `scrapedJob` and
/// `scrapedQuestions`.
pub struct ProfileStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The saved profile, or an empty one before the first save.
    pub async fn load_profile(&self) -> Result<Profile, AppError> {
        match self.store.get(USER_PROFILE_KEY).await? {
            Some(value) => serde_json::from_value(value)
                .context("Stored profile has an unexpected shape")
                .map_err(AppError::from),
            None => {
                debug!("No saved profile, starting empty");
                Ok(Profile::default())
            }
        }
    }

    /// Overwrite the saved profile wholesale. Returns what was stored.
    pub async fn save_profile(&self, profile: &Profile) -> Result<Profile, AppError> {
        profile.validate_for_save()?;

        let mut stored = profile.clone();
        stored.normalize();
        stored.last_updated = Some(Utc::now());

        let value = serde_json::to_value(&stored).context("Failed to serialize profile")?;
        self.store.set(USER_PROFILE_KEY, &value).await?;

        info!("Saved profile for {}", stored.full_name);
        Ok(stored)
    }

    pub async fn save_scraped_job(&self, description: &str) -> Result<(), AppError> {
        self.store
            .set(SCRAPED_JOB_KEY, &Value::String(description.to_string()))
            .await
    }

    pub async fn load_scraped_job(&self) -> Result<Option<String>, AppError> {
        Ok(self
            .store
            .get(SCRAPED_JOB_KEY)
            .await?
            .and_then(|value| value.as_str().map(str::to_string)))
    }

    /// Stored newline-delimited, the same shape `JobPosting::questions` uses.
    pub async fn save_scraped_questions(&self, questions: &[String]) -> Result<(), AppError> {
        self.store
            .set(SCRAPED_QUESTIONS_KEY, &Value::String(questions.join("\n")))
            .await
    }

    pub async fn load_scraped_questions(&self) -> Result<Vec<String>, AppError> {
        let joined = self
            .store
            .get(SCRAPED_QUESTIONS_KEY)
            .await?
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default();

        Ok(joined
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// The last scraped posting, if a job description was saved.
    pub async fn job_posting(&self) -> Result<Option<JobPosting>, AppError> {
        let Some(description) = self.load_scraped_job().await? else {
            return Ok(None);
        };
        let questions = self.load_scraped_questions().await?;
        Ok(Some(JobPosting::new(description).with_questions(&questions)))
    }
}
