//! Backend data store boundary: one insert-and-read-back operation.
//!
//! Two backends are available. `RestStore` talks to a PostgREST-compatible
//! endpoint (the Supabase REST API); `SqlStore` writes to a libsql database,
//! either a local file or a remote Turso instance.

use std::future::Future;
use std::time::Instant;

use libsql::{params, Connection, Database};

use crate::config::{BackendChoice, Config};
use crate::entry::{NewFeedbackRow, StoredFeedback};
use crate::error::StoreError;

pub const DEFAULT_TABLE: &str = "feedback";

pub trait FeedbackStore: Send + Sync {
    /// Insert one row and return the row as stored, including any
    /// server-assigned columns.
    fn insert(
        &self,
        row: &NewFeedbackRow,
    ) -> impl Future<Output = Result<StoredFeedback, StoreError>> + Send;
}

/// Table names are interpolated into SQL and URLs, so only plain
/// identifiers are accepted.
pub fn check_table_name(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::Database(format!("invalid table name '{}'", name)))
    }
}

// ── REST (PostgREST / Supabase) ─────────────────────────────────────

pub struct RestStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestStore {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: &str,
        table: &str,
    ) -> Result<Self, StoreError> {
        check_table_name(table)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

impl FeedbackStore for RestStore {
    async fn insert(&self, row: &NewFeedbackRow) -> Result<StoredFeedback, StoreError> {
        let url = self.endpoint();
        let t0 = Instant::now();
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%url, elapsed_ms = t0.elapsed().as_millis() as u64, "insert request failed: {}", e);
                StoreError::from(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Upstream(format!("{} returned {}: {}", url, status, body)));
        }

        let mut rows: Vec<StoredFeedback> = resp.json().await?;
        tracing::debug!(%url, elapsed_ms = t0.elapsed().as_millis() as u64, "insert acknowledged");
        match rows.len() {
            1 => Ok(rows.remove(0)),
            n => Err(StoreError::Decode(format!("expected a single row, got {}", n))),
        }
    }
}

// ── libsql ──────────────────────────────────────────────────────────

pub struct SqlStore {
    inner: Database,
    table: String,
}

impl SqlStore {
    pub async fn connect_remote(url: &str, token: &str, table: &str) -> Result<Self, StoreError> {
        check_table_name(table)?;
        let db = libsql::Builder::new_remote(url.to_string(), token.to_string())
            .build()
            .await
            .map_err(|e| StoreError::Database(format!("turso connect: {}", e)))?;
        Ok(Self { inner: db, table: table.to_string() })
    }

    pub async fn connect_local(path: &str, table: &str) -> Result<Self, StoreError> {
        check_table_name(table)?;
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Database(format!("local db: {}", e)))?;
        Ok(Self { inner: db, table: table.to_string() })
    }

    fn conn(&self) -> Result<Connection, StoreError> {
        self.inner.connect().map_err(|e| StoreError::Database(e.to_string()))
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let c = self.conn()?;
        c.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id               INTEGER PRIMARY KEY AUTOINCREMENT,
                    student_name     TEXT NOT NULL,
                    course_name      TEXT NOT NULL,
                    email            TEXT NOT NULL,
                    rating           INTEGER NOT NULL,
                    feedback_message TEXT NOT NULL,
                    created_at       TEXT NOT NULL DEFAULT (datetime('now'))
                )",
                self.table
            ),
            (),
        )
        .await?;
        Ok(())
    }
}

impl FeedbackStore for SqlStore {
    async fn insert(&self, row: &NewFeedbackRow) -> Result<StoredFeedback, StoreError> {
        let c = self.conn()?;
        let mut rows = c
            .query(
                &format!(
                    "INSERT INTO {} (student_name, course_name, email, rating, feedback_message)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     RETURNING id, created_at, student_name, course_name, email, rating,
                               feedback_message",
                    self.table
                ),
                params![
                    row.student_name.as_str(),
                    row.course_name.as_str(),
                    row.email.as_str(),
                    row.rating,
                    row.feedback_message.as_str()
                ],
            )
            .await?;
        match rows.next().await? {
            Some(r) => Ok(StoredFeedback {
                id: Some(serde_json::Value::from(r.get::<i64>(0)?)),
                created_at: r.get::<String>(1).ok(),
                row: NewFeedbackRow {
                    student_name: r.get::<String>(2)?,
                    course_name: r.get::<String>(3)?,
                    email: r.get::<String>(4)?,
                    rating: r.get::<i64>(5)?,
                    feedback_message: r.get::<String>(6)?,
                },
            }),
            None => Err(StoreError::Database("insert returned no row".into())),
        }
    }
}

// ── Backend selection ───────────────────────────────────────────────

/// The store chosen at startup.
pub enum Backend {
    Rest(RestStore),
    Sql(SqlStore),
}

impl Backend {
    /// Open the store picked by `config`, creating the table for libsql
    /// backends.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        match config.backend() {
            BackendChoice::Rest { url, key } => {
                let http = reqwest::Client::builder()
                    .user_agent(format!("course-feedback/{}", env!("CARGO_PKG_VERSION")))
                    .timeout(config.request_timeout())
                    .build()?;
                Ok(Backend::Rest(RestStore::new(http, url, key, &config.table)?))
            }
            BackendChoice::Turso { url, token } => {
                tracing::info!(url, "connecting to Turso");
                let store = SqlStore::connect_remote(url, token, &config.table).await?;
                store.init_schema().await?;
                Ok(Backend::Sql(store))
            }
            BackendChoice::Local { path } => {
                tracing::info!(path, "using local libsql database");
                let store = SqlStore::connect_local(path, &config.table).await?;
                store.init_schema().await?;
                Ok(Backend::Sql(store))
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Backend::Rest(s) => format!("rest {}", s.endpoint()),
            Backend::Sql(s) => format!("libsql table {}", s.table),
        }
    }
}

impl FeedbackStore for Backend {
    async fn insert(&self, row: &NewFeedbackRow) -> Result<StoredFeedback, StoreError> {
        match self {
            Backend::Rest(s) => s.insert(row).await,
            Backend::Sql(s) => s.insert(row).await,
        }
    }
}
