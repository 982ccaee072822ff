use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tinylink_core::repository::{Repository, Result, SlimRecord, UrlRecord};
use tinylink_core::{ShortCode, StorageError};
use tracing::{debug, trace};
use url::Url;
use uuid::Uuid;

const SCHEMA: &str = include_str!("../ddl/sqlite/url_records.sql");

/// SQLite implementation of the repository contract.
///
/// The schema is created on construction if it does not exist yet. The
/// access counter is only ever changed in SQL (`access_count + 1`), never
/// written back from a value read earlier.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing pool and ensures the schema exists.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self { pool })
    }

    /// Opens (creating if missing) the database file at `path`.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening sqlite database");

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        Self::new(pool).await
    }

    /// Opens a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_sqlx_error)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        Self::new(pool).await
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection. Further operations fail with `Unavailable`.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        sqlx::Error::Configuration(_) => StorageError::Operation(message),
        _ => StorageError::Query(message),
    }
}

fn parse_timestamp(column: &str, raw: &str) -> Result<Timestamp> {
    raw.parse().map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{raw}': {e}"))
    })
}

fn row_to_record(row: &SqliteRow) -> Result<UrlRecord> {
    let shortcode: String = row.try_get("shortcode").map_err(map_sqlx_error)?;
    let id: String = row.try_get("id").map_err(map_sqlx_error)?;
    let url: String = row.try_get("url").map_err(map_sqlx_error)?;
    let created_at: String = row.try_get("created_at").map_err(map_sqlx_error)?;
    let updated_at: String = row.try_get("updated_at").map_err(map_sqlx_error)?;
    let access_count: i64 = row.try_get("access_count").map_err(map_sqlx_error)?;

    let id = Uuid::parse_str(&id)
        .map_err(|e| StorageError::InvalidData(format!("invalid id '{id}': {e}")))?;
    let url = Url::parse(&url)
        .map_err(|e| StorageError::InvalidData(format!("invalid url '{url}': {e}")))?;
    let access_count = u64::try_from(access_count).map_err(|_| {
        StorageError::InvalidData(format!("negative access count {access_count}"))
    })?;

    Ok(UrlRecord {
        slim: SlimRecord {
            id,
            url,
            shortcode: ShortCode::new_unchecked(shortcode),
            created_at: parse_timestamp("created_at", &created_at)?,
            updated_at: parse_timestamp("updated_at", &updated_at)?,
        },
        access_count,
    })
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT shortcode, id, url, created_at, updated_at, access_count
            FROM url_records
            WHERE shortcode = ?
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn set(&self, code: &ShortCode, record: SlimRecord) -> Result<()> {
        trace!(code = %code, "upserting url record");

        sqlx::query(
            r#"
            INSERT INTO url_records (shortcode, id, url, created_at, updated_at, access_count)
            VALUES (?, ?, ?, ?, ?, 0)
            ON CONFLICT (shortcode) DO UPDATE
            SET url = excluded.url,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(code.as_str())
        .bind(record.id.to_string())
        .bind(record.url.as_str())
        .bind(record.created_at.to_string())
        .bind(record.updated_at.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, code: &ShortCode, record: SlimRecord) -> Result<()> {
        trace!(code = %code, "updating url record");

        let result = sqlx::query(
            r#"
            UPDATE url_records
            SET url = ?, updated_at = ?
            WHERE shortcode = ?
            "#,
        )
        .bind(record.url.as_str())
        .bind(record.updated_at.to_string())
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(code.to_string()));
        }

        Ok(())
    }

    async fn insert(&self, code: &ShortCode, record: SlimRecord) -> Result<()> {
        trace!(code = %code, "inserting url record");

        let result = sqlx::query(
            r#"
            INSERT INTO url_records (shortcode, id, url, created_at, updated_at, access_count)
            VALUES (?, ?, ?, ?, ?, 0)
            ON CONFLICT (shortcode) DO NOTHING
            "#,
        )
        .bind(code.as_str())
        .bind(record.id.to_string())
        .bind(record.url.as_str())
        .bind(record.created_at.to_string())
        .bind(record.updated_at.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Conflict(code.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, code: &ShortCode) -> Result<()> {
        sqlx::query("DELETE FROM url_records WHERE shortcode = ?")
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_all(&self) -> Result<BTreeMap<ShortCode, UrlRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT shortcode, id, url, created_at, updated_at, access_count
            FROM url_records
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| row_to_record(row).map(|r| (r.slim.shortcode.clone(), r)))
            .collect()
    }

    async fn increment_access_count(&self, code: &ShortCode) -> Result<u64> {
        let row = sqlx::query(
            r#"
            UPDATE url_records
            SET access_count = access_count + 1
            WHERE shortcode = ?
            RETURNING access_count
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(StorageError::NotFound(code.to_string()));
        };

        let count: i64 = row.try_get("access_count").map_err(map_sqlx_error)?;
        u64::try_from(count)
            .map_err(|_| StorageError::InvalidData(format!("negative access count {count}")))
    }
}
