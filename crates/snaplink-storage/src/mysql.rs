use async_trait::async_trait;
use jiff::Timestamp;
use snaplink_core::store::{LinkStore, Result};
use snaplink_core::{LinkBinding, LinkRecord, RecordId, ShortCode, StorageError};
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::debug;

/// DDL for the `short_links` table.
pub const SCHEMA: &str = include_str!("../ddl/mysql/short_links.sql");

const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// MySQL implementation of the link store contract.
///
/// One row per record. `short_code` carries a unique index with a binary
/// collation, so codes differing only in case are distinct and a second
/// writer for the same code is rejected by the database.
#[derive(Debug, Clone)]
pub struct MySqlLinkStore {
    pool: MySqlPool,
}

impl MySqlLinkStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    ///
    /// Connection acquisition is bounded by a timeout so no storage call
    /// waits indefinitely for a free connection.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .acquire_timeout(DEFAULT_ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `short_links` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn now_unix_seconds() -> i64 {
    Timestamp::now().as_second()
}

fn parse_timestamp(column: &str, seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{seconds}': {e}"))
    })
}

fn record_from_row(row: &MySqlRow) -> Result<LinkRecord> {
    let record_id: u64 = row.try_get("record_id").map_err(map_sqlx_error)?;
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let destination_url: String = row.try_get("destination_url").map_err(map_sqlx_error)?;
    let view_count: u64 = row.try_get("view_count").map_err(map_sqlx_error)?;
    let custom_code_requested: bool = row
        .try_get("custom_code_requested")
        .map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let updated_at: i64 = row.try_get("updated_at").map_err(map_sqlx_error)?;

    let short_code = ShortCode::new(&short_code).map_err(|e| {
        StorageError::InvalidData(format!("stored short code '{short_code}': {e}"))
    })?;

    Ok(LinkRecord {
        id: RecordId::new(record_id),
        destination_url,
        short_code,
        view_count,
        custom_code_requested,
        created_at: parse_timestamp("created_at", created_at)?,
        updated_at: parse_timestamp("updated_at", updated_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
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
        _ => StorageError::Query(message),
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT record_id, short_code, destination_url, view_count,
           custom_code_requested, created_at, updated_at
    FROM short_links
"#;

#[async_trait]
impl LinkStore for MySqlLinkStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let query = format!("{SELECT_COLUMNS} WHERE short_code = ? LIMIT 1");
        let row = sqlx::query(&query)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn get_by_record_id(&self, id: RecordId) -> Result<Option<LinkRecord>> {
        let query = format!("{SELECT_COLUMNS} WHERE record_id = ? LIMIT 1");
        let row = sqlx::query(&query)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn put(&self, binding: LinkBinding) -> Result<()> {
        let now = now_unix_seconds();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let exists = sqlx::query("SELECT 1 FROM short_links WHERE record_id = ? FOR UPDATE")
            .bind(binding.record_id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .is_some();

        let result = if exists {
            sqlx::query(
                r#"
                UPDATE short_links
                SET short_code = ?, destination_url = ?, custom_code_requested = ?, updated_at = ?
                WHERE record_id = ?
                "#,
            )
            .bind(binding.short_code.as_str())
            .bind(binding.destination_url.as_str())
            .bind(binding.custom_code_requested)
            .bind(now)
            .bind(binding.record_id.get())
            .execute(&mut *tx)
            .await
        } else {
            sqlx::query(
                r#"
                INSERT INTO short_links
                    (record_id, short_code, destination_url, view_count,
                     custom_code_requested, created_at, updated_at)
                VALUES (?, ?, ?, 0, ?, ?, ?)
                "#,
            )
            .bind(binding.record_id.get())
            .bind(binding.short_code.as_str())
            .bind(binding.destination_url.as_str())
            .bind(binding.custom_code_requested)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
        };

        match result {
            Ok(_) => {
                tx.commit().await.map_err(map_sqlx_error)?;
                debug!(
                    record_id = %binding.record_id,
                    code = %binding.short_code,
                    "stored link binding"
                );
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(binding.short_code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn increment_views(&self, id: RecordId) -> Result<u64> {
        // LAST_INSERT_ID(expr) hands the incremented value back on this
        // connection, keeping the increment a single atomic statement.
        let result = sqlx::query(
            r#"
            UPDATE short_links
            SET view_count = LAST_INSERT_ID(view_count + 1)
            WHERE record_id = ?
            "#,
        )
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }

        Ok(result.last_insert_id())
    }

    async fn remove(&self, id: RecordId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM short_links WHERE record_id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
