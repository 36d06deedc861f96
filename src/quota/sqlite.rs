//! SQLite-backed quota store.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use super::{QuotaError, QuotaResult, QuotaStore};
use crate::models::QuotaRecord;

/// Open a database connection with proper concurrency settings.
fn open_db(db_path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 30000;
    "#,
    )?;
    Ok(conn)
}

/// Initialize the quota table in the database.
pub fn init_quota_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS api_quotas (
            service TEXT PRIMARY KEY,
            used_daily INTEGER NOT NULL DEFAULT 0,
            used_monthly INTEGER NOT NULL DEFAULT 0,
            limit_daily INTEGER NOT NULL,
            limit_monthly INTEGER NOT NULL,
            last_reset_daily TEXT NOT NULL,
            last_reset_monthly TEXT NOT NULL
        );
    "#,
    )?;
    Ok(())
}

/// Quota store persisted in the `api_quotas` table, one row per service.
pub struct SqliteQuotaStore {
    conn: Mutex<Connection>,
}

impl SqliteQuotaStore {
    /// Open (creating if needed) the quota database at `path`.
    pub fn open(path: &Path) -> QuotaResult<Self> {
        let conn = open_db(path)?;
        init_quota_table(&conn)?;
        info!("Quota store ready at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> QuotaResult<T>) -> QuotaResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| QuotaError::Database("connection lock poisoned".to_string()))?;
        f(&conn)
    }
}

type RawRow = (String, i64, i64, i64, i64, String, String);

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn parse_timestamp(service: &str, value: &str) -> QuotaResult<DateTime<Local>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| QuotaError::Corrupt {
            service: service.to_string(),
            reason: format!("bad timestamp '{}': {}", value, e),
        })
}

fn to_count(service: &str, value: i64) -> QuotaResult<u32> {
    u32::try_from(value).map_err(|_| QuotaError::Corrupt {
        service: service.to_string(),
        reason: format!("counter out of range: {}", value),
    })
}

fn into_record(raw: RawRow) -> QuotaResult<QuotaRecord> {
    let (service, used_daily, used_monthly, limit_daily, limit_monthly, daily, monthly) = raw;
    Ok(QuotaRecord {
        used_daily: to_count(&service, used_daily)?,
        used_monthly: to_count(&service, used_monthly)?,
        limit_daily: to_count(&service, limit_daily)?,
        limit_monthly: to_count(&service, limit_monthly)?,
        last_reset_daily: parse_timestamp(&service, &daily)?,
        last_reset_monthly: parse_timestamp(&service, &monthly)?,
        service,
    })
}

const SELECT_COLUMNS: &str = "SELECT service, used_daily, used_monthly, limit_daily, limit_monthly, last_reset_daily, last_reset_monthly FROM api_quotas";

#[async_trait]
impl QuotaStore for SqliteQuotaStore {
    async fn get(&self, service: &str) -> QuotaResult<Option<QuotaRecord>> {
        let raw = self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    &format!("{} WHERE service = ?", SELECT_COLUMNS),
                    params![service],
                    read_row,
                )
                .optional()?)
        })?;
        raw.map(into_record).transpose()
    }

    async fn save(&self, record: &QuotaRecord) -> QuotaResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                r#"INSERT OR REPLACE INTO api_quotas
                   (service, used_daily, used_monthly, limit_daily, limit_monthly, last_reset_daily, last_reset_monthly)
                   VALUES (?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    record.service,
                    record.used_daily as i64,
                    record.used_monthly as i64,
                    record.limit_daily as i64,
                    record.limit_monthly as i64,
                    record.last_reset_daily.to_rfc3339(),
                    record.last_reset_monthly.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    async fn list(&self) -> QuotaResult<Vec<QuotaRecord>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{} ORDER BY service", SELECT_COLUMNS))?;
            let rows = stmt
                .query_map([], read_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(into_record).collect()
    }
}
