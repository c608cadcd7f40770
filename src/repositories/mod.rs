use std::{str::FromStr, time::Duration};

use chrono::{SecondsFormat, Utc};
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteQueryResult},
    Sqlite, SqlitePool, Transaction,
};

use crate::Result;

pub mod posts_repo;
pub mod taxonomy_repo;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Generated rowid and affected row count of a single write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub generated_id: i64,
    pub rows_affected: u64,
}

impl From<SqliteQueryResult> for WriteOutcome {
    fn from(result: SqliteQueryResult) -> Self {
        Self {
            generated_id: result.last_insert_rowid(),
            rows_affected: result.rows_affected(),
        }
    }
}

/// Opens the pool with foreign keys enforced on every connection and brings
/// the schema up to date. WAL lets readers keep their snapshot while a writer
/// commits.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;

    Ok(pool)
}

/// Starts a transaction that holds the write lock from `BEGIN`, so concurrent
/// writers wait on the busy timeout rather than failing a lock upgrade.
pub(crate) async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

// Fixed-width UTC timestamps so that text ordering matches time ordering.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
