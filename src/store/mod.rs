//! SQLite-backed entity store.
//!
//! The pool is constructed explicitly by the caller and passed to every
//! operation; there is no global connection state. Counter updates are
//! expressed as relative increments in SQL so concurrent writers touching
//! the same player stay correct.

pub mod head_to_head;
pub mod matches;
pub mod players;
pub mod tournaments;

use crate::models::{LeagueError, MatchStatus, Stage, TournamentStatus};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;

/// Connection pool handed to the web layer.
pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
/// One checked-out connection.
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

const SCHEMA: &str = include_str!("schema.sql");

/// Open (or create) the database file and prepare a connection pool.
/// Foreign keys are enabled on every connection.
pub fn open_pool(path: &str) -> Result<DbPool, LeagueError> {
    let manager = SqliteConnectionManager::file(path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = r2d2::Pool::new(manager)?;
    let conn = pool.get()?;
    init_schema(&conn)?;
    Ok(pool)
}

/// Apply the embedded schema. Idempotent: every statement is IF NOT EXISTS.
pub fn init_schema(conn: &rusqlite::Connection) -> Result<(), LeagueError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

fn unknown_value(kind: &str, value: &str) -> FromSqlError {
    FromSqlError::Other(format!("unknown {} value: {}", kind, value).into())
}

impl ToSql for MatchStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for MatchStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        MatchStatus::parse(s).ok_or_else(|| unknown_value("match status", s))
    }
}

impl ToSql for Stage {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Stage {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Stage::parse(s).ok_or_else(|| unknown_value("stage", s))
    }
}

impl ToSql for TournamentStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TournamentStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        TournamentStatus::parse(s).ok_or_else(|| unknown_value("tournament status", s))
    }
}
