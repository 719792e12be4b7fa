//! Match reads/writes. The status/score transitions here are plain row
//! updates; ordering rules live in the logic layer.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use uuid::Uuid;

use crate::models::{LeagueError, Match, MatchDetail, MatchId, NewMatch, PlayerId};
use crate::store::{players, tournaments};

const MATCH_COLUMNS: &str = "m.id, m.tournament_id, m.group_name, m.player1_id, m.player2_id, \
     m.player1_score, m.player2_score, m.status, m.stage, m.bracket_position, m.winner_id, \
     m.scheduled_time, m.started_at, m.completed_at, m.created_at";

const DETAIL_COLUMNS: &str = "p1.name, p1.nickname, p2.name, p2.nickname, w.nickname, t.name";

const DETAIL_JOINS: &str = "JOIN players p1 ON p1.id = m.player1_id \
     JOIN players p2 ON p2.id = m.player2_id \
     LEFT JOIN players w ON w.id = m.winner_id \
     LEFT JOIN tournaments t ON t.id = m.tournament_id";

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        group_name: row.get(2)?,
        player1_id: row.get(3)?,
        player2_id: row.get(4)?,
        player1_score: row.get(5)?,
        player2_score: row.get(6)?,
        status: row.get(7)?,
        stage: row.get(8)?,
        bracket_position: row.get(9)?,
        winner_id: row.get(10)?,
        scheduled_time: row.get(11)?,
        started_at: row.get(12)?,
        completed_at: row.get(13)?,
        created_at: row.get(14)?,
    })
}

fn parse_detail_row(row: &rusqlite::Row) -> rusqlite::Result<MatchDetail> {
    Ok(MatchDetail {
        record: parse_match_row(row)?,
        player1_name: row.get(15)?,
        player1_nickname: row.get(16)?,
        player2_name: row.get(17)?,
        player2_nickname: row.get(18)?,
        winner_nickname: row.get(19)?,
        tournament_name: row.get(20)?,
    })
}

/// Schedule a match. Both players (and the tournament, if any) must exist,
/// and a player cannot be scheduled against themselves.
pub fn insert(conn: &Connection, new: NewMatch) -> Result<Match, LeagueError> {
    if new.player1_id == new.player2_id {
        return Err(LeagueError::Validation(
            "a match needs two different players".to_string(),
        ));
    }
    players::get(conn, new.player1_id)?;
    players::get(conn, new.player2_id)?;
    if let Some(tid) = new.tournament_id {
        tournaments::get(conn, tid)?;
    }
    let m = new.into_match();
    conn.execute(
        "INSERT INTO matches (id, tournament_id, group_name, player1_id, player2_id, \
         player1_score, player2_score, status, stage, bracket_position, winner_id, \
         scheduled_time, started_at, completed_at, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            m.id,
            m.tournament_id,
            m.group_name,
            m.player1_id,
            m.player2_id,
            m.player1_score,
            m.player2_score,
            m.status,
            m.stage,
            m.bracket_position,
            m.winner_id,
            m.scheduled_time,
            m.started_at,
            m.completed_at,
            m.created_at,
        ],
    )?;
    Ok(m)
}

pub fn get(conn: &Connection, id: MatchId) -> Result<Match, LeagueError> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches m WHERE m.id = ?1");
    conn.query_row(&sql, params![id], parse_match_row)
        .optional()?
        .ok_or_else(|| LeagueError::NotFound(format!("match {id} not found")))
}

/// One match with player and tournament names joined in.
pub fn get_detail(conn: &Connection, id: MatchId) -> Result<MatchDetail, LeagueError> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS}, {DETAIL_COLUMNS} FROM matches m {DETAIL_JOINS} WHERE m.id = ?1"
    );
    conn.query_row(&sql, params![id], parse_detail_row)
        .optional()?
        .ok_or_else(|| LeagueError::NotFound(format!("match {id} not found")))
}

/// Matches, newest first, optionally filtered by tournament and/or player.
pub fn list(
    conn: &Connection,
    tournament_id: Option<Uuid>,
    player_id: Option<PlayerId>,
) -> Result<Vec<MatchDetail>, LeagueError> {
    let mut sql = format!("SELECT {MATCH_COLUMNS}, {DETAIL_COLUMNS} FROM matches m {DETAIL_JOINS}");
    let mut clauses: Vec<&str> = Vec::new();
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();
    if let Some(tid) = tournament_id {
        clauses.push("m.tournament_id = ?");
        args.push(Box::new(tid));
    }
    if let Some(pid) = player_id {
        clauses.push("(m.player1_id = ? OR m.player2_id = ?)");
        args.push(Box::new(pid));
        args.push(Box::new(pid));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY m.created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
            parse_detail_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Move a match to in_progress. `started_at` is only stamped once.
pub fn set_in_progress(
    conn: &Connection,
    id: MatchId,
    started_at: DateTime<Utc>,
) -> Result<(), LeagueError> {
    let changed = conn.execute(
        "UPDATE matches SET status = 'in_progress', \
         started_at = COALESCE(started_at, ?2) WHERE id = ?1",
        params![id, started_at],
    )?;
    if changed == 0 {
        return Err(LeagueError::NotFound(format!("match {id} not found")));
    }
    Ok(())
}

/// Update the running scores without changing status.
pub fn set_scores(
    conn: &Connection,
    id: MatchId,
    player1_score: i32,
    player2_score: i32,
) -> Result<(), LeagueError> {
    let changed = conn.execute(
        "UPDATE matches SET player1_score = ?2, player2_score = ?3 WHERE id = ?1",
        params![id, player1_score, player2_score],
    )?;
    if changed == 0 {
        return Err(LeagueError::NotFound(format!("match {id} not found")));
    }
    Ok(())
}

/// Final score, winner, and completion timestamp in one update.
/// `started_at` is backfilled for matches completed straight from scheduled.
pub fn record_completion(
    conn: &Connection,
    id: MatchId,
    player1_score: i32,
    player2_score: i32,
    winner_id: PlayerId,
    completed_at: DateTime<Utc>,
) -> Result<(), LeagueError> {
    let changed = conn.execute(
        "UPDATE matches SET player1_score = ?2, player2_score = ?3, status = 'completed', \
         winner_id = ?4, completed_at = ?5, started_at = COALESCE(started_at, ?5) \
         WHERE id = ?1",
        params![id, player1_score, player2_score, winner_id, completed_at],
    )?;
    if changed == 0 {
        return Err(LeagueError::NotFound(format!("match {id} not found")));
    }
    Ok(())
}
