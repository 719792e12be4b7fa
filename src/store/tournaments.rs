//! Tournament reads/writes, including participant rows and their
//! group-stage tallies.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::models::{
    LeagueError, NewTournament, PlayerId, Tournament, TournamentId, TournamentParticipant,
    TournamentPatch,
};
use crate::store::players;

const TOURNAMENT_COLUMNS: &str = "t.id, t.name, t.description, t.venue, t.start_date, t.end_date, \
     t.registration_deadline, t.max_participants, t.group_count, t.status, t.champion_id, \
     t.created_at";

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        venue: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        registration_deadline: row.get(6)?,
        max_participants: row.get(7)?,
        group_count: row.get(8)?,
        status: row.get(9)?,
        champion_id: row.get(10)?,
        created_at: row.get(11)?,
    })
}

fn parse_participant_row(row: &rusqlite::Row) -> rusqlite::Result<TournamentParticipant> {
    Ok(TournamentParticipant {
        tournament_id: row.get(0)?,
        player_id: row.get(1)?,
        nickname: row.get(2)?,
        seed: row.get(3)?,
        group_name: row.get(4)?,
        group_wins: row.get(5)?,
        group_losses: row.get(6)?,
        group_points_for: row.get(7)?,
        group_points_against: row.get(8)?,
    })
}

/// Tournament list entry: champion nickname and entrant count joined in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TournamentSummary {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub champion_nickname: Option<String>,
    pub participant_count: i64,
}

pub fn insert(conn: &Connection, new: NewTournament) -> Result<Tournament, LeagueError> {
    let t = new.into_tournament();
    conn.execute(
        "INSERT INTO tournaments (id, name, description, venue, start_date, end_date, \
         registration_deadline, max_participants, group_count, status, champion_id, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            t.id,
            t.name,
            t.description,
            t.venue,
            t.start_date,
            t.end_date,
            t.registration_deadline,
            t.max_participants,
            t.group_count,
            t.status,
            t.champion_id,
            t.created_at,
        ],
    )?;
    Ok(t)
}

pub fn get(conn: &Connection, id: TournamentId) -> Result<Tournament, LeagueError> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments t WHERE t.id = ?1");
    conn.query_row(&sql, params![id], parse_tournament_row)
        .optional()?
        .ok_or_else(|| LeagueError::NotFound(format!("tournament {id} not found")))
}

/// All tournaments, most recent start date first.
pub fn list(conn: &Connection) -> Result<Vec<TournamentSummary>, LeagueError> {
    let sql = format!(
        "SELECT {TOURNAMENT_COLUMNS}, c.nickname, \
         (SELECT COUNT(*) FROM tournament_participants tp WHERE tp.tournament_id = t.id) \
         FROM tournaments t \
         LEFT JOIN players c ON c.id = t.champion_id \
         ORDER BY t.start_date DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(TournamentSummary {
                tournament: parse_tournament_row(row)?,
                champion_nickname: row.get(12)?,
                participant_count: row.get(13)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn update(
    conn: &Connection,
    id: TournamentId,
    patch: &TournamentPatch,
) -> Result<Tournament, LeagueError> {
    let mut t = get(conn, id)?;
    if let Some(champion) = patch.champion_id {
        // Champion must be an existing player.
        players::get(conn, champion)?;
    }
    patch.apply_to(&mut t);
    conn.execute(
        "UPDATE tournaments SET name = ?2, description = ?3, venue = ?4, start_date = ?5, \
         end_date = ?6, registration_deadline = ?7, max_participants = ?8, group_count = ?9, \
         status = ?10, champion_id = ?11 WHERE id = ?1",
        params![
            t.id,
            t.name,
            t.description,
            t.venue,
            t.start_date,
            t.end_date,
            t.registration_deadline,
            t.max_participants,
            t.group_count,
            t.status,
            t.champion_id,
        ],
    )?;
    Ok(t)
}

pub fn delete(conn: &Connection, id: TournamentId) -> Result<(), LeagueError> {
    let changed = conn.execute("DELETE FROM tournaments WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(LeagueError::NotFound(format!("tournament {id} not found")));
    }
    Ok(())
}

/// Register a player in a tournament, optionally seeded into a group.
pub fn add_participant(
    conn: &Connection,
    tournament_id: TournamentId,
    player_id: PlayerId,
    seed: Option<i32>,
    group_name: Option<String>,
) -> Result<TournamentParticipant, LeagueError> {
    get(conn, tournament_id)?;
    let player = players::get(conn, player_id)?;
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO tournament_participants \
         (tournament_id, player_id, seed, group_name) VALUES (?1, ?2, ?3, ?4)",
        params![tournament_id, player_id, seed, group_name],
    )?;
    if inserted == 0 {
        return Err(LeagueError::Conflict(format!(
            "player {player_id} is already registered in tournament {tournament_id}"
        )));
    }
    Ok(TournamentParticipant {
        tournament_id,
        player_id,
        nickname: player.nickname,
        seed,
        group_name,
        group_wins: 0,
        group_losses: 0,
        group_points_for: 0,
        group_points_against: 0,
    })
}

/// Participants of one tournament, seeds first.
pub fn list_participants(
    conn: &Connection,
    tournament_id: TournamentId,
) -> Result<Vec<TournamentParticipant>, LeagueError> {
    let mut stmt = conn.prepare(
        "SELECT tp.tournament_id, tp.player_id, p.nickname, tp.seed, tp.group_name, \
         tp.group_wins, tp.group_losses, tp.group_points_for, tp.group_points_against \
         FROM tournament_participants tp \
         JOIN players p ON p.id = tp.player_id \
         WHERE tp.tournament_id = ?1 \
         ORDER BY tp.seed ASC, p.nickname ASC",
    )?;
    let rows = stmt
        .query_map(params![tournament_id], parse_participant_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Fold one group-stage result into both participants' tallies.
/// Rows may legitimately be absent (e.g. an exhibition match tagged onto a
/// tournament); missing rows are left alone rather than treated as errors.
pub fn record_group_result(
    conn: &Connection,
    tournament_id: TournamentId,
    winner_id: PlayerId,
    loser_id: PlayerId,
    winner_score: i32,
    loser_score: i32,
) -> Result<(), LeagueError> {
    conn.execute(
        "UPDATE tournament_participants SET \
            group_wins = group_wins + 1, \
            group_points_for = group_points_for + ?3, \
            group_points_against = group_points_against + ?4 \
         WHERE tournament_id = ?1 AND player_id = ?2",
        params![tournament_id, winner_id, winner_score, loser_score],
    )?;
    conn.execute(
        "UPDATE tournament_participants SET \
            group_losses = group_losses + 1, \
            group_points_for = group_points_for + ?3, \
            group_points_against = group_points_against + ?4 \
         WHERE tournament_id = ?1 AND player_id = ?2",
        params![tournament_id, loser_id, loser_score, winner_score],
    )?;
    Ok(())
}
