//! Head-to-head tallies. One row per pair of players, keyed canonically
//! (smaller id first); the upsert keeps that invariant under any call order.

use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{HeadToHead, LeagueError, PlayerId};

fn parse_pair_row(row: &rusqlite::Row) -> rusqlite::Result<HeadToHead> {
    Ok(HeadToHead {
        player1_id: row.get(0)?,
        player2_id: row.get(1)?,
        player1_wins: row.get(2)?,
        player2_wins: row.get(3)?,
    })
}

/// Count one win for `winner` against `loser`, creating the pair record on
/// first meeting.
pub fn record_win(conn: &Connection, winner: PlayerId, loser: PlayerId) -> Result<(), LeagueError> {
    let (p1, p2) = HeadToHead::canonical_pair(winner, loser);
    let (p1_wins, p2_wins) = if winner == p1 { (1, 0) } else { (0, 1) };
    conn.execute(
        "INSERT INTO head_to_head (player1_id, player2_id, player1_wins, player2_wins) \
         VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(player1_id, player2_id) DO UPDATE SET \
            player1_wins = player1_wins + excluded.player1_wins, \
            player2_wins = player2_wins + excluded.player2_wins",
        params![p1, p2, p1_wins, p2_wins],
    )?;
    Ok(())
}

/// The pair record for two players in either order, if they have met.
pub fn get_pair(
    conn: &Connection,
    a: PlayerId,
    b: PlayerId,
) -> Result<Option<HeadToHead>, LeagueError> {
    let (p1, p2) = HeadToHead::canonical_pair(a, b);
    let record = conn
        .query_row(
            "SELECT player1_id, player2_id, player1_wins, player2_wins \
             FROM head_to_head WHERE player1_id = ?1 AND player2_id = ?2",
            params![p1, p2],
            parse_pair_row,
        )
        .optional()?;
    Ok(record)
}

/// Every pair record featuring the given player.
pub fn list_for_player(conn: &Connection, id: PlayerId) -> Result<Vec<HeadToHead>, LeagueError> {
    let mut stmt = conn.prepare(
        "SELECT player1_id, player2_id, player1_wins, player2_wins \
         FROM head_to_head WHERE player1_id = ?1 OR player2_id = ?1",
    )?;
    let rows = stmt
        .query_map(params![id], parse_pair_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
