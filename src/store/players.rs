//! Player reads/writes: CRUD plus the relative-increment stat updates
//! applied when a match result lands.

use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{LeagueError, NewPlayer, Player, PlayerId, PlayerPatch};

const PLAYER_COLUMNS: &str = "id, name, nickname, tagline, stat_defence, stat_spin, stat_serve, \
     stat_agility, stat_physicality, stat_complainometer, wins, losses, total_points_scored, \
     total_points_against, longest_win_streak, longest_lose_streak, current_streak, \
     is_founding_season, created_at";

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        nickname: row.get(2)?,
        tagline: row.get(3)?,
        stat_defence: row.get(4)?,
        stat_spin: row.get(5)?,
        stat_serve: row.get(6)?,
        stat_agility: row.get(7)?,
        stat_physicality: row.get(8)?,
        stat_complainometer: row.get(9)?,
        wins: row.get(10)?,
        losses: row.get(11)?,
        total_points_scored: row.get(12)?,
        total_points_against: row.get(13)?,
        longest_win_streak: row.get(14)?,
        longest_lose_streak: row.get(15)?,
        current_streak: row.get(16)?,
        is_founding_season: row.get(17)?,
        created_at: row.get(18)?,
    })
}

pub fn insert(conn: &Connection, new: NewPlayer) -> Result<Player, LeagueError> {
    let player = new.into_player();
    player.validate_ratings()?;
    conn.execute(
        "INSERT INTO players (id, name, nickname, tagline, stat_defence, stat_spin, stat_serve, \
         stat_agility, stat_physicality, stat_complainometer, wins, losses, total_points_scored, \
         total_points_against, longest_win_streak, longest_lose_streak, current_streak, \
         is_founding_season, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        params![
            player.id,
            player.name,
            player.nickname,
            player.tagline,
            player.stat_defence,
            player.stat_spin,
            player.stat_serve,
            player.stat_agility,
            player.stat_physicality,
            player.stat_complainometer,
            player.wins,
            player.losses,
            player.total_points_scored,
            player.total_points_against,
            player.longest_win_streak,
            player.longest_lose_streak,
            player.current_streak,
            player.is_founding_season,
            player.created_at,
        ],
    )?;
    Ok(player)
}

pub fn get(conn: &Connection, id: PlayerId) -> Result<Player, LeagueError> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");
    conn.query_row(&sql, params![id], parse_player_row)
        .optional()?
        .ok_or_else(|| LeagueError::NotFound(format!("player {id} not found")))
}

/// All players, best record first (wins desc, losses asc).
pub fn list(conn: &Connection) -> Result<Vec<Player>, LeagueError> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY wins DESC, losses ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Admin override: full-row replace of whatever fields the patch carries.
/// Not used on the match-result path, which goes through the increment ops.
pub fn update(conn: &Connection, id: PlayerId, patch: &PlayerPatch) -> Result<Player, LeagueError> {
    let mut player = get(conn, id)?;
    patch.apply_to(&mut player);
    player.validate_ratings()?;
    conn.execute(
        "UPDATE players SET name = ?2, nickname = ?3, tagline = ?4, stat_defence = ?5, \
         stat_spin = ?6, stat_serve = ?7, stat_agility = ?8, stat_physicality = ?9, \
         stat_complainometer = ?10, wins = ?11, losses = ?12, total_points_scored = ?13, \
         total_points_against = ?14, longest_win_streak = ?15, longest_lose_streak = ?16, \
         current_streak = ?17, is_founding_season = ?18 \
         WHERE id = ?1",
        params![
            player.id,
            player.name,
            player.nickname,
            player.tagline,
            player.stat_defence,
            player.stat_spin,
            player.stat_serve,
            player.stat_agility,
            player.stat_physicality,
            player.stat_complainometer,
            player.wins,
            player.losses,
            player.total_points_scored,
            player.total_points_against,
            player.longest_win_streak,
            player.longest_lose_streak,
            player.current_streak,
            player.is_founding_season,
        ],
    )?;
    Ok(player)
}

pub fn delete(conn: &Connection, id: PlayerId) -> Result<(), LeagueError> {
    let changed = conn.execute("DELETE FROM players WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(LeagueError::NotFound(format!("player {id} not found")));
    }
    Ok(())
}

/// Record a win: wins + 1, streak continues or restarts at 1 after losses,
/// longest winning streak tracks the new value. All increments are relative
/// to the stored row, never read-then-write.
pub fn apply_win(
    conn: &Connection,
    id: PlayerId,
    points_for: i32,
    points_against: i32,
) -> Result<(), LeagueError> {
    let changed = conn.execute(
        "UPDATE players SET \
            wins = wins + 1, \
            current_streak = CASE WHEN current_streak >= 0 THEN current_streak + 1 ELSE 1 END, \
            longest_win_streak = MAX(longest_win_streak, \
                CASE WHEN current_streak >= 0 THEN current_streak + 1 ELSE 1 END), \
            total_points_scored = total_points_scored + ?1, \
            total_points_against = total_points_against + ?2 \
         WHERE id = ?3",
        params![points_for, points_against, id],
    )?;
    if changed == 0 {
        return Err(LeagueError::NotFound(format!("player {id} not found")));
    }
    Ok(())
}

/// Record a loss: mirror of [`apply_win`] with the streak going negative.
pub fn apply_loss(
    conn: &Connection,
    id: PlayerId,
    points_for: i32,
    points_against: i32,
) -> Result<(), LeagueError> {
    let changed = conn.execute(
        "UPDATE players SET \
            losses = losses + 1, \
            current_streak = CASE WHEN current_streak <= 0 THEN current_streak - 1 ELSE -1 END, \
            longest_lose_streak = MAX(longest_lose_streak, \
                ABS(CASE WHEN current_streak <= 0 THEN current_streak - 1 ELSE -1 END)), \
            total_points_scored = total_points_scored + ?1, \
            total_points_against = total_points_against + ?2 \
         WHERE id = ?3",
        params![points_for, points_against, id],
    )?;
    if changed == 0 {
        return Err(LeagueError::NotFound(format!("player {id} not found")));
    }
    Ok(())
}
