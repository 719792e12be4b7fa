//! Match result application: the one place that mutates derived stats.
//!
//! Completing a match touches five things (the match row, both players'
//! stats, the head-to-head pair, and group-stage tallies), so the whole
//! update runs in a single transaction. Either every effect lands or none.

use chrono::Utc;
use rusqlite::Connection;

use crate::models::{LeagueError, MatchDetail, MatchId, MatchStatus, Stage};
use crate::store;

/// Scores must be non-negative and cannot tie: games are won by two clear
/// points, so a submitted tie is always a data-entry mistake.
fn validate_final_scores(player1_score: i32, player2_score: i32) -> Result<(), LeagueError> {
    if player1_score < 0 || player2_score < 0 {
        return Err(LeagueError::Validation(format!(
            "scores must be non-negative (got {player1_score}-{player2_score})"
        )));
    }
    if player1_score == player2_score {
        return Err(LeagueError::Validation(format!(
            "scores cannot be tied (got {player1_score}-{player2_score}); \
             games are won by two clear points"
        )));
    }
    Ok(())
}

/// Apply a completed match's outcome to all dependent state, exactly once.
///
/// Effects, all-or-nothing:
/// 1. match row: final scores, completed status, winner, timestamps;
/// 2. winner stats: wins, streak, longest winning streak, point totals;
/// 3. loser stats: losses, streak, longest losing streak, point totals;
/// 4. head-to-head tally for the pair;
/// 5. group-stage tallies when the match is a tournament group match.
///
/// Completing an already-completed match is a conflict, never a
/// double-count. A retry is only safe after checking the match status.
pub fn complete_match(
    conn: &mut Connection,
    match_id: MatchId,
    player1_score: i32,
    player2_score: i32,
) -> Result<MatchDetail, LeagueError> {
    validate_final_scores(player1_score, player2_score)?;

    let tx = conn.transaction()?;

    let m = store::matches::get(&tx, match_id)?;
    if m.status == MatchStatus::Completed {
        return Err(LeagueError::Conflict(format!(
            "match {match_id} is already completed"
        )));
    }

    let (winner_id, loser_id, winner_score, loser_score) = if player1_score > player2_score {
        (m.player1_id, m.player2_id, player1_score, player2_score)
    } else {
        (m.player2_id, m.player1_id, player2_score, player1_score)
    };

    let now = Utc::now();
    store::matches::record_completion(&tx, match_id, player1_score, player2_score, winner_id, now)?;
    store::players::apply_win(&tx, winner_id, winner_score, loser_score)?;
    store::players::apply_loss(&tx, loser_id, loser_score, winner_score)?;
    store::head_to_head::record_win(&tx, winner_id, loser_id)?;

    if let Some(tournament_id) = m.tournament_id {
        if m.stage == Stage::Group {
            store::tournaments::record_group_result(
                &tx,
                tournament_id,
                winner_id,
                loser_id,
                winner_score,
                loser_score,
            )?;
        }
    }

    let detail = store::matches::get_detail(&tx, match_id)?;
    tx.commit()?;
    Ok(detail)
}

/// Move a scheduled match to in_progress, stamping `started_at` once.
pub fn start_match(conn: &Connection, match_id: MatchId) -> Result<MatchDetail, LeagueError> {
    let m = store::matches::get(conn, match_id)?;
    match m.status {
        MatchStatus::Scheduled => {
            store::matches::set_in_progress(conn, match_id, Utc::now())?;
            store::matches::get_detail(conn, match_id)
        }
        MatchStatus::InProgress => Err(LeagueError::Conflict(format!(
            "match {match_id} is already in progress"
        ))),
        MatchStatus::Completed => Err(LeagueError::Conflict(format!(
            "match {match_id} is already completed"
        ))),
    }
}

/// Update the running scores of a not-yet-completed match. Either score may
/// be omitted to keep its stored value. Ties are fine here: the game is
/// still going.
pub fn update_scores(
    conn: &Connection,
    match_id: MatchId,
    player1_score: Option<i32>,
    player2_score: Option<i32>,
) -> Result<MatchDetail, LeagueError> {
    let m = store::matches::get(conn, match_id)?;
    if m.status == MatchStatus::Completed {
        return Err(LeagueError::Conflict(format!(
            "match {match_id} is already completed; scores are final"
        )));
    }
    let p1 = player1_score.unwrap_or(m.player1_score);
    let p2 = player2_score.unwrap_or(m.player2_score);
    if p1 < 0 || p2 < 0 {
        return Err(LeagueError::Validation(format!(
            "scores must be non-negative (got {p1}-{p2})"
        )));
    }
    store::matches::set_scores(conn, match_id, p1, p2)?;
    store::matches::get_detail(conn, match_id)
}
