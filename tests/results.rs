//! Integration tests for match result application: stats, streaks,
//! head-to-head, and group tallies.

use pingers_league::models::{
    LeagueError, Match, MatchStatus, NewMatch, NewPlayer, NewTournament, Player, Stage,
};
use pingers_league::{complete_match, start_match, store, update_scores};
use rusqlite::Connection;

fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    store::init_schema(&conn).unwrap();
    conn
}

fn add_player(conn: &Connection, nickname: &str) -> Player {
    store::players::insert(conn, NewPlayer::new(nickname, nickname)).unwrap()
}

fn schedule(conn: &Connection, a: &Player, b: &Player) -> Match {
    store::matches::insert(conn, NewMatch::new(a.id, b.id)).unwrap()
}

#[test]
fn first_match_updates_all_aggregates() {
    let mut conn = test_conn();
    let a = add_player(&conn, "The Mongoose");
    let b = add_player(&conn, "The Wall");
    let m = schedule(&conn, &a, &b);

    let detail = complete_match(&mut conn, m.id, 21, 15).unwrap();
    assert_eq!(detail.record.status, MatchStatus::Completed);
    assert_eq!(detail.record.winner_id, Some(a.id));
    assert_eq!(detail.winner_nickname.as_deref(), Some("The Mongoose"));
    assert!(detail.record.completed_at.is_some());
    assert!(detail.record.started_at.is_some());

    let a = store::players::get(&conn, a.id).unwrap();
    assert_eq!(a.wins, 1);
    assert_eq!(a.losses, 0);
    assert_eq!(a.current_streak, 1);
    assert_eq!(a.longest_win_streak, 1);
    assert_eq!(a.total_points_scored, 21);
    assert_eq!(a.total_points_against, 15);

    let b = store::players::get(&conn, b.id).unwrap();
    assert_eq!(b.wins, 0);
    assert_eq!(b.losses, 1);
    assert_eq!(b.current_streak, -1);
    assert_eq!(b.longest_lose_streak, 1);
    assert_eq!(b.total_points_scored, 15);
    assert_eq!(b.total_points_against, 21);

    let pair = store::head_to_head::get_pair(&conn, a.id, b.id)
        .unwrap()
        .unwrap();
    assert_eq!(pair.wins_for(a.id), Some(1));
    assert_eq!(pair.wins_for(b.id), Some(0));
}

#[test]
fn rematch_flips_streaks_and_reuses_the_pair_record() {
    let mut conn = test_conn();
    let a = add_player(&conn, "A");
    let b = add_player(&conn, "B");

    let first = schedule(&conn, &a, &b);
    complete_match(&mut conn, first.id, 21, 15).unwrap();
    let second = schedule(&conn, &a, &b);
    complete_match(&mut conn, second.id, 19, 21).unwrap();

    let a = store::players::get(&conn, a.id).unwrap();
    assert_eq!((a.wins, a.losses), (1, 1));
    assert_eq!(a.current_streak, -1);
    let b = store::players::get(&conn, b.id).unwrap();
    assert_eq!((b.wins, b.losses), (1, 1));
    assert_eq!(b.current_streak, 1);

    // Still exactly one record for the pair, regardless of who won.
    let records = store::head_to_head::list_for_player(&conn, a.id).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].wins_for(a.id), Some(1));
    assert_eq!(records[0].wins_for(b.id), Some(1));
}

#[test]
fn streaks_accumulate_and_track_longest() {
    let mut conn = test_conn();
    let a = add_player(&conn, "A");
    let b = add_player(&conn, "B");

    for _ in 0..3 {
        let m = schedule(&conn, &a, &b);
        complete_match(&mut conn, m.id, 21, 10).unwrap();
    }
    let a_mid = store::players::get(&conn, a.id).unwrap();
    assert_eq!(a_mid.current_streak, 3);
    assert_eq!(a_mid.longest_win_streak, 3);
    let b_mid = store::players::get(&conn, b.id).unwrap();
    assert_eq!(b_mid.current_streak, -3);
    assert_eq!(b_mid.longest_lose_streak, 3);

    // B finally wins: both streaks reset to a fresh run of 1.
    let m = schedule(&conn, &a, &b);
    complete_match(&mut conn, m.id, 12, 21).unwrap();

    let a = store::players::get(&conn, a.id).unwrap();
    assert_eq!(a.current_streak, -1);
    assert_eq!(a.longest_win_streak, 3);
    assert_eq!(a.longest_lose_streak, 1);
    let b = store::players::get(&conn, b.id).unwrap();
    assert_eq!(b.current_streak, 1);
    assert_eq!(b.longest_lose_streak, 3);
    assert_eq!(b.longest_win_streak, 1);
}

#[test]
fn tied_scores_are_rejected_without_mutation() {
    let mut conn = test_conn();
    let a = add_player(&conn, "A");
    let b = add_player(&conn, "B");
    let m = schedule(&conn, &a, &b);

    let err = complete_match(&mut conn, m.id, 20, 20).unwrap_err();
    assert!(matches!(err, LeagueError::Validation(_)));

    let m = store::matches::get(&conn, m.id).unwrap();
    assert_eq!(m.status, MatchStatus::Scheduled);
    assert_eq!(m.winner_id, None);
    let a = store::players::get(&conn, a.id).unwrap();
    assert_eq!((a.wins, a.losses), (0, 0));
    assert!(store::head_to_head::get_pair(&conn, a.id, b.id)
        .unwrap()
        .is_none());
}

#[test]
fn negative_scores_are_rejected() {
    let mut conn = test_conn();
    let a = add_player(&conn, "A");
    let b = add_player(&conn, "B");
    let m = schedule(&conn, &a, &b);

    let err = complete_match(&mut conn, m.id, -1, 21).unwrap_err();
    assert!(matches!(err, LeagueError::Validation(_)));
}

#[test]
fn completing_twice_conflicts_instead_of_double_counting() {
    let mut conn = test_conn();
    let a = add_player(&conn, "A");
    let b = add_player(&conn, "B");
    let m = schedule(&conn, &a, &b);

    complete_match(&mut conn, m.id, 21, 15).unwrap();
    let err = complete_match(&mut conn, m.id, 21, 15).unwrap_err();
    assert!(matches!(err, LeagueError::Conflict(_)));

    let a = store::players::get(&conn, a.id).unwrap();
    assert_eq!(a.wins, 1);
    assert_eq!(a.total_points_scored, 21);
    let pair = store::head_to_head::get_pair(&conn, a.id, b.id)
        .unwrap()
        .unwrap();
    assert_eq!(pair.wins_for(a.id), Some(1));
}

#[test]
fn unknown_match_is_not_found() {
    let mut conn = test_conn();
    let err = complete_match(&mut conn, uuid::Uuid::new_v4(), 21, 15).unwrap_err();
    assert!(matches!(err, LeagueError::NotFound(_)));
}

#[test]
fn group_match_updates_participant_tallies() {
    let mut conn = test_conn();
    let a = add_player(&conn, "A");
    let b = add_player(&conn, "B");
    let t = store::tournaments::insert(
        &conn,
        NewTournament::new("Founding Season Open", chrono::Utc::now()),
    )
    .unwrap();
    store::tournaments::add_participant(&conn, t.id, a.id, Some(1), Some("A".to_string()))
        .unwrap();
    store::tournaments::add_participant(&conn, t.id, b.id, Some(2), Some("A".to_string()))
        .unwrap();

    let m = store::matches::insert(
        &conn,
        NewMatch {
            tournament_id: Some(t.id),
            group_name: Some("A".to_string()),
            stage: Stage::Group,
            ..NewMatch::new(a.id, b.id)
        },
    )
    .unwrap();
    complete_match(&mut conn, m.id, 21, 17).unwrap();

    let participants = store::tournaments::list_participants(&conn, t.id).unwrap();
    let pa = participants.iter().find(|p| p.player_id == a.id).unwrap();
    assert_eq!((pa.group_wins, pa.group_losses), (1, 0));
    assert_eq!((pa.group_points_for, pa.group_points_against), (21, 17));
    let pb = participants.iter().find(|p| p.player_id == b.id).unwrap();
    assert_eq!((pb.group_wins, pb.group_losses), (0, 1));
    assert_eq!((pb.group_points_for, pb.group_points_against), (17, 21));
}

#[test]
fn knockout_match_leaves_group_tallies_alone() {
    let mut conn = test_conn();
    let a = add_player(&conn, "A");
    let b = add_player(&conn, "B");
    let t = store::tournaments::insert(
        &conn,
        NewTournament::new("Knockout Cup", chrono::Utc::now()),
    )
    .unwrap();
    store::tournaments::add_participant(&conn, t.id, a.id, None, Some("A".to_string())).unwrap();
    store::tournaments::add_participant(&conn, t.id, b.id, None, Some("A".to_string())).unwrap();

    let m = store::matches::insert(
        &conn,
        NewMatch {
            tournament_id: Some(t.id),
            stage: Stage::SemiFinal,
            ..NewMatch::new(a.id, b.id)
        },
    )
    .unwrap();
    complete_match(&mut conn, m.id, 21, 19).unwrap();

    for p in store::tournaments::list_participants(&conn, t.id).unwrap() {
        assert_eq!((p.group_wins, p.group_losses), (0, 0));
        assert_eq!((p.group_points_for, p.group_points_against), (0, 0));
    }
    // Player stats and head-to-head still apply to knockout matches.
    let a = store::players::get(&conn, a.id).unwrap();
    assert_eq!(a.wins, 1);
}

#[test]
fn starting_a_match_stamps_started_at_once() {
    let mut conn = test_conn();
    let a = add_player(&conn, "A");
    let b = add_player(&conn, "B");
    let m = schedule(&conn, &a, &b);

    let started = start_match(&conn, m.id).unwrap();
    assert_eq!(started.record.status, MatchStatus::InProgress);
    let started_at = started.record.started_at.unwrap();

    let err = start_match(&conn, m.id).unwrap_err();
    assert!(matches!(err, LeagueError::Conflict(_)));

    let done = complete_match(&mut conn, m.id, 21, 15).unwrap();
    // Completion keeps the original start time.
    assert_eq!(done.record.started_at, Some(started_at));

    // A completed match cannot be started either.
    let err = start_match(&conn, m.id).unwrap_err();
    assert!(matches!(err, LeagueError::Conflict(_)));
}

#[test]
fn running_scores_may_tie_until_completion() {
    let mut conn = test_conn();
    let a = add_player(&conn, "A");
    let b = add_player(&conn, "B");
    let m = schedule(&conn, &a, &b);

    start_match(&conn, m.id).unwrap();
    let detail = update_scores(&conn, m.id, Some(15), Some(15)).unwrap();
    assert_eq!(detail.record.player1_score, 15);
    assert_eq!(detail.record.player2_score, 15);

    complete_match(&mut conn, m.id, 22, 20).unwrap();
    let err = update_scores(&conn, m.id, Some(0), None).unwrap_err();
    assert!(matches!(err, LeagueError::Conflict(_)));
}

#[test]
fn pooled_database_opens_reopens_and_applies_results() {
    let path = std::env::temp_dir().join(format!("pingers-test-{}.db", uuid::Uuid::new_v4()));
    let path_str = path.to_str().unwrap();

    // The path the web binary boots through: pool + schema, then a
    // completion on a pooled connection.
    let pool = pingers_league::open_pool(path_str).unwrap();
    let mut conn = pool.get().unwrap();
    let a = store::players::insert(&conn, NewPlayer::new("A", "A")).unwrap();
    let b = store::players::insert(&conn, NewPlayer::new("B", "B")).unwrap();
    let m = store::matches::insert(&conn, NewMatch::new(a.id, b.id)).unwrap();
    complete_match(&mut conn, m.id, 21, 15).unwrap();
    drop(conn);
    drop(pool);

    // Reopening the same file re-applies the schema (idempotent) and the
    // data survives.
    let pool = pingers_league::open_pool(path_str).unwrap();
    let conn = pool.get().unwrap();
    let reread = store::players::get(&conn, a.id).unwrap();
    assert_eq!((reread.wins, reread.losses), (1, 0));
    assert_eq!(store::players::list(&conn).unwrap().len(), 2);

    drop(conn);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn match_against_self_is_rejected() {
    let conn = test_conn();
    let a = add_player(&conn, "A");
    let err = store::matches::insert(&conn, NewMatch::new(a.id, a.id)).unwrap_err();
    assert!(matches!(err, LeagueError::Validation(_)));
}

#[test]
fn duplicate_registration_conflicts() {
    let conn = test_conn();
    let a = add_player(&conn, "A");
    let t = store::tournaments::insert(
        &conn,
        NewTournament::new("Open", chrono::Utc::now()),
    )
    .unwrap();
    store::tournaments::add_participant(&conn, t.id, a.id, None, None).unwrap();
    let err = store::tournaments::add_participant(&conn, t.id, a.id, None, None).unwrap_err();
    assert!(matches!(err, LeagueError::Conflict(_)));
}
