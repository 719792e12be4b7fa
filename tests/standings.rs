//! Tests for the pure standings calculators: group tables and leaderboard.

use pingers_league::models::{NewPlayer, Player, TournamentParticipant};
use pingers_league::{
    group_tables, leaderboard, rank_group, rank_leaderboard, streak_display, win_percentage,
};
use uuid::Uuid;

fn participant(nickname: &str, wins: i32, points_for: i32, points_against: i32) -> TournamentParticipant {
    TournamentParticipant {
        tournament_id: Uuid::nil(),
        player_id: Uuid::new_v4(),
        nickname: nickname.to_string(),
        seed: None,
        group_name: Some("A".to_string()),
        group_wins: wins,
        group_losses: 0,
        group_points_for: points_for,
        group_points_against: points_against,
    }
}

fn player(nickname: &str, wins: i32, losses: i32) -> Player {
    let mut p = NewPlayer::new(nickname, nickname).into_player();
    p.wins = wins;
    p.losses = losses;
    p
}

fn nicknames(players: &[Player]) -> Vec<&str> {
    players.iter().map(|p| p.nickname.as_str()).collect()
}

#[test]
fn group_ranking_orders_by_wins_then_point_diff() {
    let ranked = rank_group(vec![
        participant("low-diff", 2, 40, 38),
        participant("most-wins", 3, 50, 45),
        participant("high-diff", 2, 42, 30),
    ]);
    let order: Vec<&str> = ranked.iter().map(|p| p.nickname.as_str()).collect();
    assert_eq!(order, vec!["most-wins", "high-diff", "low-diff"]);
}

#[test]
fn group_ranking_is_stable_for_fully_tied_rows() {
    // Same wins, same differential: input order must survive.
    let ranked = rank_group(vec![
        participant("first", 2, 42, 40),
        participant("second", 2, 30, 28),
        participant("third", 2, 21, 19),
    ]);
    let order: Vec<&str> = ranked.iter().map(|p| p.nickname.as_str()).collect();
    assert_eq!(order, vec!["first", "second", "third"]);
}

#[test]
fn group_tables_splits_by_group_in_name_order() {
    let mut b1 = participant("b1", 1, 21, 15);
    b1.group_name = Some("B".to_string());
    let mut ungrouped = participant("waitlist", 0, 0, 0);
    ungrouped.group_name = None;

    let tables = group_tables(vec![
        b1,
        participant("a1", 2, 42, 30),
        participant("a2", 1, 35, 40),
        ungrouped,
    ]);
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].group_name, "A");
    assert_eq!(tables[0].participants.len(), 2);
    assert_eq!(tables[0].participants[0].nickname, "a1");
    assert_eq!(tables[1].group_name, "B");
    assert_eq!(tables[1].participants[0].nickname, "b1");
}

#[test]
fn leaderboard_orders_by_percentage_then_wins() {
    let ranked = rank_leaderboard(vec![
        player("fifty-fifty", 5, 5),
        player("perfect", 3, 0),
        player("grinder", 8, 4),
    ]);
    assert_eq!(nicknames(&ranked), vec!["perfect", "grinder", "fifty-fifty"]);
}

#[test]
fn equal_percentage_breaks_tie_by_total_wins() {
    // 6/12 and 1/2 are both 50%; more wins ranks first.
    let ranked = rank_leaderboard(vec![player("casual", 1, 1), player("veteran", 6, 6)]);
    assert_eq!(nicknames(&ranked), vec!["veteran", "casual"]);
}

#[test]
fn zero_game_players_rank_as_zero_percent() {
    // A new player is 0%, below anyone with a win, tied with 0% losers;
    // among the 0% crowd wins are equal so input order holds.
    let ranked = rank_leaderboard(vec![
        player("rookie", 0, 0),
        player("struggler", 0, 3),
        player("winner", 1, 5),
    ]);
    assert_eq!(nicknames(&ranked), vec!["winner", "rookie", "struggler"]);
}

#[test]
fn leaderboard_entries_carry_rank_and_display_fields() {
    let mut hot = player("hot", 4, 1);
    hot.current_streak = 3;
    let entries = leaderboard(vec![player("cold", 1, 3), hot]);
    assert_eq!(entries[0].rank, 1);
    assert_eq!(entries[0].player.nickname, "hot");
    assert_eq!(entries[0].win_percentage, 80.0);
    assert_eq!(entries[0].streak, "W3");
    assert_eq!(entries[1].rank, 2);
    assert_eq!(entries[1].win_percentage, 25.0);
}

#[test]
fn win_percentage_treats_zero_games_as_zero() {
    assert_eq!(win_percentage(0, 0), 0.0);
    assert_eq!(win_percentage(1, 1), 50.0);
    assert_eq!(win_percentage(3, 0), 100.0);
}

#[test]
fn streak_display_formats_both_directions() {
    assert_eq!(streak_display(0), "-");
    assert_eq!(streak_display(4), "W4");
    assert_eq!(streak_display(-2), "L2");
}
