//! Standings: pure ranking functions over tallies. No store access, no
//! hidden state; same input, same output.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Player, TournamentParticipant};

/// Win percentage on a 0-100 scale. Zero games played counts as 0%.
pub fn win_percentage(wins: i32, losses: i32) -> f64 {
    let total = wins + losses;
    if total == 0 {
        return 0.0;
    }
    f64::from(wins) / f64::from(total) * 100.0
}

/// Human display of a signed streak: "W3", "L2", or "-" for none.
pub fn streak_display(streak: i32) -> String {
    match streak {
        0 => "-".to_string(),
        s if s > 0 => format!("W{s}"),
        s => format!("L{}", s.abs()),
    }
}

/// Rank one group's participants: group wins descending, then point
/// differential descending. The sort is stable, so rows tied on both keys
/// keep their input order.
pub fn rank_group(mut participants: Vec<TournamentParticipant>) -> Vec<TournamentParticipant> {
    participants.sort_by(|a, b| {
        b.group_wins
            .cmp(&a.group_wins)
            .then_with(|| b.points_diff().cmp(&a.points_diff()))
    });
    participants
}

/// One group's ranked table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GroupStanding {
    pub group_name: String,
    pub participants: Vec<TournamentParticipant>,
}

/// Split participants into their groups and rank each. Groups come out in
/// name order; participants without a group assignment are not in any table.
pub fn group_tables(participants: Vec<TournamentParticipant>) -> Vec<GroupStanding> {
    let mut groups: BTreeMap<String, Vec<TournamentParticipant>> = BTreeMap::new();
    for p in participants {
        if let Some(name) = p.group_name.clone() {
            groups.entry(name).or_default().push(p);
        }
    }
    groups
        .into_iter()
        .map(|(group_name, members)| GroupStanding {
            group_name,
            participants: rank_group(members),
        })
        .collect()
}

/// Rank all players: win percentage descending (0 games = 0%), then total
/// wins descending. Stable beyond that.
pub fn rank_leaderboard(mut players: Vec<Player>) -> Vec<Player> {
    players.sort_by(|a, b| {
        win_percentage(b.wins, b.losses)
            .total_cmp(&win_percentage(a.wins, a.losses))
            .then_with(|| b.wins.cmp(&a.wins))
    });
    players
}

/// Leaderboard row: player plus the display fields the table shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub player: Player,
    pub win_percentage: f64,
    pub streak: String,
}

/// Ranked leaderboard with 1-based ranks and display fields filled in.
pub fn leaderboard(players: Vec<Player>) -> Vec<LeaderboardEntry> {
    rank_leaderboard(players)
        .into_iter()
        .enumerate()
        .map(|(i, player)| LeaderboardEntry {
            rank: i + 1,
            win_percentage: win_percentage(player.wins, player.losses),
            streak: streak_display(player.current_streak),
            player,
        })
        .collect()
}
