//! Business logic: result application and standings.

pub mod results;
pub mod standings;

pub use results::{complete_match, start_match, update_scores};
pub use standings::{
    group_tables, leaderboard, rank_group, rank_leaderboard, streak_display, win_percentage,
    GroupStanding, LeaderboardEntry,
};
