//! Pingers league server: library with models, store, and business logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    complete_match, group_tables, leaderboard, rank_group, rank_leaderboard, start_match,
    streak_display, update_scores, win_percentage, GroupStanding, LeaderboardEntry,
};
pub use models::{
    HeadToHead, LeagueError, Match, MatchDetail, MatchId, MatchStatus, NewMatch, NewPlayer,
    NewTournament, Player, PlayerId, PlayerPatch, Stage, Tournament, TournamentId,
    TournamentParticipant, TournamentPatch, TournamentStatus,
};
pub use store::{open_pool, DbConn, DbPool};
