//! Data structures for the league: players, matches, tournaments, errors.

mod error;
mod game;
mod player;
mod tournament;

pub use error::LeagueError;
pub use game::{Match, MatchDetail, MatchId, MatchStatus, NewMatch, Stage};
pub use player::{NewPlayer, Player, PlayerId, PlayerPatch};
pub use tournament::{
    HeadToHead, NewTournament, Tournament, TournamentId, TournamentParticipant, TournamentPatch,
    TournamentStatus,
};
