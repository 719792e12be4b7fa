//! Error taxonomy shared by the store, the logic layer, and the web API.

/// Errors that can occur during league operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// A referenced record (match, player, tournament) does not exist.
    NotFound(String),
    /// Malformed or contradictory input (negative or tied scores, bad ratings).
    Validation(String),
    /// The operation clashes with current state (e.g. re-completing a match).
    Conflict(String),
    /// Underlying persistence failure.
    Storage(String),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::NotFound(msg)
            | LeagueError::Validation(msg)
            | LeagueError::Conflict(msg)
            | LeagueError::Storage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for LeagueError {}

impl From<rusqlite::Error> for LeagueError {
    fn from(e: rusqlite::Error) -> Self {
        LeagueError::Storage(e.to_string())
    }
}

impl From<r2d2::Error> for LeagueError {
    fn from(e: r2d2::Error) -> Self {
        LeagueError::Storage(e.to_string())
    }
}
