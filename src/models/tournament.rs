//! Tournament containers, participants with group tallies, and head-to-head.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Where the tournament is in its life: sign-ups, round-robin groups,
/// knockout bracket, done.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Upcoming,
    Registration,
    GroupStage,
    Knockout,
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::Upcoming => "upcoming",
            TournamentStatus::Registration => "registration",
            TournamentStatus::GroupStage => "group_stage",
            TournamentStatus::Knockout => "knockout",
            TournamentStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upcoming" => Some(TournamentStatus::Upcoming),
            "registration" => Some(TournamentStatus::Registration),
            "group_stage" => Some(TournamentStatus::GroupStage),
            "knockout" => Some(TournamentStatus::Knockout),
            "completed" => Some(TournamentStatus::Completed),
            _ => None,
        }
    }
}

/// A tournament: group stage into knockouts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: Option<String>,
    pub venue: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_participants: i32,
    pub group_count: i32,
    pub status: TournamentStatus,
    pub champion_id: Option<PlayerId>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a tournament.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_venue")]
    pub venue: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default = "default_max_participants")]
    pub max_participants: i32,
    #[serde(default = "default_group_count")]
    pub group_count: i32,
}

fn default_venue() -> String {
    "The Home of Pingers".to_string()
}

fn default_max_participants() -> i32 {
    16
}

fn default_group_count() -> i32 {
    4
}

impl NewTournament {
    pub fn new(name: impl Into<String>, start_date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            description: None,
            venue: default_venue(),
            start_date,
            end_date: None,
            registration_deadline: None,
            max_participants: default_max_participants(),
            group_count: default_group_count(),
        }
    }

    pub fn into_tournament(self) -> Tournament {
        Tournament {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            venue: self.venue,
            start_date: self.start_date,
            end_date: self.end_date,
            registration_deadline: self.registration_deadline,
            max_participants: self.max_participants,
            group_count: self.group_count,
            status: TournamentStatus::Upcoming,
            champion_id: None,
            created_at: Utc::now(),
        }
    }
}

/// Admin update: any present field replaces the stored value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TournamentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_participants: Option<i32>,
    pub group_count: Option<i32>,
    pub status: Option<TournamentStatus>,
    pub champion_id: Option<PlayerId>,
}

impl TournamentPatch {
    pub fn apply_to(&self, tournament: &mut Tournament) {
        if let Some(v) = &self.name {
            tournament.name = v.clone();
        }
        if let Some(v) = &self.description {
            tournament.description = Some(v.clone());
        }
        if let Some(v) = &self.venue {
            tournament.venue = v.clone();
        }
        if let Some(v) = self.start_date {
            tournament.start_date = v;
        }
        if let Some(v) = self.end_date {
            tournament.end_date = Some(v);
        }
        if let Some(v) = self.registration_deadline {
            tournament.registration_deadline = Some(v);
        }
        if let Some(v) = self.max_participants {
            tournament.max_participants = v;
        }
        if let Some(v) = self.group_count {
            tournament.group_count = v;
        }
        if let Some(v) = self.status {
            tournament.status = v;
        }
        if let Some(v) = self.champion_id {
            tournament.champion_id = Some(v);
        }
    }
}

/// A player's membership and group-stage tally within one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TournamentParticipant {
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    /// Player nickname, joined in for display.
    pub nickname: String,
    pub seed: Option<i32>,
    pub group_name: Option<String>,
    pub group_wins: i32,
    pub group_losses: i32,
    pub group_points_for: i32,
    pub group_points_against: i32,
}

impl TournamentParticipant {
    /// Group-stage point differential (the ranking tie-break).
    pub fn points_diff(&self) -> i32 {
        self.group_points_for - self.group_points_against
    }
}

/// Running win tally between one specific pair of players, independent of
/// tournament context. Stored under a canonical key (smaller id first) so
/// each pair has exactly one record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HeadToHead {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player1_wins: i32,
    pub player2_wins: i32,
}

impl HeadToHead {
    /// Canonical ordering for a pair: the smaller id is player 1.
    pub fn canonical_pair(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Wins recorded for the given player, if they are part of this pair.
    pub fn wins_for(&self, player: PlayerId) -> Option<i32> {
        if player == self.player1_id {
            Some(self.player1_wins)
        } else if player == self.player2_id {
            Some(self.player2_wins)
        } else {
            None
        }
    }

    /// The other player in the pair, from the given player's perspective.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if player == self.player1_id {
            Some(self.player2_id)
        } else if player == self.player2_id {
            Some(self.player1_id)
        } else {
            None
        }
    }
}
