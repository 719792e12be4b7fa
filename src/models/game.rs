//! Match record, status lifecycle, and tournament stage.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Lifecycle of a match. Transitions are monotonic:
/// scheduled -> in_progress -> completed, never backwards.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(MatchStatus::Scheduled),
            "in_progress" => Some(MatchStatus::InProgress),
            "completed" => Some(MatchStatus::Completed),
            _ => None,
        }
    }
}

/// Phase of a tournament this match belongs to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Group,
    QuarterFinal,
    SemiFinal,
    ConsolationSemi,
    ConsolationFinal,
    Final,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Group => "group",
            Stage::QuarterFinal => "quarter_final",
            Stage::SemiFinal => "semi_final",
            Stage::ConsolationSemi => "consolation_semi",
            Stage::ConsolationFinal => "consolation_final",
            Stage::Final => "final",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "group" => Some(Stage::Group),
            "quarter_final" => Some(Stage::QuarterFinal),
            "semi_final" => Some(Stage::SemiFinal),
            "consolation_semi" => Some(Stage::ConsolationSemi),
            "consolation_final" => Some(Stage::ConsolationFinal),
            "final" => Some(Stage::Final),
            _ => None,
        }
    }
}

/// A single match between two players, optionally inside a tournament.
///
/// `winner_id` is set if and only if the match is completed, and always
/// equals one of the two player ids.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: Option<Uuid>,
    /// Group label (e.g. "A") when this is a group-stage match.
    pub group_name: Option<String>,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player1_score: i32,
    pub player2_score: i32,
    pub status: MatchStatus,
    pub stage: Stage,
    /// Slot in the knockout bracket display.
    pub bracket_position: Option<i32>,
    pub winner_id: Option<PlayerId>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Payload for scheduling a match.
#[derive(Clone, Debug, Deserialize)]
pub struct NewMatch {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    #[serde(default)]
    pub tournament_id: Option<Uuid>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub bracket_position: Option<i32>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl NewMatch {
    /// A friendly (non-tournament) match between two players.
    pub fn new(player1_id: PlayerId, player2_id: PlayerId) -> Self {
        Self {
            player1_id,
            player2_id,
            tournament_id: None,
            group_name: None,
            stage: Stage::Group,
            bracket_position: None,
            scheduled_time: None,
        }
    }

    /// Materialize a scheduled Match record with a fresh id and zero scores.
    pub fn into_match(self) -> Match {
        Match {
            id: Uuid::new_v4(),
            tournament_id: self.tournament_id,
            group_name: self.group_name,
            player1_id: self.player1_id,
            player2_id: self.player2_id,
            player1_score: 0,
            player2_score: 0,
            status: MatchStatus::Scheduled,
            stage: self.stage,
            bracket_position: self.bracket_position,
            winner_id: None,
            scheduled_time: self.scheduled_time,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }
}

/// A match with display names joined in (API responses).
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub record: Match,
    pub player1_name: String,
    pub player1_nickname: String,
    pub player2_name: String,
    pub player2_nickname: String,
    pub winner_nickname: Option<String>,
    pub tournament_name: Option<String>,
}
