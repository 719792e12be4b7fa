//! Player profile, skill ratings, and cumulative stats.

use crate::models::LeagueError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Skill ratings are on a 1-10 scale.
const RATING_MIN: i32 = 1;
const RATING_MAX: i32 = 10;

fn default_rating() -> i32 {
    5
}

/// A league player.
///
/// `wins + losses` always equals the number of completed matches the player
/// appears in; the derived fields (wins, losses, point totals, streaks) are
/// mutated only by match-result application or by an explicit admin override.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub nickname: String,
    pub tagline: Option<String>,
    pub stat_defence: i32,
    pub stat_spin: i32,
    pub stat_serve: i32,
    pub stat_agility: i32,
    pub stat_physicality: i32,
    pub stat_complainometer: i32,
    pub wins: i32,
    pub losses: i32,
    pub total_points_scored: i32,
    pub total_points_against: i32,
    pub longest_win_streak: i32,
    pub longest_lose_streak: i32,
    /// Signed: positive = consecutive wins, negative = consecutive losses.
    pub current_streak: i32,
    /// Joined during the league's inaugural season.
    pub is_founding_season: bool,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn games_played(&self) -> i32 {
        self.wins + self.losses
    }

    fn ratings(&self) -> [(&'static str, i32); 6] {
        [
            ("stat_defence", self.stat_defence),
            ("stat_spin", self.stat_spin),
            ("stat_serve", self.stat_serve),
            ("stat_agility", self.stat_agility),
            ("stat_physicality", self.stat_physicality),
            ("stat_complainometer", self.stat_complainometer),
        ]
    }

    /// Check all six skill ratings are within 1-10.
    pub fn validate_ratings(&self) -> Result<(), LeagueError> {
        for (name, value) in self.ratings() {
            if !(RATING_MIN..=RATING_MAX).contains(&value) {
                return Err(LeagueError::Validation(format!(
                    "{} must be between {} and {} (got {})",
                    name, RATING_MIN, RATING_MAX, value
                )));
            }
        }
        Ok(())
    }
}

/// Payload for creating a player. Ratings default to 5.
#[derive(Clone, Debug, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub nickname: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default = "default_rating")]
    pub stat_defence: i32,
    #[serde(default = "default_rating")]
    pub stat_spin: i32,
    #[serde(default = "default_rating")]
    pub stat_serve: i32,
    #[serde(default = "default_rating")]
    pub stat_agility: i32,
    #[serde(default = "default_rating")]
    pub stat_physicality: i32,
    #[serde(default = "default_rating")]
    pub stat_complainometer: i32,
    #[serde(default)]
    pub is_founding_season: bool,
}

impl NewPlayer {
    /// New player payload with the given names and all ratings at 5.
    pub fn new(name: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nickname: nickname.into(),
            tagline: None,
            stat_defence: default_rating(),
            stat_spin: default_rating(),
            stat_serve: default_rating(),
            stat_agility: default_rating(),
            stat_physicality: default_rating(),
            stat_complainometer: default_rating(),
            is_founding_season: false,
        }
    }

    /// Materialize a full Player record with a fresh id and zeroed stats.
    pub fn into_player(self) -> Player {
        Player {
            id: Uuid::new_v4(),
            name: self.name,
            nickname: self.nickname,
            tagline: self.tagline,
            stat_defence: self.stat_defence,
            stat_spin: self.stat_spin,
            stat_serve: self.stat_serve,
            stat_agility: self.stat_agility,
            stat_physicality: self.stat_physicality,
            stat_complainometer: self.stat_complainometer,
            wins: 0,
            losses: 0,
            total_points_scored: 0,
            total_points_against: 0,
            longest_win_streak: 0,
            longest_lose_streak: 0,
            current_streak: 0,
            is_founding_season: self.is_founding_season,
            created_at: Utc::now(),
        }
    }
}

/// Admin override: any present field replaces the stored value.
/// Derived fields are included so bad data can be corrected by hand.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub tagline: Option<String>,
    pub stat_defence: Option<i32>,
    pub stat_spin: Option<i32>,
    pub stat_serve: Option<i32>,
    pub stat_agility: Option<i32>,
    pub stat_physicality: Option<i32>,
    pub stat_complainometer: Option<i32>,
    pub wins: Option<i32>,
    pub losses: Option<i32>,
    pub total_points_scored: Option<i32>,
    pub total_points_against: Option<i32>,
    pub longest_win_streak: Option<i32>,
    pub longest_lose_streak: Option<i32>,
    pub current_streak: Option<i32>,
    pub is_founding_season: Option<bool>,
}

impl PlayerPatch {
    pub fn apply_to(&self, player: &mut Player) {
        if let Some(v) = &self.name {
            player.name = v.clone();
        }
        if let Some(v) = &self.nickname {
            player.nickname = v.clone();
        }
        if let Some(v) = &self.tagline {
            player.tagline = Some(v.clone());
        }
        if let Some(v) = self.stat_defence {
            player.stat_defence = v;
        }
        if let Some(v) = self.stat_spin {
            player.stat_spin = v;
        }
        if let Some(v) = self.stat_serve {
            player.stat_serve = v;
        }
        if let Some(v) = self.stat_agility {
            player.stat_agility = v;
        }
        if let Some(v) = self.stat_physicality {
            player.stat_physicality = v;
        }
        if let Some(v) = self.stat_complainometer {
            player.stat_complainometer = v;
        }
        if let Some(v) = self.wins {
            player.wins = v;
        }
        if let Some(v) = self.losses {
            player.losses = v;
        }
        if let Some(v) = self.total_points_scored {
            player.total_points_scored = v;
        }
        if let Some(v) = self.total_points_against {
            player.total_points_against = v;
        }
        if let Some(v) = self.longest_win_streak {
            player.longest_win_streak = v;
        }
        if let Some(v) = self.longest_lose_streak {
            player.longest_lose_streak = v;
        }
        if let Some(v) = self.current_streak {
            player.current_streak = v;
        }
        if let Some(v) = self.is_founding_season {
            player.is_founding_season = v;
        }
    }
}
