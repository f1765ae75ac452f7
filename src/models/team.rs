//! Team and Player data structures.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in team slots and lookups).
pub type PlayerId = Uuid;

/// Self-reported skill bracket, captured at registration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

/// A registered player, scoped to a super-tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub uuid: PlayerId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub gender: String,
    pub age: u32,
    pub phone_number: String,
    pub email: String,
    pub skill_level: SkillLevel,
    /// External rating id, if the player has one.
    pub dupr_id: Option<String>,
    pub super_tournament_id: i64,
    pub checked_in: bool,
}

impl Player {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// A team: one or two player slots, belongs to exactly one tournament.
/// Never deleted once matches reference it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique within the tournament, allocated sequentially by the store.
    pub team_id: String,
    pub name: String,
    pub points: i64,
    pub checked_in: bool,
    pub tournament_id: TournamentId,
    pub player1: Option<PlayerId>,
    pub player2: Option<PlayerId>,
}

impl Team {
    pub fn new(
        team_id: impl Into<String>,
        name: impl Into<String>,
        tournament_id: TournamentId,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            name: name.into(),
            points: 0,
            checked_in: false,
            tournament_id,
            player1: None,
            player2: None,
        }
    }
}
