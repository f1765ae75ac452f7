//! Match, Score, and RoundEntry: the shared data model of all engine components.

use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a match (assigned by the store; authoritative ordering key).
pub type MatchId = i64;

/// Sentinel participant for knockout slots whose team is not yet determined.
pub const TBD: &str = "TBD";

/// Reserved pool label written on every knockout match and round entry.
pub const KNOCKOUT_POOL: &str = "knockout";

/// What kind of bracket stage a match belongs to. Dispatch happens on this tag,
/// never on the pool label.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    RoundRobin,
    Knockout,
}

impl MatchKind {
    pub fn is_knockout(self) -> bool {
        self == MatchKind::Knockout
    }
}

/// Progress of a match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    #[default]
    Pending,
    OnGoing,
    Completed,
}

/// How a final result was reached.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Normal,
    /// Winner assigned without a contested score.
    Walkover,
}

/// A match between two teams. Bracket linkage fields are set only for knockout
/// matches and never change after creation; only status/score/winner mutate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub match_name: String,
    /// Free-form round identifier; round-robin conventionally "1", later rounds
    /// numeric strings. Distinct from `round_number`.
    pub round_id: String,
    pub pool: String,
    pub kind: MatchKind,
    /// `Some(TBD)` for an undetermined knockout slot, `None` for a bye.
    pub team1_id: Option<String>,
    pub team2_id: Option<String>,
    pub winner_team_id: Option<String>,
    pub is_final: bool,
    pub outcome: Outcome,
    pub status: MatchStatus,
    pub court_number: Option<u32>,
    pub court_order: Option<u32>,
    /// Id of the match feeding this match's team1 slot (even bracket position).
    pub predecessor_1: Option<MatchId>,
    /// Id of the match feeding this match's team2 slot (odd bracket position).
    pub predecessor_2: Option<MatchId>,
    /// Match this match's winner advances to.
    pub successor: Option<MatchId>,
    /// 0-based slot index within the knockout round.
    pub bracket_position: Option<u32>,
    /// 1-based knockout round counter, independent of `round_id`.
    pub round_number: Option<u32>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// True when a participant slot holds a real team (not empty, not TBD).
    pub fn slot_is_real(slot: &Option<String>) -> bool {
        matches!(slot.as_deref(), Some(id) if id != TBD)
    }

    /// Both participant slots hold real teams.
    pub fn slots_filled(&self) -> bool {
        Self::slot_is_real(&self.team1_id) && Self::slot_is_real(&self.team2_id)
    }
}

/// A match minus its id; the store assigns the id on insert.
#[derive(Clone, Debug)]
pub struct MatchDraft {
    pub match_name: String,
    pub round_id: String,
    pub pool: String,
    pub kind: MatchKind,
    pub team1_id: Option<String>,
    pub team2_id: Option<String>,
    pub court_number: Option<u32>,
    pub court_order: Option<u32>,
    pub bracket_position: Option<u32>,
    pub round_number: Option<u32>,
}

impl MatchDraft {
    /// Draft for a round-robin fixture between two known teams.
    pub fn round_robin(
        match_name: impl Into<String>,
        round_id: impl Into<String>,
        pool: impl Into<String>,
        team1_id: impl Into<String>,
        team2_id: impl Into<String>,
    ) -> Self {
        Self {
            match_name: match_name.into(),
            round_id: round_id.into(),
            pool: pool.into(),
            kind: MatchKind::RoundRobin,
            team1_id: Some(team1_id.into()),
            team2_id: Some(team2_id.into()),
            court_number: None,
            court_order: None,
            bracket_position: None,
            round_number: None,
        }
    }

    /// Draft for a knockout match; participants may be the TBD sentinel.
    pub fn knockout(
        match_name: impl Into<String>,
        round_id: impl Into<String>,
        team1_id: impl Into<String>,
        team2_id: impl Into<String>,
        round_number: u32,
        bracket_position: u32,
    ) -> Self {
        Self {
            match_name: match_name.into(),
            round_id: round_id.into(),
            pool: KNOCKOUT_POOL.to_string(),
            kind: MatchKind::Knockout,
            team1_id: Some(team1_id.into()),
            team2_id: Some(team2_id.into()),
            court_number: None,
            court_order: None,
            bracket_position: Some(bracket_position),
            round_number: Some(round_number),
        }
    }

    pub fn into_match(self, id: MatchId, tournament_id: TournamentId) -> Match {
        Match {
            id,
            tournament_id,
            match_name: self.match_name,
            round_id: self.round_id,
            pool: self.pool,
            kind: self.kind,
            team1_id: self.team1_id,
            team2_id: self.team2_id,
            winner_team_id: None,
            is_final: false,
            outcome: Outcome::Normal,
            status: MatchStatus::Pending,
            court_number: self.court_number,
            court_order: self.court_order,
            predecessor_1: None,
            predecessor_2: None,
            successor: None,
            bracket_position: self.bracket_position,
            round_number: self.round_number,
            updated_at: Utc::now(),
        }
    }
}

/// One score row per (match, team) pair; at most two per match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub match_id: MatchId,
    pub team_id: String,
    pub score: u32,
    /// Secondary ranking weight, default 0.
    pub points: u32,
    pub tournament_id: TournamentId,
}

impl Score {
    /// Zero-initialized row, created as soon as both match slots are known.
    pub fn zero(match_id: MatchId, team_id: impl Into<String>, tournament_id: TournamentId) -> Self {
        Self {
            match_id,
            team_id: team_id.into(),
            score: 0,
            points: 0,
            tournament_id,
        }
    }
}

/// Pool assignment: membership of a team in a (round, pool). Not a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundEntry {
    pub tournament_id: TournamentId,
    pub round_id: u32,
    /// `TBD` for placeholder entries of not-yet-decided knockout rounds.
    pub team_id: String,
    pub pool: String,
    pub name: Option<String>,
}
