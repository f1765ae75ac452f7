//! Tournament hierarchy (super-tournament, season, tournament) and engine errors.

use crate::models::game::MatchId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a tournament.
pub type TournamentId = i64;

/// Top of the hierarchy: a named competition grouping seasons.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SuperTournament {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A season within a super-tournament, grouping tournaments.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    pub name: String,
    pub super_tournament_id: i64,
    pub created_at: DateTime<Utc>,
}

/// One competition: teams, pool rounds, and at most one knockout bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Free-form type string, e.g. "elimination".
    pub tournament_type: String,
    pub num_courts: u32,
    pub season_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Coarse error class, used by the transport layer to pick a status code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad input shape; rejected before any write.
    Validation,
    /// Unknown tournament/team/match/pool; rejected before any write.
    NotFound,
    /// State already exists; safe to retry after the caller resolves it.
    Conflict,
    /// Invariant violated mid-operation; nothing partially persists.
    Integrity,
}

/// Errors that can occur during engine operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    TournamentNotFound(TournamentId),
    TeamNotFound(String),
    MatchNotFound(MatchId),
    /// Round has no membership entries to work from.
    RoundNotFound(u32),
    /// Pool fixtures were already generated; delete them before regenerating.
    FixturesAlreadyExist { round_id: u32, pool: String },
    /// A round with this id already exists in the tournament.
    RoundAlreadyExists(u32),
    /// A knockout bracket already exists; delete it before building another.
    KnockoutAlreadyExists,
    /// Knockout team count must be a power of two.
    NotPowerOfTwo(usize),
    /// Knockout-from-matches accepts only 1, 2, 4, 8, or 16 first-round matches.
    InvalidBracketSize(usize),
    /// A team appears more than once in the first round.
    DuplicateTeamInBracket(String),
    /// Fewer than two eligible teams for match creation.
    NotEnoughTeams,
    /// Nearpool matchmaking needs exactly two promoted teams per pool.
    NearpoolNeedsTwoPerPool(usize),
    /// A required request field is missing for the chosen promotion type.
    MissingParameter(&'static str),
    /// Scores cannot be recorded while a participant slot is still TBD.
    ParticipantsNotDetermined(MatchId),
    /// Walkover winner must be one of the match participants.
    WalkoverWinnerNotInMatch(String),
    /// Score must be formatted "{team1 score}-{team2 score}".
    InvalidScoreFormat(String),
    /// Pool count outside the supported range.
    InvalidPoolCount(u32),
    /// Broken bracket linkage or similar mid-operation failure.
    Integrity(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        use EngineError::*;
        match self {
            TournamentNotFound(_) | TeamNotFound(_) | MatchNotFound(_) | RoundNotFound(_) => {
                ErrorKind::NotFound
            }
            FixturesAlreadyExist { .. } | RoundAlreadyExists(_) | KnockoutAlreadyExists => {
                ErrorKind::Conflict
            }
            NotPowerOfTwo(_)
            | InvalidBracketSize(_)
            | DuplicateTeamInBracket(_)
            | NotEnoughTeams
            | NearpoolNeedsTwoPerPool(_)
            | MissingParameter(_)
            | ParticipantsNotDetermined(_)
            | WalkoverWinnerNotInMatch(_)
            | InvalidScoreFormat(_)
            | InvalidPoolCount(_) => ErrorKind::Validation,
            Integrity(_) => ErrorKind::Integrity,
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
            EngineError::TeamNotFound(id) => write!(f, "Team {} not found in this tournament", id),
            EngineError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            EngineError::RoundNotFound(id) => write!(f, "Round {} has no teams assigned", id),
            EngineError::FixturesAlreadyExist { round_id, pool } => {
                write!(
                    f,
                    "Fixtures already exist for round {} pool {}. Delete them first",
                    round_id, pool
                )
            }
            EngineError::RoundAlreadyExists(id) => {
                write!(f, "Round {} already exists in this tournament", id)
            }
            EngineError::KnockoutAlreadyExists => {
                write!(
                    f,
                    "Knockout bracket already exists for this tournament. Delete it first"
                )
            }
            EngineError::NotPowerOfTwo(n) => {
                write!(f, "Number of teams must be a power of 2. Got {} teams", n)
            }
            EngineError::InvalidBracketSize(n) => {
                write!(
                    f,
                    "Invalid number of matches. Must be one of: 1, 2, 4, 8, 16. Got {} matches",
                    n
                )
            }
            EngineError::DuplicateTeamInBracket(id) => {
                write!(f, "Team {} appears more than once in the first round", id)
            }
            EngineError::NotEnoughTeams => write!(f, "Not enough teams to create matches"),
            EngineError::NearpoolNeedsTwoPerPool(n) => {
                write!(
                    f,
                    "Nearpool matchmaking requires exactly 2 promoted teams per pool, got {}",
                    n
                )
            }
            EngineError::MissingParameter(field) => {
                write!(f, "Missing required field: {}", field)
            }
            EngineError::ParticipantsNotDetermined(id) => {
                write!(f, "Match {} participants are not yet determined", id)
            }
            EngineError::WalkoverWinnerNotInMatch(id) => {
                write!(f, "Walkover winner {} is not a participant of this match", id)
            }
            EngineError::InvalidScoreFormat(s) => {
                write!(
                    f,
                    "Score format is invalid: \"{}\". Use \"{{team1 score}}-{{team2 score}}\"",
                    s
                )
            }
            EngineError::InvalidPoolCount(n) => {
                write!(f, "number_of_pools must be between 1 and 26, got {}", n)
            }
            EngineError::Integrity(msg) => write!(f, "Integrity error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
