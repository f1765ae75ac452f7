//! Data structures for the tournament engine: hierarchy, teams, matches, scores.

mod game;
mod team;
mod tournament;

pub use game::{
    Match, MatchDraft, MatchId, MatchKind, MatchStatus, Outcome, RoundEntry, Score, KNOCKOUT_POOL,
    TBD,
};
pub use team::{Player, PlayerId, SkillLevel, Team};
pub use tournament::{EngineError, ErrorKind, Season, SuperTournament, Tournament, TournamentId};
