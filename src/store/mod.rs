//! Storage port: the persistence interface the engine components are written
//! against. Each operation takes the port explicitly; no ambient shared state.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
    EngineError, Match, MatchDraft, MatchId, PlayerId, RoundEntry, Score, Team, TournamentId,
};
use serde::Serialize;

/// Filter for match reads: tournament-wide, one round, one pool, or both.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    pub round_id: Option<String>,
    pub pool: Option<String>,
}

impl Scope {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn round(round_id: u32) -> Self {
        Self {
            round_id: Some(round_id.to_string()),
            ..Self::default()
        }
    }

    pub fn pool(pool: impl Into<String>) -> Self {
        Self {
            pool: Some(pool.into()),
            ..Self::default()
        }
    }

    pub fn round_pool(round_id: u32, pool: impl Into<String>) -> Self {
        Self {
            round_id: Some(round_id.to_string()),
            pool: Some(pool.into()),
        }
    }

    pub fn matches(&self, m: &Match) -> bool {
        self.round_id.as_ref().map_or(true, |r| &m.round_id == r)
            && self.pool.as_ref().map_or(true, |p| &m.pool == p)
    }
}

/// Rows removed by a cascading delete, in deletion order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DeleteCounts {
    pub scores: usize,
    pub matches: usize,
    pub round_entries: usize,
}

/// Persistence operations the engine needs, scoped to one tournament.
///
/// Implementations must apply each engine operation as one atomic unit of
/// work; the in-memory store relies on the caller holding an exclusive lock
/// for the duration of the operation.
pub trait Store {
    fn tournament_id(&self) -> TournamentId;

    // Teams
    fn team(&self, team_id: &str) -> Option<Team>;
    fn teams(&self) -> Vec<Team>;
    /// Allocates the next sequential team id from the store's counter.
    fn insert_team(
        &mut self,
        name: &str,
        player1: Option<PlayerId>,
        player2: Option<PlayerId>,
    ) -> Team;
    fn set_team_checked_in(&mut self, team_id: &str, checked_in: bool)
        -> Result<Team, EngineError>;

    // Matches
    fn insert_match(&mut self, draft: MatchDraft) -> MatchId;
    fn get_match(&self, id: MatchId) -> Option<Match>;
    /// Replaces the stored match with the same id.
    fn update_match(&mut self, updated: Match) -> Result<(), EngineError>;
    /// Matches in scope, in id order.
    fn matches(&self, scope: &Scope) -> Vec<Match>;
    /// True when any knockout match exists for this tournament.
    fn has_knockout(&self) -> bool;

    // Scores
    fn insert_score(&mut self, score: Score);
    fn upsert_score(&mut self, match_id: MatchId, team_id: &str, value: u32);
    fn scores_for_match(&self, match_id: MatchId) -> Vec<Score>;
    fn scores_for_matches(&self, match_ids: &[MatchId]) -> Vec<Score>;

    // Round membership
    fn insert_round_entry(&mut self, entry: RoundEntry);
    fn round_entries(&self, round_id: u32) -> Vec<RoundEntry>;
    fn round_exists(&self, round_id: u32) -> bool;

    // Cascading deletes: scores, then matches, then round entries.
    fn delete_round(&mut self, round_id: u32, pool: Option<&str>) -> DeleteCounts;
    fn delete_knockout(&mut self) -> DeleteCounts;
}
