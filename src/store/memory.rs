//! In-memory store: one tournament's teams, matches, scores, and round
//! membership behind the storage port. The web layer keeps one per tournament
//! inside a shared `RwLock`, so every engine operation runs serialized.

use crate::models::{
    EngineError, Match, MatchDraft, MatchId, MatchKind, PlayerId, RoundEntry, Score, Team,
    TournamentId,
};
use crate::store::{DeleteCounts, Scope, Store};
use serde::{Deserialize, Serialize};

/// Vec-backed store. Match ids come from a monotonic counter, team ids from a
/// per-tournament sequence (`"{tournament_id}_{seq}"`); both are allocated
/// under the same exclusive lock as the writes that use them, so ids never
/// collide under concurrent requests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryStore {
    tournament_id: TournamentId,
    next_match_id: MatchId,
    next_team_seq: u32,
    teams: Vec<Team>,
    matches: Vec<Match>,
    scores: Vec<Score>,
    round_entries: Vec<RoundEntry>,
}

impl MemoryStore {
    pub fn new(tournament_id: TournamentId) -> Self {
        Self {
            tournament_id,
            next_match_id: 1,
            next_team_seq: 1,
            teams: Vec::new(),
            matches: Vec::new(),
            scores: Vec::new(),
            round_entries: Vec::new(),
        }
    }

    /// All matches, in id order. For listings; filtered reads go through
    /// [`Store::matches`].
    pub fn all_matches(&self) -> &[Match] {
        &self.matches
    }
}

impl Store for MemoryStore {
    fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    fn team(&self, team_id: &str) -> Option<Team> {
        self.teams.iter().find(|t| t.team_id == team_id).cloned()
    }

    fn teams(&self) -> Vec<Team> {
        self.teams.clone()
    }

    fn insert_team(
        &mut self,
        name: &str,
        player1: Option<PlayerId>,
        player2: Option<PlayerId>,
    ) -> Team {
        let team_id = format!("{}_{}", self.tournament_id, self.next_team_seq);
        self.next_team_seq += 1;
        let mut team = Team::new(team_id, name, self.tournament_id);
        team.player1 = player1;
        team.player2 = player2;
        self.teams.push(team.clone());
        team
    }

    fn set_team_checked_in(
        &mut self,
        team_id: &str,
        checked_in: bool,
    ) -> Result<Team, EngineError> {
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.team_id == team_id)
            .ok_or_else(|| EngineError::TeamNotFound(team_id.to_string()))?;
        team.checked_in = checked_in;
        Ok(team.clone())
    }

    fn insert_match(&mut self, draft: MatchDraft) -> MatchId {
        let id = self.next_match_id;
        self.next_match_id += 1;
        self.matches.push(draft.into_match(id, self.tournament_id));
        id
    }

    fn get_match(&self, id: MatchId) -> Option<Match> {
        self.matches.iter().find(|m| m.id == id).cloned()
    }

    fn update_match(&mut self, updated: Match) -> Result<(), EngineError> {
        let slot = self
            .matches
            .iter_mut()
            .find(|m| m.id == updated.id)
            .ok_or(EngineError::MatchNotFound(updated.id))?;
        *slot = updated;
        Ok(())
    }

    fn matches(&self, scope: &Scope) -> Vec<Match> {
        self.matches
            .iter()
            .filter(|m| scope.matches(m))
            .cloned()
            .collect()
    }

    fn has_knockout(&self) -> bool {
        self.matches.iter().any(|m| m.kind.is_knockout())
    }

    fn insert_score(&mut self, score: Score) {
        self.scores.push(score);
    }

    fn upsert_score(&mut self, match_id: MatchId, team_id: &str, value: u32) {
        match self
            .scores
            .iter_mut()
            .find(|s| s.match_id == match_id && s.team_id == team_id)
        {
            Some(row) => row.score = value,
            None => {
                let mut row = Score::zero(match_id, team_id, self.tournament_id);
                row.score = value;
                self.scores.push(row);
            }
        }
    }

    fn scores_for_match(&self, match_id: MatchId) -> Vec<Score> {
        self.scores
            .iter()
            .filter(|s| s.match_id == match_id)
            .cloned()
            .collect()
    }

    fn scores_for_matches(&self, match_ids: &[MatchId]) -> Vec<Score> {
        self.scores
            .iter()
            .filter(|s| match_ids.contains(&s.match_id))
            .cloned()
            .collect()
    }

    fn insert_round_entry(&mut self, entry: RoundEntry) {
        self.round_entries.push(entry);
    }

    fn round_entries(&self, round_id: u32) -> Vec<RoundEntry> {
        self.round_entries
            .iter()
            .filter(|e| e.round_id == round_id)
            .cloned()
            .collect()
    }

    fn round_exists(&self, round_id: u32) -> bool {
        self.round_entries.iter().any(|e| e.round_id == round_id)
    }

    fn delete_round(&mut self, round_id: u32, pool: Option<&str>) -> DeleteCounts {
        let round_str = round_id.to_string();
        let doomed: Vec<MatchId> = self
            .matches
            .iter()
            .filter(|m| {
                m.round_id == round_str && pool.map_or(true, |p| m.pool == p)
            })
            .map(|m| m.id)
            .collect();

        let before = self.scores.len();
        self.scores.retain(|s| !doomed.contains(&s.match_id));
        let scores = before - self.scores.len();

        self.matches.retain(|m| !doomed.contains(&m.id));

        let before = self.round_entries.len();
        self.round_entries
            .retain(|e| !(e.round_id == round_id && pool.map_or(true, |p| e.pool == p)));
        let round_entries = before - self.round_entries.len();

        DeleteCounts {
            scores,
            matches: doomed.len(),
            round_entries,
        }
    }

    fn delete_knockout(&mut self) -> DeleteCounts {
        let doomed: Vec<MatchId> = self
            .matches
            .iter()
            .filter(|m| m.kind == MatchKind::Knockout)
            .map(|m| m.id)
            .collect();

        let before = self.scores.len();
        self.scores.retain(|s| !doomed.contains(&s.match_id));
        let scores = before - self.scores.len();

        self.matches.retain(|m| m.kind != MatchKind::Knockout);

        let before = self.round_entries.len();
        self.round_entries
            .retain(|e| e.pool != crate::models::KNOCKOUT_POOL);
        let round_entries = before - self.round_entries.len();

        DeleteCounts {
            scores,
            matches: doomed.len(),
            round_entries,
        }
    }
}
