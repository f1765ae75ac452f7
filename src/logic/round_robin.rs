//! Pool play: round-robin fixture generation.

use crate::models::{EngineError, MatchDraft, MatchId, Score, Team};
use crate::store::{Scope, Store};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of generating fixtures for one pool.
#[derive(Clone, Debug, Serialize)]
pub struct GeneratedFixtures {
    pub round_id: u32,
    pub pool: String,
    pub match_ids: Vec<MatchId>,
    /// Team ids from the roster that don't exist in the tournament; skipped,
    /// not fatal.
    pub skipped: Vec<String>,
}

/// Generates all unique unordered pairings for one pool: every i < j pair of
/// the input list exactly once, each a pending match with two zero score rows.
///
/// Not idempotent: a second call for the same (round, pool) is a conflict and
/// writes nothing. Fewer than two resolvable teams yields zero matches,
/// which is not an error.
pub fn generate_fixtures(
    store: &mut dyn Store,
    round_id: u32,
    pool: &str,
    team_ids: &[String],
) -> Result<GeneratedFixtures, EngineError> {
    if !store.matches(&Scope::round_pool(round_id, pool)).is_empty() {
        return Err(EngineError::FixturesAlreadyExist {
            round_id,
            pool: pool.to_string(),
        });
    }

    let mut teams: Vec<Team> = Vec::new();
    let mut skipped = Vec::new();
    for id in team_ids {
        match store.team(id) {
            Some(team) => teams.push(team),
            None => {
                log::warn!(
                    "round {} pool {}: team {} not found, skipping",
                    round_id,
                    pool,
                    id
                );
                skipped.push(id.clone());
            }
        }
    }

    let tournament_id = store.tournament_id();
    let mut match_ids = Vec::new();
    for i in 0..teams.len() {
        for j in (i + 1)..teams.len() {
            let (t1, t2) = (&teams[i], &teams[j]);
            let name = format!("Round {} Pool {} - {} vs {}", round_id, pool, t1.name, t2.name);
            let mut draft =
                MatchDraft::round_robin(name, round_id.to_string(), pool, &t1.team_id, &t2.team_id);
            draft.court_order = Some(match_ids.len() as u32 + 1);
            let id = store.insert_match(draft);
            store.insert_score(Score::zero(id, &t1.team_id, tournament_id));
            store.insert_score(Score::zero(id, &t2.team_id, tournament_id));
            match_ids.push(id);
        }
    }

    log::info!(
        "round {} pool {}: generated {} fixtures ({} teams skipped)",
        round_id,
        pool,
        match_ids.len(),
        skipped.len()
    );

    Ok(GeneratedFixtures {
        round_id,
        pool: pool.to_string(),
        match_ids,
        skipped,
    })
}

/// Generates fixtures for every pool of a round from its membership roster,
/// pools in alphabetical order. Fails before any write if the round has no
/// entries, or on the first pool that already has fixtures.
pub fn generate_round_fixtures(
    store: &mut dyn Store,
    round_id: u32,
) -> Result<Vec<GeneratedFixtures>, EngineError> {
    let entries = store.round_entries(round_id);
    if entries.is_empty() {
        return Err(EngineError::RoundNotFound(round_id));
    }

    let mut pools: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for entry in entries {
        pools
            .entry(entry.pool.trim().to_string())
            .or_default()
            .push(entry.team_id);
    }

    for pool in pools.keys() {
        if !store.matches(&Scope::round_pool(round_id, pool.clone())).is_empty() {
            return Err(EngineError::FixturesAlreadyExist {
                round_id,
                pool: pool.clone(),
            });
        }
    }

    pools
        .into_iter()
        .map(|(pool, team_ids)| generate_fixtures(store, round_id, &pool, &team_ids))
        .collect()
}
