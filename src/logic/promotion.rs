//! Round promotion: select teams that advance and pair them into the next
//! round's matches.

use crate::logic::standings::{self, TeamStanding};
use crate::models::{EngineError, MatchDraft, MatchId, RoundEntry, Score, Team};
use crate::store::{Scope, Store};
use serde::{Deserialize, Serialize};

/// How promoted teams are selected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionType {
    /// Top N from each pool, combined by a matchmaking strategy.
    PoolBased,
    /// Top N across all pools, ranked on one leaderboard.
    LeaderboardBased,
    /// Caller supplies the pairs directly.
    Custom,
}

/// How pool-promoted teams are paired into matches.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchmakingType {
    /// Adjacent teams in the combined promoted list.
    Samepool,
    /// Pools processed pairwise; rank 1 of the first meets rank 2 of the
    /// second and vice versa.
    Nearpool,
    /// First half of the combined list against the reversed second half.
    Farpool,
}

/// Parameters for completing a round.
#[derive(Clone, Debug, Deserialize)]
pub struct PromotionRequest {
    pub promotion_type: PromotionType,
    pub teams_to_promote: Option<usize>,
    pub matchmaking_type: Option<MatchmakingType>,
    /// (team1_id, team2_id) pairs for custom promotion.
    pub custom_matches: Option<Vec<(String, String)>>,
    pub next_round_name: Option<String>,
}

/// The round created by a promotion.
#[derive(Clone, Debug, Serialize)]
pub struct CompletedRound {
    pub new_round_id: u32,
    pub round_name: String,
    pub match_ids: Vec<MatchId>,
}

/// Promotes teams out of `round_id` per the request and creates the next
/// round: membership entries under pool "A", one pending match per pair, two
/// zero score rows per match. The higher seed of each pair is always team1.
pub fn complete_round(
    store: &mut dyn Store,
    round_id: u32,
    req: &PromotionRequest,
) -> Result<CompletedRound, EngineError> {
    let pairs = match req.promotion_type {
        PromotionType::Custom => custom_pairs(store, req)?,
        PromotionType::LeaderboardBased => leaderboard_pairs(store, round_id, req)?,
        PromotionType::PoolBased => pool_pairs(store, round_id, req)?,
    };

    let new_round_id = round_id + 1;
    let round_name = req
        .next_round_name
        .clone()
        .unwrap_or_else(|| format!("Round {}", new_round_id));

    let tournament_id = store.tournament_id();
    let mut match_ids = Vec::new();
    for (team1, team2) in &pairs {
        for team in [team1, team2] {
            store.insert_round_entry(RoundEntry {
                tournament_id,
                round_id: new_round_id,
                team_id: team.team_id.clone(),
                pool: "A".to_string(),
                name: Some(round_name.clone()),
            });
        }
        let name = format!("{} - {} vs {}", round_name, team1.name, team2.name);
        let draft = MatchDraft::round_robin(
            name,
            new_round_id.to_string(),
            "A",
            &team1.team_id,
            &team2.team_id,
        );
        let id = store.insert_match(draft);
        store.insert_score(Score::zero(id, &team1.team_id, tournament_id));
        store.insert_score(Score::zero(id, &team2.team_id, tournament_id));
        match_ids.push(id);
    }

    log::info!(
        "round {} completed ({:?}): created round {} with {} matches",
        round_id,
        req.promotion_type,
        new_round_id,
        match_ids.len()
    );

    Ok(CompletedRound {
        new_round_id,
        round_name,
        match_ids,
    })
}

fn custom_pairs(
    store: &dyn Store,
    req: &PromotionRequest,
) -> Result<Vec<(Team, Team)>, EngineError> {
    let pairs = match &req.custom_matches {
        Some(pairs) if !pairs.is_empty() => pairs,
        _ => return Err(EngineError::MissingParameter("custom_matches")),
    };
    pairs
        .iter()
        .map(|(t1, t2)| {
            let team1 = store
                .team(t1)
                .ok_or_else(|| EngineError::TeamNotFound(t1.clone()))?;
            let team2 = store
                .team(t2)
                .ok_or_else(|| EngineError::TeamNotFound(t2.clone()))?;
            Ok((team1, team2))
        })
        .collect()
}

fn leaderboard_pairs(
    store: &dyn Store,
    round_id: u32,
    req: &PromotionRequest,
) -> Result<Vec<(Team, Team)>, EngineError> {
    let n = req
        .teams_to_promote
        .ok_or(EngineError::MissingParameter("teams_to_promote"))?;

    let ranked = standings::standings(store, &Scope::round(round_id));
    let promoted = resolve(store, ranked.into_iter().take(n))?;
    if promoted.len() < 2 {
        return Err(EngineError::NotEnoughTeams);
    }
    Ok(adjacent_pairs(&promoted))
}

fn pool_pairs(
    store: &dyn Store,
    round_id: u32,
    req: &PromotionRequest,
) -> Result<Vec<(Team, Team)>, EngineError> {
    let n = req
        .teams_to_promote
        .ok_or(EngineError::MissingParameter("teams_to_promote"))?;
    let matchmaking = req
        .matchmaking_type
        .ok_or(EngineError::MissingParameter("matchmaking_type"))?;

    let by_pool = standings::pool_standings(store, &Scope::round(round_id));
    if by_pool.is_empty() {
        return Err(EngineError::NotEnoughTeams);
    }
    let num_pools = by_pool.len();
    let per_pool = n / num_pools;

    // Pools come back alphabetically, so the combined list is deterministic.
    let mut promoted = Vec::new();
    for ranked in by_pool.into_values() {
        promoted.extend(resolve(store, ranked.into_iter().take(per_pool))?);
    }
    if promoted.len() < 2 {
        return Err(EngineError::NotEnoughTeams);
    }

    match matchmaking {
        MatchmakingType::Samepool => Ok(adjacent_pairs(&promoted)),
        MatchmakingType::Farpool => Ok(farpool_pairs(&promoted)),
        MatchmakingType::Nearpool => nearpool_pairs(&promoted, per_pool),
    }
}

fn resolve(
    store: &dyn Store,
    rows: impl Iterator<Item = TeamStanding>,
) -> Result<Vec<Team>, EngineError> {
    rows.map(|row| {
        store
            .team(&row.team_id)
            .ok_or(EngineError::TeamNotFound(row.team_id))
    })
    .collect()
}

/// Rank 1 vs 2, 3 vs 4, ...; a trailing unpaired team is left out.
fn adjacent_pairs(teams: &[Team]) -> Vec<(Team, Team)> {
    teams
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

/// First half of the combined list against the reversed second half: the
/// highest remaining pool meets the lowest remaining pool.
fn farpool_pairs(teams: &[Team]) -> Vec<(Team, Team)> {
    let half = teams.len() / 2;
    let first = &teams[..half];
    let second: Vec<&Team> = teams[half..].iter().rev().collect();
    first
        .iter()
        .zip(second)
        .map(|(a, b)| (a.clone(), b.clone()))
        .collect()
}

/// Pools pairwise (1st&2nd, 3rd&4th, ...): within each pair, rank 1 of the
/// first pool meets rank 2 of the second and rank 2 meets rank 1. An odd
/// trailing pool is left unprocessed.
fn nearpool_pairs(teams: &[Team], per_pool: usize) -> Result<Vec<(Team, Team)>, EngineError> {
    if per_pool != 2 {
        return Err(EngineError::NearpoolNeedsTwoPerPool(per_pool));
    }
    let mut pairs = Vec::new();
    for pool_pair in teams.chunks_exact(4) {
        let (p1, p2) = pool_pair.split_at(2);
        pairs.push((p1[0].clone(), p2[1].clone()));
        pairs.push((p1[1].clone(), p2[0].clone()));
    }
    Ok(pairs)
}
