//! Standings: per-team aggregate statistics and ranking within a scope.

use crate::models::Match;
use crate::store::{Scope, Store};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Aggregate statistics for one team within the requested scope.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TeamStanding {
    pub team_id: String,
    pub name: String,
    pub matches_played: usize,
    pub matches_won: usize,
    pub matches_lost: usize,
    pub points_scored: u32,
    pub points_lost: u32,
    pub points_difference: i64,
    /// Ranking score: 2 points per win. Not the same as `points_scored`.
    pub total_scores: u32,
}

#[derive(Default)]
struct RawStats {
    played: HashSet<i64>,
    won: usize,
    scored: u32,
    lost: u32,
}

/// Tournament-wide (or round/pool-scoped) standings, ranked. Empty scope
/// yields an empty list, never an error.
pub fn standings(store: &dyn Store, scope: &Scope) -> Vec<TeamStanding> {
    let matches = store.matches(scope);
    let match_ids: Vec<i64> = matches.iter().map(|m| m.id).collect();
    let scores = store.scores_for_matches(&match_ids);

    let mut order: Vec<String> = Vec::new();
    let mut stats: HashMap<String, RawStats> = HashMap::new();

    for m in &matches {
        accumulate(m, &scores, &mut order, &mut stats);
    }

    let rows = order
        .into_iter()
        .map(|team_id| into_standing(store, team_id, &stats))
        .collect();
    rank(rows)
}

/// Standings grouped by pool, each pool ranked independently. Pools come back
/// in alphabetical order.
pub fn pool_standings(store: &dyn Store, scope: &Scope) -> BTreeMap<String, Vec<TeamStanding>> {
    let matches = store.matches(scope);
    let match_ids: Vec<i64> = matches.iter().map(|m| m.id).collect();
    let scores = store.scores_for_matches(&match_ids);

    let mut per_pool: BTreeMap<String, (Vec<String>, HashMap<String, RawStats>)> = BTreeMap::new();
    for m in &matches {
        let pool = m.pool.trim().to_string();
        let (order, stats) = per_pool.entry(pool).or_default();
        accumulate(m, &scores, order, stats);
    }

    per_pool
        .into_iter()
        .map(|(pool, (order, stats))| {
            let rows = order
                .into_iter()
                .map(|team_id| into_standing(store, team_id, &stats))
                .collect();
            (pool, rank(rows))
        })
        .collect()
}

/// Folds one match into the running stats. A match counts only when it has
/// exactly two score rows and the scores differ; a draw (including a 0-0 row
/// pair, which is indistinguishable from "not yet played") contributes
/// nothing to any column.
fn accumulate(
    m: &Match,
    scores: &[crate::models::Score],
    order: &mut Vec<String>,
    stats: &mut HashMap<String, RawStats>,
) {
    if !m.slots_filled() {
        return;
    }
    let rows: Vec<_> = scores.iter().filter(|s| s.match_id == m.id).collect();
    if rows.len() != 2 {
        return;
    }
    let team1 = m.team1_id.as_deref().unwrap_or_default();
    let (s1, s2) = match (
        rows.iter().find(|s| s.team_id == team1),
        rows.iter().find(|s| s.team_id != team1),
    ) {
        (Some(a), Some(b)) => (a.score, b.score),
        _ => return,
    };
    if s1 == s2 {
        return;
    }
    let team2 = rows
        .iter()
        .find(|s| s.team_id != team1)
        .map(|s| s.team_id.clone())
        .unwrap_or_default();

    for (team, own, opp) in [(team1.to_string(), s1, s2), (team2, s2, s1)] {
        if !stats.contains_key(&team) {
            order.push(team.clone());
        }
        let entry = stats.entry(team).or_default();
        entry.scored += own;
        entry.lost += opp;
        entry.played.insert(m.id);
        if own > opp {
            entry.won += 1;
        }
    }
}

fn into_standing(
    store: &dyn Store,
    team_id: String,
    stats: &HashMap<String, RawStats>,
) -> TeamStanding {
    let raw = &stats[&team_id];
    let name = store
        .team(&team_id)
        .map(|t| t.name)
        .unwrap_or_else(|| "Unknown".to_string());
    let played = raw.played.len();
    TeamStanding {
        name,
        matches_played: played,
        matches_won: raw.won,
        matches_lost: played - raw.won,
        points_scored: raw.scored,
        points_lost: raw.lost,
        points_difference: i64::from(raw.scored) - i64::from(raw.lost),
        total_scores: raw.won as u32 * 2,
        team_id,
    }
}

/// Descending stable sort on (total_scores, points_difference); teams tied on
/// both keys keep encounter order.
pub fn rank(mut rows: Vec<TeamStanding>) -> Vec<TeamStanding> {
    rows.sort_by(|a, b| {
        (b.total_scores, b.points_difference).cmp(&(a.total_scores, a.points_difference))
    });
    rows
}
