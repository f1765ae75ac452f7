//! Single-elimination knockout bracket: construction of the full match DAG
//! with predecessor/successor wiring, and its deletion.

use crate::models::{
    EngineError, MatchDraft, MatchId, MatchKind, RoundEntry, Score, KNOCKOUT_POOL, TBD,
};
use crate::store::{DeleteCounts, Scope, Store};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// First-round input: either a seeded team list to pair in order, or
/// externally pre-paired matchups.
#[derive(Clone, Debug)]
pub enum BracketSeeds {
    /// Adjacent entries form the first-round matches; length must be a power
    /// of two. Entries may be the TBD sentinel.
    Teams(Vec<String>),
    /// Pre-paired (team1, team2) first-round matchups; the count must be one
    /// of 1, 2, 4, 8, 16.
    Matchups(Vec<(String, String)>),
}

/// Summary of a constructed bracket, including linkage verification counts.
#[derive(Clone, Debug, Serialize)]
pub struct BracketSummary {
    pub starting_round_id: u32,
    pub total_rounds: u32,
    pub matches_created: usize,
    pub rounds_created: usize,
    pub match_ids: Vec<MatchId>,
    pub matches_with_successors: usize,
    pub matches_with_predecessors: usize,
}

fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// "Finals", "Semi Finals", "Quarter Finals", then "Round of N"; a first
/// round of an unnamed size is just "Round 1".
fn round_name(round_num: u32, total_rounds: u32, num_teams: usize) -> String {
    if round_num == total_rounds {
        "Finals".to_string()
    } else if round_num + 1 == total_rounds {
        "Semi Finals".to_string()
    } else if round_num + 2 == total_rounds {
        "Quarter Finals".to_string()
    } else if round_num == 1 {
        match num_teams {
            16 => "Round of 16".to_string(),
            32 => "Round of 32".to_string(),
            _ => format!("Round {}", round_num),
        }
    } else {
        let remaining = num_teams >> (round_num - 1);
        format!("Round of {}", remaining)
    }
}

/// "F1", "SF{k}", "QF{k}", else "R{remaining}-M{k}".
fn match_name(round_num: u32, total_rounds: u32, match_num: usize, num_teams: usize) -> String {
    if round_num == total_rounds {
        "F1".to_string()
    } else if round_num + 1 == total_rounds {
        format!("SF{}", match_num)
    } else if round_num + 2 == total_rounds {
        format!("QF{}", match_num)
    } else {
        let remaining = num_teams >> (round_num - 1);
        format!("R{}-M{}", remaining, match_num)
    }
}

/// Builds the complete bracket after validating everything up front; nothing
/// is written unless every check passes. Knockout round ids start at
/// `current_round_id + 1`.
pub fn build_bracket(
    store: &mut dyn Store,
    current_round_id: u32,
    seeds: BracketSeeds,
) -> Result<BracketSummary, EngineError> {
    let first_round_pairs = validate_seeds(store, &seeds)?;
    if store.has_knockout() {
        return Err(EngineError::KnockoutAlreadyExists);
    }

    let num_teams = first_round_pairs.len() * 2;
    let total_rounds = num_teams.ilog2();
    let starting_round_id = current_round_id + 1;
    let tournament_id = store.tournament_id();

    // Round membership: real teams for round 1, TBD placeholders after.
    let mut rounds_created = 0;
    for round_num in 1..=total_rounds {
        let round_id = starting_round_id + round_num - 1;
        let name = round_name(round_num, total_rounds, num_teams);
        let teams_in_round = num_teams >> (round_num - 1);
        for slot in 0..teams_in_round {
            let team_id = if round_num == 1 {
                let (t1, t2) = &first_round_pairs[slot / 2];
                if slot % 2 == 0 { t1.clone() } else { t2.clone() }
            } else {
                TBD.to_string()
            };
            store.insert_round_entry(RoundEntry {
                tournament_id,
                round_id,
                team_id,
                pool: KNOCKOUT_POOL.to_string(),
                name: Some(name.clone()),
            });
            rounds_created += 1;
        }
    }

    // Matches: round 1 from the input pairs, placeholders beyond.
    let mut positions: HashMap<(u32, u32), MatchId> = HashMap::new();
    let mut match_ids = Vec::new();
    for (i, (t1, t2)) in first_round_pairs.iter().enumerate() {
        let draft = MatchDraft::knockout(
            match_name(1, total_rounds, i + 1, num_teams),
            starting_round_id.to_string(),
            t1,
            t2,
            1,
            i as u32,
        );
        let id = store.insert_match(draft);
        positions.insert((1, i as u32), id);
        match_ids.push(id);
    }
    for round_num in 2..=total_rounds {
        let round_id = starting_round_id + round_num - 1;
        let matches_in_round = num_teams >> round_num;
        for i in 0..matches_in_round {
            let draft = MatchDraft::knockout(
                match_name(round_num, total_rounds, i + 1, num_teams),
                round_id.to_string(),
                TBD,
                TBD,
                round_num,
                i as u32,
            );
            let id = store.insert_match(draft);
            positions.insert((round_num, i as u32), id);
            match_ids.push(id);
        }
    }

    // Wire linkage: (round, i) feeds (round + 1, i / 2); even slots become
    // predecessor_1, odd slots predecessor_2.
    for round_num in 1..total_rounds {
        let matches_in_round = num_teams >> round_num;
        for i in 0..matches_in_round as u32 {
            let current_id = positions[&(round_num, i)];
            let successor_id = positions[&(round_num + 1, i / 2)];

            let mut current = store
                .get_match(current_id)
                .ok_or_else(|| EngineError::Integrity(format!("match {} vanished", current_id)))?;
            current.successor = Some(successor_id);
            store.update_match(current)?;

            let mut successor = store.get_match(successor_id).ok_or_else(|| {
                EngineError::Integrity(format!("match {} vanished", successor_id))
            })?;
            if i % 2 == 0 {
                successor.predecessor_1 = Some(current_id);
            } else {
                successor.predecessor_2 = Some(current_id);
            }
            store.update_match(successor)?;
        }
    }

    // Zero scores for first-round matches whose both teams are real.
    for (i, (t1, t2)) in first_round_pairs.iter().enumerate() {
        if t1 != TBD && t2 != TBD {
            let id = positions[&(1, i as u32)];
            store.insert_score(Score::zero(id, t1, tournament_id));
            store.insert_score(Score::zero(id, t2, tournament_id));
        }
    }

    let knockout = store.matches(&Scope::pool(KNOCKOUT_POOL));
    let summary = BracketSummary {
        starting_round_id,
        total_rounds,
        matches_created: match_ids.len(),
        rounds_created,
        matches_with_successors: knockout.iter().filter(|m| m.successor.is_some()).count(),
        matches_with_predecessors: knockout
            .iter()
            .filter(|m| m.predecessor_1.is_some() || m.predecessor_2.is_some())
            .count(),
        match_ids,
    };

    log::info!(
        "knockout bracket built: {} rounds, {} matches, starting round {}",
        summary.total_rounds,
        summary.matches_created,
        summary.starting_round_id
    );

    Ok(summary)
}

fn validate_seeds(
    store: &dyn Store,
    seeds: &BracketSeeds,
) -> Result<Vec<(String, String)>, EngineError> {
    let pairs: Vec<(String, String)> = match seeds {
        BracketSeeds::Teams(team_ids) => {
            if !is_power_of_two(team_ids.len()) {
                return Err(EngineError::NotPowerOfTwo(team_ids.len()));
            }
            if team_ids.len() < 2 {
                return Err(EngineError::NotEnoughTeams);
            }
            team_ids
                .chunks_exact(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
                .collect()
        }
        BracketSeeds::Matchups(pairs) => {
            if !matches!(pairs.len(), 1 | 2 | 4 | 8 | 16) {
                return Err(EngineError::InvalidBracketSize(pairs.len()));
            }
            pairs.clone()
        }
    };

    let mut seen = HashSet::new();
    for (t1, t2) in &pairs {
        for id in [t1, t2] {
            if id == TBD {
                continue;
            }
            if !seen.insert(id.clone()) {
                return Err(EngineError::DuplicateTeamInBracket(id.clone()));
            }
            if store.team(id).is_none() {
                return Err(EngineError::TeamNotFound(id.clone()));
            }
        }
    }

    Ok(pairs)
}

/// Whether a bracket exists, with its match count and round ids.
#[derive(Clone, Debug, Serialize)]
pub struct BracketStatus {
    pub exists: bool,
    pub total_matches: usize,
    pub rounds: Vec<String>,
}

pub fn bracket_status(store: &dyn Store) -> BracketStatus {
    let matches = store.matches(&Scope::pool(KNOCKOUT_POOL));
    let matches: Vec<_> = matches
        .into_iter()
        .filter(|m| m.kind == MatchKind::Knockout)
        .collect();
    let mut rounds: Vec<String> = matches
        .iter()
        .map(|m| m.round_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    rounds.sort();
    BracketStatus {
        exists: !matches.is_empty(),
        total_matches: matches.len(),
        rounds,
    }
}

/// Deletes the bracket: scores, then matches, then round entries.
pub fn delete_bracket(store: &mut dyn Store) -> DeleteCounts {
    let counts = store.delete_knockout();
    log::info!(
        "knockout bracket deleted: {} scores, {} matches, {} round entries",
        counts.scores,
        counts.matches,
        counts.round_entries
    );
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_check() {
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(2));
        assert!(is_power_of_two(16));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(3));
        assert!(!is_power_of_two(12));
    }

    #[test]
    fn round_names_for_sixteen_teams() {
        assert_eq!(round_name(1, 4, 16), "Round of 16");
        assert_eq!(round_name(2, 4, 16), "Quarter Finals");
        assert_eq!(round_name(3, 4, 16), "Semi Finals");
        assert_eq!(round_name(4, 4, 16), "Finals");
    }

    #[test]
    fn match_names_for_eight_teams() {
        assert_eq!(match_name(1, 3, 2, 8), "QF2");
        assert_eq!(match_name(2, 3, 1, 8), "SF1");
        assert_eq!(match_name(3, 3, 1, 8), "F1");
    }

    #[test]
    fn first_round_of_unnamed_size_is_generic() {
        // 64 teams: round 1 has no predefined name.
        assert_eq!(round_name(1, 6, 64), "Round 1");
        assert_eq!(match_name(1, 6, 3, 64), "R64-M3");
        assert_eq!(round_name(2, 6, 64), "Round of 32");
    }
}
