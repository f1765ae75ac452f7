//! Round and pool membership: creation, CSV roster import, deletion.

use crate::models::{EngineError, RoundEntry};
use crate::store::{DeleteCounts, Store};
use serde::Serialize;
use std::collections::BTreeSet;

/// One pool of a newly created round.
#[derive(Clone, Debug, Serialize)]
pub struct CreatedPool {
    pub pool: String,
    pub teams: Vec<String>,
}

/// Result of a CSV roster import.
#[derive(Clone, Debug, Serialize)]
pub struct PoolImport {
    pub round_id: u32,
    pub pools: Vec<String>,
    pub teams: Vec<String>,
    /// Roster rows naming teams that don't exist in the tournament.
    pub skipped: Vec<String>,
}

fn pool_label(index: u32) -> String {
    char::from(b'A' + index as u8).to_string()
}

/// Creates a round by distributing teams evenly into labeled pools
/// ("A", "B", ...), in input order; the earliest pools absorb the remainder.
/// Conflict if the round already exists.
pub fn create_round(
    store: &mut dyn Store,
    round_id: u32,
    round_name: Option<&str>,
    number_of_pools: u32,
    team_ids: &[String],
) -> Result<Vec<CreatedPool>, EngineError> {
    if number_of_pools == 0 || number_of_pools > 26 {
        return Err(EngineError::InvalidPoolCount(number_of_pools));
    }
    if store.round_exists(round_id) {
        return Err(EngineError::RoundAlreadyExists(round_id));
    }
    for id in team_ids {
        if store.team(id).is_none() {
            return Err(EngineError::TeamNotFound(id.clone()));
        }
    }

    let tournament_id = store.tournament_id();
    let name = round_name
        .map(str::to_string)
        .unwrap_or_else(|| format!("Round {}", round_id));

    let per_pool = team_ids.len() / number_of_pools as usize;
    let remainder = team_ids.len() % number_of_pools as usize;

    let mut created = Vec::new();
    let mut index = 0;
    for pool_num in 0..number_of_pools {
        let size = per_pool + usize::from((pool_num as usize) < remainder);
        let pool = pool_label(pool_num);
        let teams: Vec<String> = team_ids[index..index + size].to_vec();
        index += size;
        for team_id in &teams {
            store.insert_round_entry(RoundEntry {
                tournament_id,
                round_id,
                team_id: team_id.clone(),
                pool: pool.clone(),
                name: Some(name.clone()),
            });
        }
        created.push(CreatedPool { pool, teams });
    }

    Ok(created)
}

/// Imports a pool roster from CSV with `Team ID` and `Pool` columns. Unknown
/// teams are skipped with a warning and reported, not fatal; an import that
/// resolves no teams at all is a validation error. Conflict if the round
/// already has entries.
pub fn import_pool_csv(
    store: &mut dyn Store,
    round_id: u32,
    round_name: Option<&str>,
    data: &[u8],
) -> Result<PoolImport, EngineError> {
    if store.round_exists(round_id) {
        return Err(EngineError::RoundAlreadyExists(round_id));
    }

    let mut reader = csv::Reader::from_reader(data);
    let headers = reader
        .headers()
        .map_err(|e| EngineError::Integrity(format!("unreadable CSV header: {}", e)))?
        .clone();
    let team_col = headers
        .iter()
        .position(|h| h.trim() == "Team ID")
        .ok_or(EngineError::MissingParameter("Team ID column"))?;
    let pool_col = headers
        .iter()
        .position(|h| h.trim() == "Pool")
        .ok_or(EngineError::MissingParameter("Pool column"))?;

    let mut rows: Vec<(String, String)> = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| EngineError::Integrity(format!("unreadable CSV row: {}", e)))?;
        let team_id = record.get(team_col).unwrap_or_default().trim().to_string();
        let pool = record.get(pool_col).unwrap_or_default().trim().to_string();
        if team_id.is_empty() || pool.is_empty() {
            continue;
        }
        rows.push((team_id, pool));
    }

    let tournament_id = store.tournament_id();
    let mut teams = Vec::new();
    let mut skipped = Vec::new();
    let mut pools = BTreeSet::new();
    for (team_id, pool) in rows {
        if store.team(&team_id).is_none() {
            log::warn!(
                "round {} roster: team {} not found, skipping",
                round_id,
                team_id
            );
            skipped.push(team_id);
            continue;
        }
        store.insert_round_entry(RoundEntry {
            tournament_id,
            round_id,
            team_id: team_id.clone(),
            pool: pool.clone(),
            name: round_name.map(str::to_string),
        });
        pools.insert(pool);
        teams.push(team_id);
    }

    if teams.is_empty() {
        return Err(EngineError::NotEnoughTeams);
    }

    Ok(PoolImport {
        round_id,
        pools: pools.into_iter().collect(),
        teams,
        skipped,
    })
}

/// Deletes a round (optionally one pool of it): scores, then matches, then
/// membership entries.
pub fn delete_round(store: &mut dyn Store, round_id: u32, pool: Option<&str>) -> DeleteCounts {
    let counts = store.delete_round(round_id, pool);
    log::info!(
        "round {}: deleted {} scores, {} matches, {} round entries",
        round_id,
        counts.scores,
        counts.matches,
        counts.round_entries
    );
    counts
}
