//! Score updates and finalization: winner determination and single-hop
//! propagation into the successor knockout match.

use crate::models::{EngineError, Match, MatchStatus, Outcome, Score};
use crate::notify::{ScoreEvent, ScoreNotifier};
use crate::store::Store;
use chrono::Utc;
use serde::Serialize;

/// A score update; `walkover_winner` assigns the winner directly and implies
/// finality.
#[derive(Clone, Debug)]
pub struct ScoreUpdateRequest {
    pub match_id: i64,
    pub team1_score: u32,
    pub team2_score: u32,
    pub is_final: bool,
    pub walkover_winner: Option<String>,
}

/// The match state after an update.
#[derive(Clone, Debug, Serialize)]
pub struct ScoreUpdate {
    pub match_id: i64,
    pub tournament_id: i64,
    pub team1_id: Option<String>,
    pub team2_id: Option<String>,
    pub team1_score: u32,
    pub team2_score: u32,
    pub is_final: bool,
    pub winner_team_id: Option<String>,
    pub outcome: Outcome,
}

/// Parses the wire score format `"{team1 score}-{team2 score}"`.
pub fn parse_score(input: &str) -> Result<(u32, u32), EngineError> {
    let invalid = || EngineError::InvalidScoreFormat(input.to_string());
    let (a, b) = input.split_once('-').ok_or_else(invalid)?;
    let team1 = a.trim().parse().map_err(|_| invalid())?;
    let team2 = b.trim().parse().map_err(|_| invalid())?;
    Ok((team1, team2))
}

/// Upserts both score rows; when final, determines the winner (strictly
/// greater score; equal is a draw with no winner) and propagates it one hop
/// into the successor match. Emits one event per update.
pub fn update_score(
    store: &mut dyn Store,
    notifier: &dyn ScoreNotifier,
    req: &ScoreUpdateRequest,
) -> Result<ScoreUpdate, EngineError> {
    let mut game = store
        .get_match(req.match_id)
        .ok_or(EngineError::MatchNotFound(req.match_id))?;
    if !game.slots_filled() {
        return Err(EngineError::ParticipantsNotDetermined(game.id));
    }
    let team1 = game.team1_id.clone().unwrap_or_default();
    let team2 = game.team2_id.clone().unwrap_or_default();

    if let Some(winner) = &req.walkover_winner {
        if winner != &team1 && winner != &team2 {
            return Err(EngineError::WalkoverWinnerNotInMatch(winner.clone()));
        }
    }

    store.upsert_score(req.match_id, &team1, req.team1_score);
    store.upsert_score(req.match_id, &team2, req.team2_score);

    let finalize = req.is_final || req.walkover_winner.is_some();
    if finalize {
        game.is_final = true;
        game.status = MatchStatus::Completed;
        game.winner_team_id = match &req.walkover_winner {
            Some(winner) => {
                game.outcome = Outcome::Walkover;
                Some(winner.clone())
            }
            None if req.team1_score > req.team2_score => Some(team1.clone()),
            None if req.team2_score > req.team1_score => Some(team2.clone()),
            None => None, // draw
        };
    } else {
        game.status = MatchStatus::OnGoing;
    }
    game.updated_at = Utc::now();
    store.update_match(game.clone())?;

    if finalize {
        if let Some(successor_id) = game.successor {
            propagate_winner(store, &game, successor_id)?;
        }
    }

    notifier.score_updated(&ScoreEvent {
        match_id: game.id,
        tournament_id: game.tournament_id,
        team1_id: game.team1_id.clone(),
        team2_id: game.team2_id.clone(),
        team1_score: req.team1_score,
        team2_score: req.team2_score,
        is_final: game.is_final,
        emitted_at: Utc::now(),
    });

    Ok(ScoreUpdate {
        match_id: game.id,
        tournament_id: game.tournament_id,
        team1_id: game.team1_id,
        team2_id: game.team2_id,
        team1_score: req.team1_score,
        team2_score: req.team2_score,
        is_final: game.is_final,
        winner_team_id: game.winner_team_id,
        outcome: game.outcome,
    })
}

/// Writes the winner into the successor slot this match feeds (team1 when it
/// is predecessor_1, team2 when predecessor_2) and, once both successor slots
/// hold real teams, creates its two zero score rows if none exist yet.
/// Single hop: the successor's own successor is touched only when the
/// successor is itself finalized later.
fn propagate_winner(
    store: &mut dyn Store,
    game: &Match,
    successor_id: i64,
) -> Result<(), EngineError> {
    let winner = match &game.winner_team_id {
        Some(winner) => winner.clone(),
        None => {
            // A drawn knockout match advances nobody; the slot stays TBD.
            log::warn!("match {} finalized as a draw; successor slot left TBD", game.id);
            return Ok(());
        }
    };

    let mut successor = store.get_match(successor_id).ok_or_else(|| {
        EngineError::Integrity(format!(
            "successor match {} of match {} not found",
            successor_id, game.id
        ))
    })?;

    if successor.predecessor_1 == Some(game.id) {
        successor.team1_id = Some(winner);
    } else if successor.predecessor_2 == Some(game.id) {
        successor.team2_id = Some(winner);
    } else {
        return Err(EngineError::Integrity(format!(
            "match {} is not a predecessor of its successor {}",
            game.id, successor_id
        )));
    }
    successor.updated_at = Utc::now();
    store.update_match(successor.clone())?;

    if successor.slots_filled() && store.scores_for_match(successor.id).is_empty() {
        let tournament_id = store.tournament_id();
        for team in [&successor.team1_id, &successor.team2_id] {
            if let Some(team_id) = team {
                store.insert_score(Score::zero(successor.id, team_id, tournament_id));
            }
        }
    }

    log::info!(
        "match {} winner advanced into match {}",
        game.id,
        successor.id
    );
    Ok(())
}
