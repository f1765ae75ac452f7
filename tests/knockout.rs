use tournament_bracket_web::{
    bracket_status, build_bracket, delete_bracket, BracketSeeds, EngineError, MatchKind,
    MemoryStore, Scope, Store, KNOCKOUT_POOL, TBD,
};

fn store_with_teams(count: usize) -> (MemoryStore, Vec<String>) {
    let mut store = MemoryStore::new(1);
    let ids = (0..count)
        .map(|i| store.insert_team(&format!("Team {}", i + 1), None, None).team_id)
        .collect();
    (store, ids)
}

#[test]
fn rejects_non_power_of_two_without_writing() {
    for n in [3usize, 5, 6, 7] {
        let (mut store, ids) = store_with_teams(n);
        let err = build_bracket(&mut store, 1, BracketSeeds::Teams(ids)).unwrap_err();
        assert!(matches!(err, EngineError::NotPowerOfTwo(m) if m == n));
        assert!(store.matches(&Scope::all()).is_empty());
        assert!(!store.round_exists(2));
    }
}

#[test]
fn builds_full_bracket_for_power_of_two_sizes() {
    for n in [2usize, 4, 8, 16] {
        let (mut store, ids) = store_with_teams(n);
        let summary = build_bracket(&mut store, 1, BracketSeeds::Teams(ids)).unwrap();

        assert_eq!(summary.matches_created, n - 1);
        assert_eq!(summary.total_rounds, n.ilog2());
        assert_eq!(summary.starting_round_id, 2);
        // Every match but the final has a successor; every match past round
        // one has both predecessors.
        assert_eq!(summary.matches_with_successors, n - 2);
        assert_eq!(summary.matches_with_predecessors, n / 2 - 1);
    }
}

#[test]
fn linkage_is_symmetric() {
    let (mut store, ids) = store_with_teams(8);
    build_bracket(&mut store, 1, BracketSeeds::Teams(ids)).unwrap();

    for m in store.matches(&Scope::pool(KNOCKOUT_POOL)) {
        if let Some(successor_id) = m.successor {
            let successor = store.get_match(successor_id).unwrap();
            let position = m.bracket_position.unwrap();
            if position % 2 == 0 {
                assert_eq!(successor.predecessor_1, Some(m.id));
            } else {
                assert_eq!(successor.predecessor_2, Some(m.id));
            }
            assert_eq!(successor.round_number, m.round_number.map(|r| r + 1));
            assert_eq!(successor.bracket_position, Some(position / 2));
        }
        for pred_id in [m.predecessor_1, m.predecessor_2].into_iter().flatten() {
            assert_eq!(store.get_match(pred_id).unwrap().successor, Some(m.id));
        }
    }
}

#[test]
fn later_rounds_start_as_tbd_placeholders() {
    let (mut store, ids) = store_with_teams(4);
    build_bracket(&mut store, 1, BracketSeeds::Teams(ids.clone())).unwrap();

    let matches = store.matches(&Scope::pool(KNOCKOUT_POOL));
    let finals: Vec<_> = matches
        .iter()
        .filter(|m| m.round_number == Some(2))
        .collect();
    assert_eq!(finals.len(), 1);
    assert_eq!(finals[0].team1_id.as_deref(), Some(TBD));
    assert_eq!(finals[0].team2_id.as_deref(), Some(TBD));
    // No score rows until both slots resolve.
    assert!(store.scores_for_match(finals[0].id).is_empty());

    let first_round: Vec<_> = matches
        .iter()
        .filter(|m| m.round_number == Some(1))
        .collect();
    assert_eq!(first_round.len(), 2);
    for m in first_round {
        assert!(m.slots_filled());
        assert_eq!(store.scores_for_match(m.id).len(), 2);
    }
}

#[test]
fn eight_team_bracket_uses_standard_names() {
    let (mut store, ids) = store_with_teams(8);
    build_bracket(&mut store, 1, BracketSeeds::Teams(ids)).unwrap();

    let mut names: Vec<String> = store
        .matches(&Scope::pool(KNOCKOUT_POOL))
        .iter()
        .map(|m| m.match_name.clone())
        .collect();
    names.sort();
    assert_eq!(names, vec!["F1", "QF1", "QF2", "QF3", "QF4", "SF1", "SF2"]);
}

#[test]
fn knockout_round_ids_continue_from_current_round() {
    let (mut store, ids) = store_with_teams(4);
    build_bracket(&mut store, 3, BracketSeeds::Teams(ids)).unwrap();

    let mut round_ids: Vec<String> = store
        .matches(&Scope::pool(KNOCKOUT_POOL))
        .iter()
        .map(|m| m.round_id.clone())
        .collect();
    round_ids.sort();
    round_ids.dedup();
    assert_eq!(round_ids, vec!["4", "5"]);
    assert!(store.round_exists(4));
    assert!(store.round_exists(5));
}

#[test]
fn second_bracket_is_a_conflict() {
    let (mut store, ids) = store_with_teams(4);
    build_bracket(&mut store, 1, BracketSeeds::Teams(ids.clone())).unwrap();
    let before = store.matches(&Scope::all()).len();

    let err = build_bracket(&mut store, 1, BracketSeeds::Teams(ids)).unwrap_err();
    assert!(matches!(err, EngineError::KnockoutAlreadyExists));
    assert_eq!(store.matches(&Scope::all()).len(), before);
}

#[test]
fn duplicate_team_is_rejected() {
    let (mut store, ids) = store_with_teams(4);
    let seeds = vec![ids[0].clone(), ids[1].clone(), ids[2].clone(), ids[0].clone()];
    let err = build_bracket(&mut store, 1, BracketSeeds::Teams(seeds)).unwrap_err();
    assert!(matches!(err, EngineError::DuplicateTeamInBracket(id) if id == ids[0]));
}

#[test]
fn unknown_team_is_rejected() {
    let (mut store, ids) = store_with_teams(2);
    let seeds = vec![ids[0].clone(), "1_999".to_string()];
    let err = build_bracket(&mut store, 1, BracketSeeds::Teams(seeds)).unwrap_err();
    assert!(matches!(err, EngineError::TeamNotFound(_)));
}

#[test]
fn tbd_seeds_are_allowed_and_not_duplicates() {
    let (mut store, ids) = store_with_teams(2);
    let seeds = vec![ids[0].clone(), TBD.to_string(), ids[1].clone(), TBD.to_string()];
    let summary = build_bracket(&mut store, 1, BracketSeeds::Teams(seeds)).unwrap();
    assert_eq!(summary.matches_created, 3);
}

#[test]
fn matchup_seeding_accepts_only_bracket_sizes() {
    let (mut store, ids) = store_with_teams(6);
    let matchups: Vec<(String, String)> = ids
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect();
    assert_eq!(matchups.len(), 3);

    let err = build_bracket(&mut store, 1, BracketSeeds::Matchups(matchups)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidBracketSize(3)));
    assert!(store.matches(&Scope::all()).is_empty());
}

#[test]
fn matchup_seeding_builds_from_pairs() {
    let (mut store, ids) = store_with_teams(4);
    let matchups = vec![
        (ids[0].clone(), ids[3].clone()),
        (ids[1].clone(), ids[2].clone()),
    ];
    let summary = build_bracket(&mut store, 1, BracketSeeds::Matchups(matchups)).unwrap();
    assert_eq!(summary.matches_created, 3);

    let first: Vec<_> = store
        .matches(&Scope::pool(KNOCKOUT_POOL))
        .into_iter()
        .filter(|m| m.round_number == Some(1))
        .collect();
    assert_eq!(first[0].team1_id.as_deref(), Some(ids[0].as_str()));
    assert_eq!(first[0].team2_id.as_deref(), Some(ids[3].as_str()));
}

#[test]
fn status_reports_rounds_and_delete_cascades() {
    let (mut store, ids) = store_with_teams(4);
    build_bracket(&mut store, 1, BracketSeeds::Teams(ids.clone())).unwrap();

    let status = bracket_status(&store);
    assert!(status.exists);
    assert_eq!(status.total_matches, 3);
    assert_eq!(status.rounds, vec!["2", "3"]);

    let counts = delete_bracket(&mut store);
    assert_eq!(counts.matches, 3);
    assert_eq!(counts.scores, 4);
    assert_eq!(counts.round_entries, 6);

    let status = bracket_status(&store);
    assert!(!status.exists);
    assert!(store
        .matches(&Scope::all())
        .iter()
        .all(|m| m.kind != MatchKind::Knockout));
}
