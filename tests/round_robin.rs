use tournament_bracket_web::{
    create_round, generate_fixtures, generate_round_fixtures, EngineError, MemoryStore, Scope,
    Store,
};

fn store_with_teams(count: usize) -> (MemoryStore, Vec<String>) {
    let mut store = MemoryStore::new(1);
    let ids = (0..count)
        .map(|i| store.insert_team(&format!("Team {}", i + 1), None, None).team_id)
        .collect();
    (store, ids)
}

#[test]
fn every_unordered_pair_appears_exactly_once() {
    for n in 2..=6 {
        let (mut store, ids) = store_with_teams(n);
        let fixtures = generate_fixtures(&mut store, 1, "A", &ids).unwrap();
        assert_eq!(fixtures.match_ids.len(), n * (n - 1) / 2);

        let matches = store.matches(&Scope::round_pool(1, "A"));
        let mut seen = std::collections::HashSet::new();
        for m in &matches {
            let t1 = m.team1_id.clone().unwrap();
            let t2 = m.team2_id.clone().unwrap();
            assert_ne!(t1, t2);
            let key = if t1 < t2 { (t1, t2) } else { (t2, t1) };
            assert!(seen.insert(key), "duplicate pairing");
        }
    }
}

#[test]
fn each_fixture_gets_two_zero_score_rows() {
    let (mut store, ids) = store_with_teams(4);
    let fixtures = generate_fixtures(&mut store, 1, "A", &ids).unwrap();

    for id in &fixtures.match_ids {
        let scores = store.scores_for_match(*id);
        assert_eq!(scores.len(), 2);
        assert!(scores.iter().all(|s| s.score == 0));
    }
}

#[test]
fn regeneration_is_a_conflict_and_writes_nothing() {
    let (mut store, ids) = store_with_teams(3);
    generate_fixtures(&mut store, 1, "A", &ids).unwrap();
    let before = store.matches(&Scope::all()).len();

    let err = generate_fixtures(&mut store, 1, "A", &ids).unwrap_err();
    assert!(matches!(
        err,
        EngineError::FixturesAlreadyExist { round_id: 1, .. }
    ));
    assert_eq!(store.matches(&Scope::all()).len(), before);
}

#[test]
fn same_round_different_pool_is_allowed() {
    let (mut store, ids) = store_with_teams(4);
    generate_fixtures(&mut store, 1, "A", &ids[..2]).unwrap();
    let fixtures = generate_fixtures(&mut store, 1, "B", &ids[2..]).unwrap();
    assert_eq!(fixtures.match_ids.len(), 1);
}

#[test]
fn fewer_than_two_teams_yields_zero_matches() {
    let (mut store, ids) = store_with_teams(1);
    let fixtures = generate_fixtures(&mut store, 1, "A", &ids).unwrap();
    assert!(fixtures.match_ids.is_empty());
    assert!(fixtures.skipped.is_empty());
}

#[test]
fn unknown_teams_are_skipped_not_fatal() {
    let (mut store, mut ids) = store_with_teams(2);
    ids.push("1_999".to_string());
    let fixtures = generate_fixtures(&mut store, 1, "A", &ids).unwrap();

    assert_eq!(fixtures.match_ids.len(), 1);
    assert_eq!(fixtures.skipped, vec!["1_999".to_string()]);
}

#[test]
fn match_names_carry_round_pool_and_team_names() {
    let (mut store, ids) = store_with_teams(2);
    let fixtures = generate_fixtures(&mut store, 3, "B", &ids).unwrap();
    let m = store.get_match(fixtures.match_ids[0]).unwrap();
    assert_eq!(m.match_name, "Round 3 Pool B - Team 1 vs Team 2");
    assert_eq!(m.round_id, "3");
    assert_eq!(m.pool, "B");
}

#[test]
fn round_fixtures_cover_every_pool_alphabetically() {
    let (mut store, ids) = store_with_teams(6);
    create_round(&mut store, 1, None, 3, &ids).unwrap();

    let generated = generate_round_fixtures(&mut store, 1).unwrap();
    let pools: Vec<&str> = generated.iter().map(|g| g.pool.as_str()).collect();
    assert_eq!(pools, vec!["A", "B", "C"]);
    assert!(generated.iter().all(|g| g.match_ids.len() == 1));
}

#[test]
fn round_fixtures_for_missing_round_is_not_found() {
    let (mut store, _) = store_with_teams(4);
    let err = generate_round_fixtures(&mut store, 9).unwrap_err();
    assert!(matches!(err, EngineError::RoundNotFound(9)));
}

#[test]
fn round_fixtures_conflict_before_any_pool_is_written() {
    let (mut store, ids) = store_with_teams(4);
    create_round(&mut store, 1, None, 2, &ids).unwrap();
    // Pool B already has fixtures; the whole round generation must fail
    // without touching pool A.
    let roster: Vec<String> = store
        .round_entries(1)
        .into_iter()
        .filter(|e| e.pool == "B")
        .map(|e| e.team_id)
        .collect();
    generate_fixtures(&mut store, 1, "B", &roster).unwrap();

    let err = generate_round_fixtures(&mut store, 1).unwrap_err();
    assert!(matches!(err, EngineError::FixturesAlreadyExist { .. }));
    assert!(store.matches(&Scope::round_pool(1, "A")).is_empty());
}
