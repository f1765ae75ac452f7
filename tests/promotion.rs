use tournament_bracket_web::{
    complete_round, create_round, generate_round_fixtures, update_score, EngineError,
    MatchmakingType, MemoryStore, NullNotifier, PromotionRequest, PromotionType, Scope,
    ScoreUpdateRequest, Store,
};

/// Teams in registration order, split over `pools`, every pool played out so
/// that the earlier-registered team always wins. Rankings inside each pool
/// then follow registration order.
fn played_round(team_count: usize, pools: u32) -> (MemoryStore, Vec<String>) {
    let mut store = MemoryStore::new(1);
    let ids: Vec<String> = (0..team_count)
        .map(|i| store.insert_team(&format!("Team {}", i + 1), None, None).team_id)
        .collect();
    create_round(&mut store, 1, None, pools, &ids).unwrap();
    let generated = generate_round_fixtures(&mut store, 1).unwrap();
    for fixtures in generated {
        for match_id in fixtures.match_ids {
            // Pairings are generated earlier-team-first, so team1 wins.
            update_score(
                &mut store,
                &NullNotifier,
                &ScoreUpdateRequest {
                    match_id,
                    team1_score: 11,
                    team2_score: 5,
                    is_final: true,
                    walkover_winner: None,
                },
            )
            .unwrap();
        }
    }
    (store, ids)
}

fn request(promotion_type: PromotionType) -> PromotionRequest {
    PromotionRequest {
        promotion_type,
        teams_to_promote: None,
        matchmaking_type: None,
        custom_matches: None,
        next_round_name: None,
    }
}

fn pair_ids(store: &MemoryStore, round_id: u32) -> Vec<(String, String)> {
    store
        .matches(&Scope::round(round_id))
        .into_iter()
        .map(|m| (m.team1_id.unwrap(), m.team2_id.unwrap()))
        .collect()
}

#[test]
fn leaderboard_promotion_pairs_adjacent_ranks() {
    let (mut store, ids) = played_round(4, 1);
    let mut req = request(PromotionType::LeaderboardBased);
    req.teams_to_promote = Some(4);

    let completed = complete_round(&mut store, 1, &req).unwrap();
    assert_eq!(completed.new_round_id, 2);
    assert_eq!(completed.match_ids.len(), 2);

    let pairs = pair_ids(&store, 2);
    assert_eq!(pairs[0], (ids[0].clone(), ids[1].clone()));
    assert_eq!(pairs[1], (ids[2].clone(), ids[3].clone()));
}

#[test]
fn new_round_lives_in_pool_a_with_zero_scores() {
    let (mut store, _) = played_round(4, 1);
    let mut req = request(PromotionType::LeaderboardBased);
    req.teams_to_promote = Some(2);
    req.next_round_name = Some("Grand Final".to_string());

    let completed = complete_round(&mut store, 1, &req).unwrap();
    assert_eq!(completed.round_name, "Grand Final");

    let entries = store.round_entries(2);
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.pool == "A"));
    assert!(entries.iter().all(|e| e.name.as_deref() == Some("Grand Final")));

    for match_id in &completed.match_ids {
        let m = store.get_match(*match_id).unwrap();
        assert!(m.match_name.starts_with("Grand Final - "));
        let scores = store.scores_for_match(*match_id);
        assert_eq!(scores.len(), 2);
        assert!(scores.iter().all(|s| s.score == 0));
    }
}

#[test]
fn samepool_keeps_pools_together() {
    let (mut store, ids) = played_round(8, 2);
    let mut req = request(PromotionType::PoolBased);
    req.teams_to_promote = Some(4);
    req.matchmaking_type = Some(MatchmakingType::Samepool);

    complete_round(&mut store, 1, &req).unwrap();
    let pairs = pair_ids(&store, 2);
    // Pool A promotes teams 1 and 2, pool B promotes 5 and 6.
    assert_eq!(pairs[0], (ids[0].clone(), ids[1].clone()));
    assert_eq!(pairs[1], (ids[4].clone(), ids[5].clone()));
}

#[test]
fn farpool_crosses_first_and_last_pools() {
    let (mut store, ids) = played_round(8, 2);
    let mut req = request(PromotionType::PoolBased);
    req.teams_to_promote = Some(4);
    req.matchmaking_type = Some(MatchmakingType::Farpool);

    complete_round(&mut store, 1, &req).unwrap();
    let pairs = pair_ids(&store, 2);
    assert_eq!(pairs[0], (ids[0].clone(), ids[5].clone()));
    assert_eq!(pairs[1], (ids[1].clone(), ids[4].clone()));
}

#[test]
fn nearpool_swaps_ranks_between_pool_pairs() {
    let (mut store, ids) = played_round(8, 2);
    let mut req = request(PromotionType::PoolBased);
    req.teams_to_promote = Some(4);
    req.matchmaking_type = Some(MatchmakingType::Nearpool);

    complete_round(&mut store, 1, &req).unwrap();
    let pairs = pair_ids(&store, 2);
    // Rank 1 of pool A meets rank 2 of pool B and vice versa.
    assert_eq!(pairs[0], (ids[0].clone(), ids[5].clone()));
    assert_eq!(pairs[1], (ids[1].clone(), ids[4].clone()));
}

#[test]
fn nearpool_processes_four_pools_pairwise() {
    let (mut store, ids) = played_round(16, 4);
    let mut req = request(PromotionType::PoolBased);
    req.teams_to_promote = Some(8);
    req.matchmaking_type = Some(MatchmakingType::Nearpool);

    complete_round(&mut store, 1, &req).unwrap();
    let pairs = pair_ids(&store, 2);
    // Pools A..D promote two each; (A,B) and (C,D) cross-pair independently.
    assert_eq!(pairs.len(), 4);
    assert_eq!(pairs[0], (ids[0].clone(), ids[5].clone()));
    assert_eq!(pairs[1], (ids[1].clone(), ids[4].clone()));
    assert_eq!(pairs[2], (ids[8].clone(), ids[13].clone()));
    assert_eq!(pairs[3], (ids[9].clone(), ids[12].clone()));
}

#[test]
fn nearpool_is_deterministic() {
    let mut first: Option<Vec<(String, String)>> = None;
    for _ in 0..3 {
        let (mut store, _) = played_round(8, 2);
        let mut req = request(PromotionType::PoolBased);
        req.teams_to_promote = Some(4);
        req.matchmaking_type = Some(MatchmakingType::Nearpool);
        complete_round(&mut store, 1, &req).unwrap();

        let pairs = pair_ids(&store, 2);
        match &first {
            Some(expected) => assert_eq!(&pairs, expected),
            None => first = Some(pairs),
        }
    }
}

#[test]
fn nearpool_requires_two_promoted_per_pool() {
    let (mut store, _) = played_round(8, 2);
    let mut req = request(PromotionType::PoolBased);
    req.teams_to_promote = Some(6); // 3 per pool
    req.matchmaking_type = Some(MatchmakingType::Nearpool);

    let err = complete_round(&mut store, 1, &req).unwrap_err();
    assert!(matches!(err, EngineError::NearpoolNeedsTwoPerPool(3)));
    assert!(!store.round_exists(2));
}

#[test]
fn custom_promotion_uses_the_given_pairs() {
    let (mut store, ids) = played_round(4, 1);
    let mut req = request(PromotionType::Custom);
    req.custom_matches = Some(vec![(ids[3].clone(), ids[0].clone())]);

    complete_round(&mut store, 1, &req).unwrap();
    let pairs = pair_ids(&store, 2);
    assert_eq!(pairs, vec![(ids[3].clone(), ids[0].clone())]);
}

#[test]
fn custom_promotion_validates_team_ids() {
    let (mut store, ids) = played_round(4, 1);
    let mut req = request(PromotionType::Custom);
    req.custom_matches = Some(vec![(ids[0].clone(), "1_999".to_string())]);

    let err = complete_round(&mut store, 1, &req).unwrap_err();
    assert!(matches!(err, EngineError::TeamNotFound(_)));
    assert!(!store.round_exists(2));
}

#[test]
fn custom_promotion_requires_pairs() {
    let (mut store, _) = played_round(4, 1);
    let err = complete_round(&mut store, 1, &request(PromotionType::Custom)).unwrap_err();
    assert!(matches!(err, EngineError::MissingParameter("custom_matches")));

    let mut req = request(PromotionType::Custom);
    req.custom_matches = Some(Vec::new());
    let err = complete_round(&mut store, 1, &req).unwrap_err();
    assert!(matches!(err, EngineError::MissingParameter("custom_matches")));
}

#[test]
fn promoting_fewer_than_two_teams_fails() {
    let (mut store, _) = played_round(4, 1);
    let mut req = request(PromotionType::LeaderboardBased);
    req.teams_to_promote = Some(1);
    let err = complete_round(&mut store, 1, &req).unwrap_err();
    assert!(matches!(err, EngineError::NotEnoughTeams));
}

#[test]
fn pool_promotion_requires_matchmaking_type() {
    let (mut store, _) = played_round(8, 2);
    let mut req = request(PromotionType::PoolBased);
    req.teams_to_promote = Some(4);
    let err = complete_round(&mut store, 1, &req).unwrap_err();
    assert!(matches!(err, EngineError::MissingParameter("matchmaking_type")));
}
