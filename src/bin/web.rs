//! Single binary web server: REST API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use tournament_bracket_web::{
    bracket_status, build_bracket, complete_round, create_round, delete_bracket, delete_round,
    generate_fixtures, generate_round_fixtures, import_pool_csv, parse_score, pool_standings,
    standings, update_score, BracketSeeds, ChannelNotifier, EngineError, ErrorKind, Match,
    MatchId, MatchKind, MatchStatus, MemoryStore, Outcome, Player, PlayerId, PromotionRequest,
    Scope, ScoreUpdateRequest, Season, SkillLevel, Store, SuperTournament, Tournament,
    TournamentId, TBD,
};
use uuid::Uuid;

/// One tournament: its metadata plus its own store.
struct TournamentEntry {
    meta: Tournament,
    store: MemoryStore,
}

/// In-memory state: the whole hierarchy plus per-tournament stores. Every
/// engine operation runs under the write lock, which is what makes each one
/// an atomic unit of work.
struct World {
    next_super_tournament_id: i64,
    next_season_id: i64,
    next_tournament_id: TournamentId,
    super_tournaments: Vec<SuperTournament>,
    seasons: Vec<Season>,
    players: Vec<Player>,
    tournaments: HashMap<TournamentId, TournamentEntry>,
}

impl World {
    fn new() -> Self {
        Self {
            next_super_tournament_id: 1,
            next_season_id: 1,
            next_tournament_id: 1,
            super_tournaments: Vec::new(),
            seasons: Vec::new(),
            players: Vec::new(),
            tournaments: HashMap::new(),
        }
    }
}

type AppState = Data<RwLock<World>>;

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Tournament not found" }))
}

fn engine_error(e: &EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
        ErrorKind::Integrity => HttpResponse::InternalServerError().json(body),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-bracket-web",
    })
}

// ---------------------------------------------------------------------------
// Hierarchy: super tournaments, seasons, tournaments

#[derive(Deserialize)]
struct CreateSuperTournamentBody {
    name: String,
    description: Option<String>,
}

#[post("/api/super-tournaments")]
async fn api_create_super_tournament(
    state: AppState,
    body: Json<CreateSuperTournamentBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let id = g.next_super_tournament_id;
    g.next_super_tournament_id += 1;
    let st = SuperTournament {
        id,
        name: body.name.clone(),
        description: body.description.clone(),
        created_at: Utc::now(),
    };
    g.super_tournaments.push(st.clone());
    HttpResponse::Created().json(st)
}

#[get("/api/super-tournaments")]
async fn api_list_super_tournaments(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(&g.super_tournaments)
}

#[derive(Deserialize)]
struct IdPath {
    id: i64,
}

#[derive(Deserialize)]
struct CreateSeasonBody {
    name: String,
}

#[post("/api/super-tournaments/{id}/seasons")]
async fn api_create_season(
    state: AppState,
    path: Path<IdPath>,
    body: Json<CreateSeasonBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if !g.super_tournaments.iter().any(|s| s.id == path.id) {
        return HttpResponse::NotFound()
            .json(serde_json::json!({ "error": "Super tournament not found" }));
    }
    let id = g.next_season_id;
    g.next_season_id += 1;
    let season = Season {
        id,
        name: body.name.clone(),
        super_tournament_id: path.id,
        created_at: Utc::now(),
    };
    g.seasons.push(season.clone());
    HttpResponse::Created().json(season)
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(rename = "type")]
    tournament_type: String,
    #[serde(default = "default_num_courts")]
    num_courts: u32,
}

fn default_num_courts() -> u32 {
    1
}

#[post("/api/seasons/{id}/tournaments")]
async fn api_create_tournament(
    state: AppState,
    path: Path<IdPath>,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if !g.seasons.iter().any(|s| s.id == path.id) {
        return HttpResponse::NotFound().json(serde_json::json!({ "error": "Season not found" }));
    }
    let id = g.next_tournament_id;
    g.next_tournament_id += 1;
    let meta = Tournament {
        id,
        name: body.name.clone(),
        tournament_type: body.tournament_type.clone(),
        num_courts: body.num_courts,
        season_id: path.id,
        created_at: Utc::now(),
    };
    g.tournaments.insert(
        id,
        TournamentEntry {
            meta: meta.clone(),
            store: MemoryStore::new(id),
        },
    );
    HttpResponse::Created().json(meta)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.tournaments.get(&path.id) {
        Some(entry) => HttpResponse::Ok().json(&entry.meta),
        None => no_tournament(),
    }
}

// ---------------------------------------------------------------------------
// Players and teams

#[derive(Deserialize)]
struct RegisterPlayerBody {
    first_name: String,
    last_name: Option<String>,
    gender: String,
    age: u32,
    phone_number: String,
    email: String,
    skill_level: SkillLevel,
    dupr_id: Option<String>,
}

#[post("/api/super-tournaments/{id}/players")]
async fn api_register_player(
    state: AppState,
    path: Path<IdPath>,
    body: Json<RegisterPlayerBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if !g.super_tournaments.iter().any(|s| s.id == path.id) {
        return HttpResponse::NotFound()
            .json(serde_json::json!({ "error": "Super tournament not found" }));
    }
    let player = Player {
        uuid: Uuid::new_v4(),
        first_name: body.first_name.clone(),
        last_name: body.last_name.clone(),
        gender: body.gender.clone(),
        age: body.age,
        phone_number: body.phone_number.clone(),
        email: body.email.clone(),
        skill_level: body.skill_level,
        dupr_id: body.dupr_id.clone(),
        super_tournament_id: path.id,
        checked_in: false,
    };
    g.players.push(player.clone());
    HttpResponse::Created().json(player)
}

#[derive(Deserialize)]
struct CreateTeamBody {
    name: String,
    player1_uuid: Option<PlayerId>,
    player2_uuid: Option<PlayerId>,
}

#[post("/api/tournaments/{id}/teams")]
async fn api_create_team(
    state: AppState,
    path: Path<IdPath>,
    body: Json<CreateTeamBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    for uuid in [body.player1_uuid, body.player2_uuid].into_iter().flatten() {
        if !g.players.iter().any(|p| p.uuid == uuid) {
            return HttpResponse::NotFound()
                .json(serde_json::json!({ "error": format!("Player {} not found", uuid) }));
        }
    }
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    let team = entry
        .store
        .insert_team(&body.name, body.player1_uuid, body.player2_uuid);
    HttpResponse::Created().json(team)
}

#[get("/api/tournaments/{id}/teams")]
async fn api_list_teams(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.tournaments.get(&path.id) {
        Some(entry) => HttpResponse::Ok().json(entry.store.teams()),
        None => no_tournament(),
    }
}

#[derive(Deserialize)]
struct TeamPath {
    id: TournamentId,
    team_id: String,
}

#[derive(Deserialize)]
struct CheckInBody {
    #[serde(default = "default_checked_in")]
    checked_in: bool,
}

fn default_checked_in() -> bool {
    true
}

#[put("/api/tournaments/{id}/teams/{team_id}/check-in")]
async fn api_team_check_in(
    state: AppState,
    path: Path<TeamPath>,
    body: Json<CheckInBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    match entry.store.set_team_checked_in(&path.team_id, body.checked_in) {
        Ok(team) => HttpResponse::Ok().json(team),
        Err(e) => engine_error(&e),
    }
}

// ---------------------------------------------------------------------------
// Rounds, pools, fixtures

#[derive(Deserialize)]
struct CreateRoundBody {
    round_id: u32,
    number_of_pools: u32,
    round_name: Option<String>,
    /// Defaults to every team in the tournament, in registration order.
    teams: Option<Vec<String>>,
}

#[post("/api/tournaments/{id}/rounds")]
async fn api_create_round(
    state: AppState,
    path: Path<IdPath>,
    body: Json<CreateRoundBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    let team_ids = body.teams.clone().unwrap_or_else(|| {
        entry.store.teams().into_iter().map(|t| t.team_id).collect()
    });
    match create_round(
        &mut entry.store,
        body.round_id,
        body.round_name.as_deref(),
        body.number_of_pools,
        &team_ids,
    ) {
        Ok(pools) => HttpResponse::Created().json(serde_json::json!({
            "message": "Round created successfully with multiple pools",
            "round_id": body.round_id,
            "pools": pools,
        })),
        Err(e) => engine_error(&e),
    }
}

#[derive(Deserialize)]
struct RoundPath {
    id: TournamentId,
    round_id: u32,
}

#[derive(Deserialize)]
struct ImportQuery {
    round_name: Option<String>,
}

#[post("/api/tournaments/{id}/rounds/{round_id}/pools/csv")]
async fn api_import_pools_csv(
    state: AppState,
    path: Path<RoundPath>,
    query: Query<ImportQuery>,
    body: web::Bytes,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    match import_pool_csv(
        &mut entry.store,
        path.round_id,
        query.round_name.as_deref(),
        &body,
    ) {
        Ok(import) => HttpResponse::Created().json(import),
        Err(e) => engine_error(&e),
    }
}

#[derive(Deserialize)]
struct DeleteRoundQuery {
    pool: Option<String>,
}

#[delete("/api/tournaments/{id}/rounds/{round_id}")]
async fn api_delete_round(
    state: AppState,
    path: Path<RoundPath>,
    query: Query<DeleteRoundQuery>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    let counts = delete_round(&mut entry.store, path.round_id, query.pool.as_deref());
    HttpResponse::Ok().json(counts)
}

#[derive(Deserialize, Default)]
struct GenerateFixturesBody {
    /// When set, generate only this pool (teams from its roster).
    pool: Option<String>,
}

#[post("/api/tournaments/{id}/rounds/{round_id}/fixtures")]
async fn api_generate_fixtures(
    state: AppState,
    path: Path<RoundPath>,
    body: Option<Json<GenerateFixturesBody>>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    let pool = body.as_ref().and_then(|b| b.pool.clone());
    let result = match pool {
        Some(pool) => {
            let team_ids: Vec<String> = entry
                .store
                .round_entries(path.round_id)
                .into_iter()
                .filter(|e| e.pool == pool)
                .map(|e| e.team_id)
                .collect();
            if team_ids.is_empty() {
                return engine_error(&EngineError::RoundNotFound(path.round_id));
            }
            generate_fixtures(&mut entry.store, path.round_id, &pool, &team_ids)
                .map(|fixtures| vec![fixtures])
        }
        None => generate_round_fixtures(&mut entry.store, path.round_id),
    };
    match result {
        Ok(fixtures) => HttpResponse::Created().json(serde_json::json!({
            "message": "Fixtures created successfully",
            "pools": fixtures,
        })),
        Err(e) => engine_error(&e),
    }
}

// ---------------------------------------------------------------------------
// Standings

#[derive(Deserialize)]
struct StandingsQuery {
    round_id: Option<u32>,
    pool: Option<String>,
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(
    state: AppState,
    path: Path<IdPath>,
    query: Query<StandingsQuery>,
) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    let scope = Scope {
        round_id: query.round_id.map(|r| r.to_string()),
        pool: query.pool.clone(),
    };
    if query.pool.is_some() {
        let ranked = standings(&entry.store, &scope);
        if ranked.is_empty() {
            return HttpResponse::NotFound()
                .json(serde_json::json!({ "error": "No matches found" }));
        }
        HttpResponse::Ok().json(ranked)
    } else {
        let pools = pool_standings(&entry.store, &scope);
        if pools.values().all(|rows| rows.is_empty()) {
            return HttpResponse::NotFound()
                .json(serde_json::json!({ "error": "No matches found" }));
        }
        HttpResponse::Ok().json(serde_json::json!({ "pools": pools }))
    }
}

// ---------------------------------------------------------------------------
// Promotion

#[post("/api/tournaments/{id}/rounds/{round_id}/complete")]
async fn api_complete_round(
    state: AppState,
    path: Path<RoundPath>,
    body: Json<PromotionRequest>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    match complete_round(&mut entry.store, path.round_id, &body) {
        Ok(completed) => HttpResponse::Created().json(serde_json::json!({
            "message": format!("Round {} created successfully", completed.new_round_id),
            "new_round_id": completed.new_round_id,
            "new_round_name": completed.round_name,
            "matches_created": completed.match_ids.len(),
        })),
        Err(e) => engine_error(&e),
    }
}

// ---------------------------------------------------------------------------
// Knockout bracket

#[derive(Deserialize)]
struct MatchupBody {
    team1_id: String,
    team2_id: String,
}

#[derive(Deserialize)]
struct KnockoutBody {
    #[serde(default = "default_current_round_id")]
    current_round_id: u32,
    team_ids: Option<Vec<String>>,
    matches: Option<Vec<MatchupBody>>,
}

fn default_current_round_id() -> u32 {
    1
}

#[post("/api/tournaments/{id}/knockout")]
async fn api_build_knockout(
    state: AppState,
    path: Path<IdPath>,
    body: Json<KnockoutBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    let seeds = if let Some(matches) = &body.matches {
        BracketSeeds::Matchups(
            matches
                .iter()
                .map(|m| (m.team1_id.clone(), m.team2_id.clone()))
                .collect(),
        )
    } else if let Some(team_ids) = &body.team_ids {
        BracketSeeds::Teams(team_ids.clone())
    } else {
        return engine_error(&EngineError::MissingParameter("team_ids or matches"));
    };
    match build_bracket(&mut entry.store, body.current_round_id, seeds) {
        Ok(summary) => HttpResponse::Created().json(serde_json::json!({
            "message": "Knockout bracket created successfully",
            "matches_created": summary.matches_created,
            "rounds_created": summary.rounds_created,
            "starting_round": summary.starting_round_id,
            "total_rounds": summary.total_rounds,
            "verification": {
                "matches_with_successors": summary.matches_with_successors,
                "matches_with_predecessors": summary.matches_with_predecessors,
            },
        })),
        Err(e) => engine_error(&e),
    }
}

#[get("/api/tournaments/{id}/knockout")]
async fn api_check_knockout(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    HttpResponse::Ok().json(bracket_status(&entry.store))
}

#[delete("/api/tournaments/{id}/knockout")]
async fn api_delete_knockout(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    let counts = delete_bracket(&mut entry.store);
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Knockout bracket deleted successfully",
        "scores_deleted": counts.scores,
        "matches_deleted": counts.matches,
        "rounds_deleted": counts.round_entries,
    }))
}

// ---------------------------------------------------------------------------
// Scores

#[derive(Deserialize)]
struct UpdateScoreBody {
    match_id: MatchId,
    /// "{team1 score}-{team2 score}"
    score: String,
    #[serde(rename = "final", default)]
    is_final: bool,
    walkover_winner: Option<String>,
}

#[post("/api/tournaments/{id}/scores")]
async fn api_update_score(
    state: AppState,
    notifier: Data<ChannelNotifier>,
    path: Path<IdPath>,
    body: Json<UpdateScoreBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    let (team1_score, team2_score) = match parse_score(&body.score) {
        Ok(scores) => scores,
        Err(e) => return engine_error(&e),
    };
    let req = ScoreUpdateRequest {
        match_id: body.match_id,
        team1_score,
        team2_score,
        is_final: body.is_final,
        walkover_winner: body.walkover_winner.clone(),
    };
    match update_score(&mut entry.store, notifier.get_ref(), &req) {
        Ok(update) => HttpResponse::Ok().json(update),
        Err(e) => engine_error(&e),
    }
}

// ---------------------------------------------------------------------------
// Fixture listing and CSV export

#[derive(Serialize)]
struct SlotView {
    team_id: String,
    name: String,
    checked_in: bool,
}

#[derive(Serialize)]
struct BracketInfo {
    round_number: Option<u32>,
    bracket_position: Option<u32>,
    predecessor_1: Option<MatchId>,
    predecessor_2: Option<MatchId>,
    successor: Option<MatchId>,
}

#[derive(Serialize)]
struct FixtureView {
    match_id: MatchId,
    match_name: String,
    round_id: String,
    pool: String,
    court_number: Option<u32>,
    court_order: Option<u32>,
    team1: SlotView,
    team2: SlotView,
    match_result: String,
    status: MatchStatus,
    is_final: bool,
    winner_team_id: Option<String>,
    outcome: Outcome,
    bracket_info: Option<BracketInfo>,
}

fn slot_view(store: &MemoryStore, slot: &Option<String>) -> SlotView {
    match slot.as_deref().filter(|id| *id != TBD) {
        Some(id) => match store.team(id) {
            Some(team) => SlotView {
                team_id: team.team_id,
                name: team.name,
                checked_in: team.checked_in,
            },
            None => SlotView {
                team_id: id.to_string(),
                name: "Unknown".to_string(),
                checked_in: false,
            },
        },
        None => SlotView {
            team_id: TBD.to_string(),
            name: TBD.to_string(),
            checked_in: false,
        },
    }
}

fn fixture_view(store: &MemoryStore, m: &Match) -> FixtureView {
    let scores = store.scores_for_match(m.id);
    let score_for = |slot: &Option<String>| {
        slot.as_deref()
            .and_then(|id| scores.iter().find(|s| s.team_id == id))
            .map(|s| s.score)
            .unwrap_or(0)
    };
    let team1_score = score_for(&m.team1_id);
    let team2_score = score_for(&m.team2_id);
    FixtureView {
        match_id: m.id,
        match_name: m.match_name.clone(),
        round_id: m.round_id.clone(),
        pool: m.pool.clone(),
        court_number: m.court_number,
        court_order: m.court_order,
        team1: slot_view(store, &m.team1_id),
        team2: slot_view(store, &m.team2_id),
        match_result: format!("{}-{}", team1_score, team2_score),
        status: m.status,
        is_final: m.is_final,
        winner_team_id: m.winner_team_id.clone(),
        outcome: m.outcome,
        bracket_info: if m.kind == MatchKind::Knockout {
            Some(BracketInfo {
                round_number: m.round_number,
                bracket_position: m.bracket_position,
                predecessor_1: m.predecessor_1,
                predecessor_2: m.predecessor_2,
                successor: m.successor,
            })
        } else {
            None
        },
    }
}

#[derive(Deserialize)]
struct FixturesQuery {
    pool: Option<String>,
    round_id: Option<u32>,
}

#[get("/api/tournaments/{id}/fixtures")]
async fn api_list_fixtures(
    state: AppState,
    path: Path<IdPath>,
    query: Query<FixturesQuery>,
) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    let scope = Scope {
        round_id: query.round_id.map(|r| r.to_string()),
        pool: query.pool.clone(),
    };
    let fixtures: Vec<FixtureView> = entry
        .store
        .matches(&scope)
        .iter()
        .map(|m| fixture_view(&entry.store, m))
        .collect();
    if fixtures.is_empty() {
        return HttpResponse::NotFound().json(serde_json::json!({ "error": "No matches found" }));
    }
    HttpResponse::Ok().json(serde_json::json!({
        "matches": fixtures,
        "total_matches": fixtures.len(),
    }))
}

#[get("/api/tournaments/{id}/fixtures/csv")]
async fn api_fixtures_csv(
    state: AppState,
    path: Path<IdPath>,
    query: Query<FixturesQuery>,
) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    let scope = Scope {
        round_id: query.round_id.map(|r| r.to_string()),
        pool: query.pool.clone(),
    };
    let matches = entry.store.matches(&scope);
    if matches.is_empty() {
        return HttpResponse::NotFound().json(serde_json::json!({ "error": "No matches found" }));
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    let header_ok = writer
        .write_record([
            "Round ID", "Pool", "Match ID", "Match Name", "Team 1 ID", "Team 1 Name",
            "Team 2 ID", "Team 2 Name", "Result",
        ])
        .is_ok();
    if !header_ok {
        return HttpResponse::InternalServerError().body("csv error");
    }
    for m in &matches {
        let view = fixture_view(&entry.store, m);
        let result = if m.is_final { view.match_result } else { TBD.to_string() };
        if writer
            .write_record([
                m.round_id.as_str(),
                m.pool.as_str(),
                &m.id.to_string(),
                m.match_name.as_str(),
                view.team1.team_id.as_str(),
                view.team1.name.as_str(),
                view.team2.team_id.as_str(),
                view.team2.name.as_str(),
                result.as_str(),
            ])
            .is_err()
        {
            return HttpResponse::InternalServerError().body("csv error");
        }
    }
    match writer.into_inner() {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv")
            .insert_header((
                "Content-Disposition",
                format!("attachment;filename=match_fixtures_{}.csv", path.id),
            ))
            .body(bytes),
        Err(_) => HttpResponse::InternalServerError().body("csv error"),
    }
}

// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(World::new()));
    let notifier = Data::new(ChannelNotifier::new(64));

    // Drain the score channel so events are visible in the logs even with no
    // external subscriber attached.
    let mut receiver = notifier.subscribe();
    actix_web::rt::spawn(async move {
        while let Ok(event) = receiver.recv().await {
            log::info!(
                "score update: match {} {}-{} (final: {})",
                event.match_id,
                event.team1_score,
                event.team2_score,
                event.is_final
            );
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(notifier.clone())
            .service(api_health)
            .service(api_create_super_tournament)
            .service(api_list_super_tournaments)
            .service(api_create_season)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_register_player)
            .service(api_create_team)
            .service(api_list_teams)
            .service(api_team_check_in)
            .service(api_create_round)
            .service(api_import_pools_csv)
            .service(api_delete_round)
            .service(api_generate_fixtures)
            .service(api_standings)
            .service(api_complete_round)
            .service(api_build_knockout)
            .service(api_check_knockout)
            .service(api_delete_knockout)
            .service(api_update_score)
            .service(api_list_fixtures)
            .service(api_fixtures_csv)
    })
    .bind(bind)?
    .run()
    .await
}
