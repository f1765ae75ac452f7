//! Tournament engine: pool play, standings, promotion, and single-elimination
//! knockout brackets, behind an explicit storage port.

pub mod logic;
pub mod models;
pub mod notify;
pub mod store;

pub use logic::{
    bracket_status, build_bracket, complete_round, create_round, delete_bracket, delete_round,
    generate_fixtures, generate_round_fixtures, import_pool_csv, parse_score, pool_standings,
    standings, update_score, BracketSeeds, BracketSummary, CompletedRound, GeneratedFixtures,
    MatchmakingType, PromotionRequest, PromotionType, ScoreUpdate, ScoreUpdateRequest,
    TeamStanding,
};
pub use models::{
    EngineError, ErrorKind, Match, MatchDraft, MatchId, MatchKind, MatchStatus, Outcome, Player,
    PlayerId, RoundEntry, Score, Season, SkillLevel, SuperTournament, Team, Tournament,
    TournamentId, KNOCKOUT_POOL, TBD,
};
pub use notify::{ChannelNotifier, NullNotifier, ScoreEvent, ScoreNotifier};
pub use store::{DeleteCounts, MemoryStore, Scope, Store};
