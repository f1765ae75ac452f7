//! Engine components: standings, pool play, promotion, knockout, scoring.

pub mod knockout;
pub mod pools;
pub mod promotion;
pub mod round_robin;
pub mod scoring;
pub mod standings;

pub use knockout::{build_bracket, bracket_status, delete_bracket, BracketSeeds, BracketSummary};
pub use pools::{create_round, delete_round, import_pool_csv, CreatedPool, PoolImport};
pub use promotion::{
    complete_round, CompletedRound, MatchmakingType, PromotionRequest, PromotionType,
};
pub use round_robin::{generate_fixtures, generate_round_fixtures, GeneratedFixtures};
pub use scoring::{parse_score, update_score, ScoreUpdate, ScoreUpdateRequest};
pub use standings::{pool_standings, standings, TeamStanding};
