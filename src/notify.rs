//! Real-time notification port: score updates are emitted fire-and-forget to
//! whoever subscribes to a tournament's score channel.

use crate::models::{MatchId, TournamentId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

/// One score update event. No acknowledgment, no delivery guarantee.
#[derive(Clone, Debug, Serialize)]
pub struct ScoreEvent {
    pub match_id: MatchId,
    pub tournament_id: TournamentId,
    pub team1_id: Option<String>,
    pub team2_id: Option<String>,
    pub team1_score: u32,
    pub team2_score: u32,
    pub is_final: bool,
    pub emitted_at: DateTime<Utc>,
}

pub trait ScoreNotifier: Send + Sync {
    fn score_updated(&self, event: &ScoreEvent);
}

/// Broadcast-channel notifier; subscribers that lag simply drop events.
pub struct ChannelNotifier {
    sender: broadcast::Sender<ScoreEvent>,
}

impl ChannelNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScoreEvent> {
        self.sender.subscribe()
    }
}

impl ScoreNotifier for ChannelNotifier {
    fn score_updated(&self, event: &ScoreEvent) {
        // Err means no subscribers; fire-and-forget either way.
        let _ = self.sender.send(event.clone());
    }
}

/// Notifier that drops everything; used in tests and batch contexts.
pub struct NullNotifier;

impl ScoreNotifier for NullNotifier {
    fn score_updated(&self, _event: &ScoreEvent) {}
}
