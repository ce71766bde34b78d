//! Application state: reference countries, the game session registry and the high score.
//!
//! This module owns:
//!   - the immutable reference snapshot loaded at startup
//!   - active sessions keyed by id (each transition runs under the registry lock),
//!     pruned by idle time and count whenever a game starts
//!   - the best-score store
//!   - the loaded config

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::TriviaConfig;
use crate::domain::{Country, Difficulty, Region};
use crate::error::TriviaError;
use crate::highscore::{HighScoreStore, HighScoreUpdate};
use crate::question::Answer;
use crate::session::{GameSession, Phase};

/// A live session plus the high score outcome once it completes.
#[derive(Clone, Debug)]
pub struct SessionEntry {
    pub session: GameSession,
    pub high_score: Option<HighScoreUpdate>,
    pub last_touched: Instant,
}

/// Drop sessions idle for at least `ttl`, then evict least recently touched
/// ones until there is room for one more. Returns how many were removed.
fn prune_sessions(sessions: &mut HashMap<Uuid, SessionEntry>, now: Instant, ttl: Duration, max: usize) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| now.saturating_duration_since(entry.last_touched) < ttl);
    while !sessions.is_empty() && sessions.len() >= max {
        let oldest = sessions.iter().min_by_key(|(_, entry)| entry.last_touched).map(|(id, _)| *id);
        match oldest {
            Some(id) => {
                sessions.remove(&id);
            }
            None => break,
        }
    }
    before - sessions.len()
}

#[derive(Clone)]
pub struct AppState {
    pub countries: Arc<Vec<Country>>,
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    pub high_score: Arc<RwLock<HighScoreStore>>,
    pub config: TriviaConfig,
}

impl AppState {
    pub fn new(config: TriviaConfig, countries: Vec<Country>) -> Self {
        let high_score = HighScoreStore::load(config.high_score_path.clone());
        info!(target: "roampedia_trivia", countries = countries.len(), best = high_score.best(), "Application state ready");
        Self {
            countries: Arc::new(countries),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            high_score: Arc::new(RwLock::new(high_score)),
            config,
        }
    }

    /// Sample a fresh game and register it.
    #[instrument(level = "info", skip(self), fields(%region, %difficulty))]
    pub async fn start_session(&self, region: Region, difficulty: Difficulty) -> Result<(Uuid, SessionEntry), TriviaError> {
        let session = {
            let mut rng = StdRng::from_entropy();
            GameSession::start(&self.countries, region, difficulty, &mut rng)?
        };
        let id = Uuid::new_v4();
        let now = Instant::now();
        let entry = SessionEntry { session, high_score: None, last_touched: now };
        {
            let mut sessions = self.sessions.write().await;
            let pruned = prune_sessions(&mut sessions, now, self.config.session_ttl(), self.config.max_sessions);
            if pruned > 0 {
                debug!(target: "trivia", pruned, live = sessions.len(), "Pruned idle sessions");
            }
            sessions.insert(id, entry.clone());
        }
        info!(target: "trivia", %id, %region, %difficulty, "Game started");
        Ok((id, entry))
    }

    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_session(&self, id: Uuid) -> Result<SessionEntry, TriviaError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(TriviaError::SessionNotFound(id))?;
        entry.last_touched = Instant::now();
        Ok(entry.clone())
    }

    /// Apply an answer to the current question. A session that can no longer
    /// continue is dropped so the player lands back on configuration.
    #[instrument(level = "info", skip(self, answer), fields(%id))]
    pub async fn submit_answer(&self, id: Uuid, answer: &Answer) -> Result<GameSession, TriviaError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(TriviaError::SessionNotFound(id))?;
        entry.last_touched = Instant::now();
        match entry.session.apply_answer(answer) {
            Ok(next) => {
                entry.session = next.clone();
                Ok(next)
            }
            Err(TriviaError::SessionAborted) => {
                sessions.remove(&id);
                warn!(target: "trivia", %id, "Session aborted; discarded");
                Err(TriviaError::SessionAborted)
            }
            Err(e) => Err(e),
        }
    }

    /// End the feedback phase. Records the high score when this completes the game.
    /// Returns `None` if the session was abandoned in the meantime.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn finish_feedback(&self, id: Uuid) -> Option<SessionEntry> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_touched = Instant::now();
        let was_feedback = matches!(entry.session.phase(), Phase::Feedback { .. });
        entry.session = entry.session.advance();

        if was_feedback && entry.session.phase() == Phase::Complete {
            let score = entry.session.score();
            let update = self.high_score.write().await.record(score);
            entry.high_score = Some(update);
            info!(target: "trivia", %id, score, best = update.best, new_high_score = update.new_high_score, "Game complete");
        }
        Some(entry.clone())
    }

    /// Discard `id` and start a new game with the same filters (freshly sampled).
    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn replay(&self, id: Uuid) -> Result<(Uuid, SessionEntry), TriviaError> {
        let old = self.sessions.write().await.remove(&id).ok_or(TriviaError::SessionNotFound(id))?;
        self.start_session(old.session.region(), old.session.difficulty()).await
    }

    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn abandon(&self, id: Uuid) -> Result<(), TriviaError> {
        self.sessions.write().await.remove(&id).map(|_| ()).ok_or(TriviaError::SessionNotFound(id))
    }

    pub async fn best_score(&self) -> u32 {
        self.high_score.read().await.best()
    }
}
