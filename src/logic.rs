//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Rules and pool availability lookups
//!   - Starting, replaying and abandoning games
//!   - Submitting answers and ending the feedback phase

use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::{Difficulty, Region};
use crate::error::TriviaError;
use crate::pool::{availability, build_pool};
use crate::protocol::{to_view, FeedbackOut, GameView, PoolOut, RulesOut};
use crate::question::Answer;
use crate::state::AppState;

/// Parse optional filter strings; missing values fall back to `World` / `hard`.
pub fn parse_filters(region: Option<&str>, difficulty: Option<&str>) -> Result<(Region, Difficulty), TriviaError> {
  let region = match region.filter(|s| !s.trim().is_empty()) {
    Some(r) => r.parse()?,
    None => Region::default(),
  };
  let difficulty = match difficulty.filter(|s| !s.trim().is_empty()) {
    Some(d) => d.parse()?,
    None => Difficulty::default(),
  };
  Ok((region, difficulty))
}

pub fn rules(state: &AppState) -> RulesOut {
  RulesOut::new(state.config.feedback_delay_ms)
}

#[instrument(level = "info", skip(state), fields(%region, %difficulty))]
pub fn pool_summary(state: &AppState, region: Region, difficulty: Difficulty) -> PoolOut {
  let tiers = availability(&state.countries, region);
  let available = build_pool(&state.countries, region, difficulty).len();
  let playable = tiers.iter().any(|t| t.difficulty == difficulty && t.playable);
  debug!(target: "trivia", %region, %difficulty, available, playable, "Pool summary");
  PoolOut { region, difficulty, available, playable, tiers }
}

#[instrument(level = "info", skip(state), fields(%region, %difficulty))]
pub async fn start_game(state: &AppState, region: Region, difficulty: Difficulty) -> Result<GameView, TriviaError> {
  let (id, entry) = state.start_session(region, difficulty).await?;
  Ok(to_view(id, &entry.session, entry.high_score))
}

#[instrument(level = "debug", skip(state), fields(%id))]
pub async fn game_view(state: &AppState, id: Uuid) -> Result<GameView, TriviaError> {
  let entry = state.get_session(id).await?;
  Ok(to_view(id, &entry.session, entry.high_score))
}

/// Judge an answer and report feedback. The caller is responsible for ending
/// the feedback phase after the configured delay.
#[instrument(level = "info", skip(state, answer), fields(%id))]
pub async fn submit_answer(state: &AppState, id: Uuid, answer: &Answer) -> Result<FeedbackOut, TriviaError> {
  let session = state.submit_answer(id, answer).await?;
  let view = to_view(id, &session, None);
  let feedback = view.feedback.ok_or(TriviaError::SessionAborted)?;
  info!(target: "trivia", %id, correct = feedback.correct, score = feedback.score, "Answer evaluated");
  Ok(feedback)
}

/// Wait out the feedback delay, then advance the session.
/// Returns the new view, or `None` if the session was discarded meanwhile.
#[instrument(level = "debug", skip(state), fields(%id))]
pub async fn finish_feedback_after_delay(state: &AppState, id: Uuid) -> Option<GameView> {
  tokio::time::sleep(state.config.feedback_delay()).await;
  let entry = state.finish_feedback(id).await?;
  Some(to_view(id, &entry.session, entry.high_score))
}

/// Detached variant for request/response clients that poll the game afterwards.
pub fn schedule_feedback_end(state: Arc<AppState>, id: Uuid) {
  tokio::spawn(async move {
    if finish_feedback_after_delay(&state, id).await.is_none() {
      debug!(target: "trivia", %id, "Session gone before feedback ended");
    }
  });
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn replay(state: &AppState, id: Uuid) -> Result<GameView, TriviaError> {
  let (new_id, entry) = state.replay(id).await?;
  info!(target: "trivia", old = %id, new = %new_id, "Replaying with same filters");
  Ok(to_view(new_id, &entry.session, entry.high_score))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn abandon(state: &AppState, id: Uuid) -> Result<(), TriviaError> {
  state.abandon(id).await?;
  info!(target: "trivia", %id, "Game abandoned");
  Ok(())
}
