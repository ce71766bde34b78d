//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{body::Bytes, extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::TriviaError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, countries: state.countries.len() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_rules(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(logic::rules(&state))
}

#[instrument(level = "info", skip(state), fields(region = ?q.region, difficulty = ?q.difficulty))]
pub async fn http_get_pool(
  State(state): State<Arc<AppState>>,
  Query(q): Query<FiltersIn>,
) -> Result<Json<PoolOut>, TriviaError> {
  let (region, difficulty) = logic::parse_filters(q.region.as_deref(), q.difficulty.as_deref())?;
  Ok(Json(logic::pool_summary(&state, region, difficulty)))
}

/// An empty body starts a game with the default filters; anything else must be valid JSON.
#[instrument(level = "info", skip(state, body))]
pub async fn http_post_game(
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> Result<(StatusCode, Json<GameView>), TriviaError> {
  let body = if body.iter().all(u8::is_ascii_whitespace) {
    FiltersIn::default()
  } else {
    let Json(filters) = Json::<FiltersIn>::from_bytes(&body).map_err(|e| TriviaError::InvalidJson(e.body_text()))?;
    filters
  };
  let (region, difficulty) = logic::parse_filters(body.region.as_deref(), body.difficulty.as_deref())?;
  let view = logic::start_game(&state, region, difficulty).await?;
  info!(target: "trivia", id = %view.id, %region, %difficulty, "HTTP game started");
  Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_game(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<GameView>, TriviaError> {
  Ok(Json(logic::game_view(&state, id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%id))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<FeedbackOut>, TriviaError> {
  let feedback = logic::submit_answer(&state, id, &body.answer).await?;
  logic::schedule_feedback_end(state.clone(), id);
  info!(target: "trivia", %id, correct = feedback.correct, score = feedback.score, "HTTP answer evaluated");
  Ok(Json(feedback))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_post_replay(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<GameView>), TriviaError> {
  let view = logic::replay(&state, id).await?;
  Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_delete_game(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, TriviaError> {
  logic::abandon(&state, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_high_score(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HighScoreOut { best: state.best_score().await })
}
