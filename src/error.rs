//! Error taxonomy for the trivia service, mapped onto HTTP responses.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::protocol::ErrorOut;

#[derive(Error, Debug)]
pub enum TriviaError {
  #[error("Not enough countries match your filters ({available} available, {required} needed)")]
  InsufficientPool { available: usize, required: usize },

  #[error("Country data fetch failed: {0}")]
  DataFetch(String),

  #[error("Unknown game session: {0}")]
  SessionNotFound(Uuid),

  #[error("Game session can no longer continue; return to configuration")]
  SessionAborted,

  #[error("Answer already submitted; wait for the next question")]
  InputLocked,

  #[error("Game is already complete")]
  GameFinished,

  #[error("Answer does not fit the question: {0}")]
  AnswerMismatch(String),

  #[error("Invalid JSON: {0}")]
  InvalidJson(String),

  #[error("Unknown region: {0}")]
  UnknownRegion(String),

  #[error("Unknown difficulty: {0}")]
  UnknownDifficulty(String),
}

impl TriviaError {
  /// Stable machine-readable code sent to clients next to the message.
  pub fn code(&self) -> &'static str {
    match self {
      TriviaError::InsufficientPool { .. } => "insufficient_pool",
      TriviaError::DataFetch(_) => "data_fetch",
      TriviaError::SessionNotFound(_) => "session_not_found",
      TriviaError::SessionAborted => "session_aborted",
      TriviaError::InputLocked => "input_locked",
      TriviaError::GameFinished => "game_finished",
      TriviaError::AnswerMismatch(_) => "answer_mismatch",
      TriviaError::InvalidJson(_) => "invalid_json",
      TriviaError::UnknownRegion(_) => "unknown_region",
      TriviaError::UnknownDifficulty(_) => "unknown_difficulty",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      TriviaError::InsufficientPool { .. }
      | TriviaError::SessionAborted
      | TriviaError::InputLocked
      | TriviaError::GameFinished => StatusCode::CONFLICT,
      TriviaError::SessionNotFound(_) => StatusCode::NOT_FOUND,
      TriviaError::AnswerMismatch(_)
      | TriviaError::InvalidJson(_)
      | TriviaError::UnknownRegion(_)
      | TriviaError::UnknownDifficulty(_) => StatusCode::BAD_REQUEST,
      TriviaError::DataFetch(_) => StatusCode::BAD_GATEWAY,
    }
  }

  pub fn to_out(&self) -> ErrorOut {
    let available = match self {
      TriviaError::InsufficientPool { available, .. } => Some(*available),
      _ => None,
    };
    ErrorOut { code: self.code(), message: self.to_string(), available }
  }
}

impl IntoResponse for TriviaError {
  fn into_response(self) -> Response {
    (self.status(), Json(self.to_out())).into_response()
  }
}
