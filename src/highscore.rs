//! Best-score-so-far store: a single integer, optionally persisted as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreFile {
  best: u32,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreUpdate {
  pub previous: u32,
  pub best: u32,
  pub new_high_score: bool,
}

#[derive(Debug, Default)]
pub struct HighScoreStore {
  best: u32,
  path: Option<PathBuf>,
}

impl HighScoreStore {
  /// Read the stored best score. A missing or unreadable file starts at 0.
  pub fn load(path: Option<PathBuf>) -> Self {
    let best = path.as_deref().map(read_best).unwrap_or(0);
    Self { best, path }
  }

  pub fn best(&self) -> u32 { self.best }

  /// Keep `score` if it beats the current best.
  pub fn record(&mut self, score: u32) -> HighScoreUpdate {
    let previous = self.best;
    let new_high_score = score > previous;
    if new_high_score {
      self.best = score;
      info!(target: "trivia", previous, best = score, "New high score");
      if let Some(path) = &self.path {
        write_best(path, score);
      }
    }
    HighScoreUpdate { previous, best: self.best, new_high_score }
  }
}

fn read_best(path: &Path) -> u32 {
  match std::fs::read_to_string(path) {
    Ok(s) => match serde_json::from_str::<HighScoreFile>(&s) {
      Ok(f) => f.best,
      Err(e) => {
        warn!(target: "trivia", path = %path.display(), error = %e, "Ignoring malformed high score file");
        0
      }
    },
    Err(_) => 0,
  }
}

fn write_best(path: &Path, best: u32) {
  let body = match serde_json::to_string(&HighScoreFile { best }) {
    Ok(b) => b,
    Err(e) => {
      error!(target: "trivia", error = %e, "High score serialization failed");
      return;
    }
  };
  if let Err(e) = std::fs::write(path, body) {
    error!(target: "trivia", path = %path.display(), error = %e, "Persisting high score failed");
  }
}
