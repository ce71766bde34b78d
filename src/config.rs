//! Loading service configuration from TOML.
//!
//! Every key is optional; see `TriviaConfig` for the schema and defaults.

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_COUNTRIES_URL: &str =
  "https://restcountries.com/v3.1/all?fields=cca3,name,region,population,capital,flags";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TriviaConfig {
  /// REST Countries compatible endpoint returning the full reference list.
  pub countries_url: String,
  /// Local JSON snapshot with the same shape; takes precedence over the URL.
  pub countries_file: Option<PathBuf>,
  pub fetch_timeout_secs: u64,
  /// How long answer feedback is shown before the game moves on.
  pub feedback_delay_ms: u64,
  /// Where the best score is kept between restarts. In-memory only when unset.
  pub high_score_path: Option<PathBuf>,
  /// Sessions untouched for this long are dropped when a new game starts.
  pub session_ttl_secs: u64,
  /// Upper bound on live sessions; the least recently used go first.
  pub max_sessions: usize,
}

impl Default for TriviaConfig {
  fn default() -> Self {
    Self {
      countries_url: DEFAULT_COUNTRIES_URL.into(),
      countries_file: None,
      fetch_timeout_secs: 20,
      feedback_delay_ms: 800,
      high_score_path: None,
      session_ttl_secs: 60 * 60,
      max_sessions: 10_000,
    }
  }
}

impl TriviaConfig {
  pub fn feedback_delay(&self) -> Duration { Duration::from_millis(self.feedback_delay_ms) }
  pub fn fetch_timeout(&self) -> Duration { Duration::from_secs(self.fetch_timeout_secs) }
  pub fn session_ttl(&self) -> Duration { Duration::from_secs(self.session_ttl_secs) }
}

/// Load `TriviaConfig` from TRIVIA_CONFIG_PATH. On any parsing/IO error, returns the defaults.
pub fn load_config_from_env() -> TriviaConfig {
  let Ok(path) = std::env::var("TRIVIA_CONFIG_PATH") else {
    info!(target: "roampedia_trivia", "TRIVIA_CONFIG_PATH not set; using default config");
    return TriviaConfig::default();
  };
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<TriviaConfig>(&s) {
      Ok(cfg) => {
        info!(target: "roampedia_trivia", %path, "Loaded trivia config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "roampedia_trivia", %path, error = %e, "Failed to parse TOML config; using defaults");
        TriviaConfig::default()
      }
    },
    Err(e) => {
      error!(target: "roampedia_trivia", %path, error = %e, "Failed to read TOML config file; using defaults");
      TriviaConfig::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_toml_yields_defaults() {
    let cfg: TriviaConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.countries_url, DEFAULT_COUNTRIES_URL);
    assert_eq!(cfg.feedback_delay(), Duration::from_millis(800));
    assert_eq!(cfg.fetch_timeout(), Duration::from_secs(20));
    assert!(cfg.countries_file.is_none());
    assert!(cfg.high_score_path.is_none());
    assert_eq!(cfg.session_ttl(), Duration::from_secs(3600));
    assert_eq!(cfg.max_sessions, 10_000);
  }

  #[test]
  fn partial_toml_overrides_keys() {
    let cfg: TriviaConfig = toml::from_str(
      r#"
        feedback_delay_ms = 250
        countries_file = "data/countries.json"
        high_score_path = "/var/lib/trivia/best.json"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.feedback_delay_ms, 250);
    assert_eq!(cfg.countries_file, Some(PathBuf::from("data/countries.json")));
    assert_eq!(cfg.high_score_path, Some(PathBuf::from("/var/lib/trivia/best.json")));
    assert_eq!(cfg.fetch_timeout_secs, 20);
  }
}
