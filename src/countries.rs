//! Reference country data: fetched once from a REST Countries compatible API
//! (or read from a local JSON snapshot) and normalized into `Country` records.
//!
//! A failed load is never fatal. The caller gets an empty list, which the pool
//! builder then reports as "insufficient data".

use std::path::Path;

use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::config::TriviaConfig;
use crate::domain::Country;
use crate::error::TriviaError;
use crate::util::trunc_for_log;

/// Upstream record shape (REST Countries v3.1). Every field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCountry {
  cca3: String,
  name: RawName,
  region: String,
  population: u64,
  capital: Vec<String>,
  flags: RawFlags,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawName {
  common: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFlags {
  svg: Option<String>,
  png: Option<String>,
}

impl From<RawCountry> for Country {
  fn from(raw: RawCountry) -> Self {
    let flag_url = raw
      .flags
      .svg
      .filter(|s| !s.is_empty())
      .or(raw.flags.png)
      .unwrap_or_default();
    Country {
      id: raw.cca3,
      name: raw.name.common,
      region: raw.region,
      population: raw.population,
      capital: raw.capital.into_iter().next().unwrap_or_default(),
      flag_url,
    }
  }
}

/// Parse an upstream JSON array into normalized countries.
pub fn parse_countries(json: &str) -> Result<Vec<Country>, TriviaError> {
  let raw: Vec<RawCountry> = serde_json::from_str(json)
    .map_err(|e| TriviaError::DataFetch(format!("JSON parse error: {}", e)))?;
  Ok(raw.into_iter().map(Country::from).collect())
}

#[derive(Clone)]
pub struct CountrySource {
  pub client: reqwest::Client,
  pub url: String,
}

impl CountrySource {
  pub fn new(cfg: &TriviaConfig) -> Result<Self, TriviaError> {
    let client = reqwest::Client::builder()
      .timeout(cfg.fetch_timeout())
      .build()
      .map_err(|e| TriviaError::DataFetch(e.to_string()))?;
    Ok(Self { client, url: cfg.countries_url.clone() })
  }

  #[instrument(level = "info", skip(self), fields(url = %self.url))]
  pub async fn fetch(&self) -> Result<Vec<Country>, TriviaError> {
    let start = std::time::Instant::now();
    let res = self.client.get(&self.url)
      .header(USER_AGENT, "roampedia-trivia/0.1")
      .header(ACCEPT, "application/json")
      .send().await.map_err(|e| TriviaError::DataFetch(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      return Err(TriviaError::DataFetch(format!("HTTP {}: {}", status, trunc_for_log(&body, 200))));
    }

    let body = res.text().await.map_err(|e| TriviaError::DataFetch(e.to_string()))?;
    let countries = parse_countries(&body)?;
    info!(elapsed = ?start.elapsed(), bytes = body.len(), count = countries.len(), "Country list fetched");
    Ok(countries)
  }
}

#[instrument(level = "info", skip(path), fields(path = %path.display()))]
pub fn read_countries_file(path: &Path) -> Result<Vec<Country>, TriviaError> {
  let json = std::fs::read_to_string(path)
    .map_err(|e| TriviaError::DataFetch(format!("{}: {}", path.display(), e)))?;
  parse_countries(&json)
}

/// Load the reference list per config. Failures are logged and yield an empty list.
pub async fn load_reference_countries(cfg: &TriviaConfig) -> Vec<Country> {
  let loaded = match &cfg.countries_file {
    Some(path) => read_countries_file(path),
    None => match CountrySource::new(cfg) {
      Ok(source) => source.fetch().await,
      Err(e) => Err(e),
    },
  };
  match loaded {
    Ok(countries) => {
      let eligible = countries.iter().filter(|c| c.is_eligible()).count();
      info!(target: "roampedia_trivia", total = countries.len(), eligible, "Reference countries loaded");
      countries
    }
    Err(e) => {
      error!(target: "roampedia_trivia", error = %e, "Loading reference countries failed; every pool will be empty");
      Vec::new()
    }
  }
}
