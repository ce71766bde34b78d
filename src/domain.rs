//! Domain models used by the trivia engine: countries, regions, difficulty tiers and game constants.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TriviaError;

pub const COUNTRIES_PER_GAME: usize = 5;
pub const QUESTIONS_PER_COUNTRY: usize = 3;
pub const POINTS_PER_QUESTION: u32 = 5;
pub const BONUS_PER_COUNTRY: u32 = 5;
/// Every question answered correctly plus every bonus.
pub const PERFECT_SCORE: u32 = (COUNTRIES_PER_GAME * QUESTIONS_PER_COUNTRY) as u32 * POINTS_PER_QUESTION
  + COUNTRIES_PER_GAME as u32 * BONUS_PER_COUNTRY;

/// One reference country record, already normalized from the upstream shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Country {
  pub id: String, // ISO-3 code (cca3)
  pub name: String,
  pub region: String,
  pub population: u64,
  pub capital: String,
  pub flag_url: String,
}

impl Country {
  /// Only countries with a capital and a population can be quizzed on.
  pub fn is_eligible(&self) -> bool {
    self.population > 0 && !self.capital.trim().is_empty()
  }
}

/// Region filter. `World` means no restriction.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Region {
  Africa,
  Asia,
  Americas,
  Europe,
  Oceania,
  #[default]
  World,
}

impl Region {
  pub const ALL: [Region; 6] = [
    Region::Africa,
    Region::Asia,
    Region::Americas,
    Region::Europe,
    Region::Oceania,
    Region::World,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Region::Africa => "Africa",
      Region::Asia => "Asia",
      Region::Americas => "Americas",
      Region::Europe => "Europe",
      Region::Oceania => "Oceania",
      Region::World => "World",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Region::World => "The World",
      other => other.as_str(),
    }
  }

  /// Exact match on the upstream region name, or anything for `World`.
  pub fn matches(&self, region: &str) -> bool {
    match self {
      Region::World => true,
      other => other.as_str() == region,
    }
  }
}

impl fmt::Display for Region {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Region {
  type Err = TriviaError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    Region::ALL
      .iter()
      .copied()
      .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| TriviaError::UnknownRegion(s.to_string()))
  }
}

/// Population-floor filter controlling how obscure the quizzed countries get.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  #[default]
  Hard,
  Expert,
}

impl Difficulty {
  pub const ALL: [Difficulty; 4] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Expert];

  pub fn min_population(&self) -> u64 {
    match self {
      Difficulty::Easy => 20_000_000,
      Difficulty::Medium => 5_000_000,
      Difficulty::Hard => 150_000,
      Difficulty::Expert => 0,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
      Difficulty::Expert => "expert",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Difficulty::Easy => "Easy (20,000,000+)",
      Difficulty::Medium => "Medium (5,000,000+)",
      Difficulty::Hard => "Hard (150,000+)",
      Difficulty::Expert => "Expert (All)",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Difficulty {
  type Err = TriviaError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    Difficulty::ALL
      .iter()
      .copied()
      .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| TriviaError::UnknownDifficulty(s.to_string()))
  }
}
