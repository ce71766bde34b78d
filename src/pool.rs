//! Country pool building: region + difficulty filtering over the reference list.

use serde::Serialize;

use crate::domain::{Country, Difficulty, Region, COUNTRIES_PER_GAME};
use crate::error::TriviaError;

/// Countries eligible for a game with the given filters, in reference order.
pub fn build_pool(countries: &[Country], region: Region, difficulty: Difficulty) -> Vec<Country> {
  let min_population = difficulty.min_population();
  countries
    .iter()
    .filter(|c| c.is_eligible())
    .filter(|c| c.population >= min_population)
    .filter(|c| region.matches(&c.region))
    .cloned()
    .collect()
}

/// A game needs at least `COUNTRIES_PER_GAME` candidates; anything less aborts the start.
pub fn ensure_playable(pool: &[Country]) -> Result<(), TriviaError> {
  if pool.len() < COUNTRIES_PER_GAME {
    return Err(TriviaError::InsufficientPool { available: pool.len(), required: COUNTRIES_PER_GAME });
  }
  Ok(())
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TierAvailability {
  pub difficulty: Difficulty,
  pub label: &'static str,
  pub min_population: u64,
  pub available: usize,
  pub playable: bool,
}

/// Pool size for every difficulty tier within a region.
pub fn availability(countries: &[Country], region: Region) -> Vec<TierAvailability> {
  Difficulty::ALL
    .iter()
    .map(|&difficulty| {
      let available = build_pool(countries, region, difficulty).len();
      TierAvailability {
        difficulty,
        label: difficulty.label(),
        min_population: difficulty.min_population(),
        available,
        playable: available >= COUNTRIES_PER_GAME,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::seed_countries;

  #[test]
  fn every_pool_member_satisfies_filters() {
    let countries = seed_countries();
    for region in Region::ALL {
      for difficulty in Difficulty::ALL {
        for c in build_pool(&countries, region, difficulty) {
          assert!(c.population >= difficulty.min_population(), "{} under {}", c.name, difficulty);
          assert!(c.population > 0);
          assert!(!c.capital.is_empty());
          assert!(region == Region::World || c.region == region.as_str());
        }
      }
    }
  }

  #[test]
  fn world_hard_pool_excludes_small_and_ineligible() {
    let pool = build_pool(&seed_countries(), Region::World, Difficulty::Hard);
    assert_eq!(pool.len(), 17);
    assert!(pool.iter().all(|c| c.name != "Monaco" && c.name != "Antarctica"));
    assert!(pool.iter().any(|c| c.name == "Curaçao"));
  }

  #[test]
  fn expert_keeps_tiny_countries_but_not_ineligible_ones() {
    let pool = build_pool(&seed_countries(), Region::World, Difficulty::Expert);
    assert!(pool.iter().any(|c| c.name == "Pitcairn Islands"));
    assert!(pool.iter().all(|c| c.region != "Antarctic"));
  }

  #[test]
  fn small_pool_is_not_playable() {
    let pool = build_pool(&seed_countries(), Region::Oceania, Difficulty::Easy);
    assert_eq!(pool.len(), 1);
    match ensure_playable(&pool) {
      Err(TriviaError::InsufficientPool { available, required }) => {
        assert_eq!(available, 1);
        assert_eq!(required, COUNTRIES_PER_GAME);
      }
      other => panic!("expected insufficient pool, got {:?}", other),
    }
    assert!(ensure_playable(&[]).is_err());
  }

  #[test]
  fn availability_reports_each_tier() {
    let tiers = availability(&seed_countries(), Region::Oceania);
    let counts: Vec<(Difficulty, usize, bool)> = tiers.iter().map(|t| (t.difficulty, t.available, t.playable)).collect();
    assert_eq!(
      counts,
      vec![
        (Difficulty::Easy, 1, false),
        (Difficulty::Medium, 2, false),
        (Difficulty::Hard, 3, false),
        (Difficulty::Expert, 5, true),
      ]
    );
  }
}
