//! Game sampling: a uniformly random subset of the pool, drawn without replacement.

use rand::{seq::SliceRandom, Rng};

use crate::domain::{Country, COUNTRIES_PER_GAME};
use crate::error::TriviaError;
use crate::pool::ensure_playable;

/// Fisher-Yates shuffle a copy of the pool and keep the first `COUNTRIES_PER_GAME`.
pub fn sample_countries<R: Rng + ?Sized>(pool: &[Country], rng: &mut R) -> Result<Vec<Country>, TriviaError> {
  ensure_playable(pool)?;
  let mut copy = pool.to_vec();
  copy.shuffle(rng);
  copy.truncate(COUNTRIES_PER_GAME);
  Ok(copy)
}
