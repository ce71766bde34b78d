//! Question generation and answer judging.
//!
//! Each sampled country yields three questions in a fixed order:
//!   1. flag identification (multiple choice over country names)
//!   2. capital (free text, compared after normalization)
//!   3. population estimate (multiple choice over scaled populations)
//!
//! All randomness comes from the caller's `Rng`, so a seeded generator
//! reproduces a whole game.

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::domain::{Country, QUESTIONS_PER_COUNTRY};
use crate::error::TriviaError;
use crate::util::{format_thousands, normalize_answer};

pub const FLAG_DISTRACTORS: usize = 3;
pub const UNKNOWN_OPTION: &str = "Unknown";
/// Neighbouring population options, in quarters of the true value (0.75 and 1.25).
const LOWER_QUARTERS: u128 = 3;
const UPPER_QUARTERS: u128 = 5;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  Flag,
  Capital,
  Population,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Question {
  FlagChoice { flag_url: String, options: Vec<String>, correct: usize },
  CapitalText { country_name: String, capital: String },
  PopulationChoice { country_name: String, options: Vec<u64>, correct: usize },
}

/// What the player submitted for the current question.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Answer {
  Choice { option: usize },
  Text { text: String },
}

impl Question {
  pub fn kind(&self) -> QuestionKind {
    match self {
      Question::FlagChoice { .. } => QuestionKind::Flag,
      Question::CapitalText { .. } => QuestionKind::Capital,
      Question::PopulationChoice { .. } => QuestionKind::Population,
    }
  }

  /// Human-readable correct answer, shown as feedback after a wrong guess.
  pub fn expected(&self) -> String {
    match self {
      Question::FlagChoice { options, correct, .. } => options[*correct].clone(),
      Question::CapitalText { capital, .. } => capital.clone(),
      Question::PopulationChoice { options, correct, .. } => format_thousands(options[*correct]),
    }
  }

  /// Decide whether `answer` is right. An answer of the wrong shape, or a choice
  /// outside the offered options, is a protocol error rather than a wrong answer.
  pub fn judge(&self, answer: &Answer) -> Result<bool, TriviaError> {
    match (self, answer) {
      (Question::FlagChoice { options, correct, .. }, Answer::Choice { option }) => {
        check_option(*option, options.len())?;
        Ok(option == correct)
      }
      (Question::PopulationChoice { options, correct, .. }, Answer::Choice { option }) => {
        check_option(*option, options.len())?;
        Ok(option == correct)
      }
      (Question::CapitalText { capital, .. }, Answer::Text { text }) => Ok(is_capital_correct(text, capital)),
      (q, _) => Err(TriviaError::AnswerMismatch(format!("{:?} question needs a {} answer", q.kind(), expected_shape(q)))),
    }
  }
}

fn expected_shape(q: &Question) -> &'static str {
  match q {
    Question::CapitalText { .. } => "text",
    _ => "choice",
  }
}

fn check_option(option: usize, len: usize) -> Result<(), TriviaError> {
  if option >= len {
    return Err(TriviaError::AnswerMismatch(format!("option {} out of range (0..{})", option, len)));
  }
  Ok(())
}

/// Free-text capital check. Blank input never matches.
pub fn is_capital_correct(typed: &str, capital: &str) -> bool {
  let typed = normalize_answer(typed);
  !typed.is_empty() && typed == normalize_answer(capital)
}

/// Four shuffled names: the correct one plus three distractors.
///
/// Distractors come from the other countries of this game first, then from the
/// rest of the pool, and only as a last resort from the `"Unknown"` literal.
pub fn flag_options<R: Rng + ?Sized>(
  correct_name: &str,
  game_countries: &[Country],
  pool: &[Country],
  rng: &mut R,
) -> (Vec<String>, usize) {
  let mut distractors: Vec<String> = Vec::with_capacity(FLAG_DISTRACTORS);

  let mut in_game: Vec<&str> = game_countries.iter().map(|c| c.name.as_str()).collect();
  in_game.shuffle(rng);
  take_distinct(&mut distractors, correct_name, in_game);

  if distractors.len() < FLAG_DISTRACTORS {
    let mut backfill: Vec<&str> = pool.iter().map(|c| c.name.as_str()).collect();
    backfill.shuffle(rng);
    take_distinct(&mut distractors, correct_name, backfill);
  }

  while distractors.len() < FLAG_DISTRACTORS {
    distractors.push(UNKNOWN_OPTION.to_string());
  }

  let mut options = Vec::with_capacity(FLAG_DISTRACTORS + 1);
  options.push(correct_name.to_string());
  options.extend(distractors);
  options.shuffle(rng);
  let correct = options.iter().position(|o| o == correct_name).unwrap_or(0);
  (options, correct)
}

fn take_distinct<'a>(into: &mut Vec<String>, correct_name: &str, candidates: impl IntoIterator<Item = &'a str>) {
  for name in candidates {
    if into.len() >= FLAG_DISTRACTORS {
      break;
    }
    if name != correct_name && !into.iter().any(|d| d == name) {
      into.push(name.to_string());
    }
  }
}

/// Three strictly ascending population options with the exact value among them.
///
/// The neighbours are 0.75x and 1.25x the population, rounded half up in integer
/// arithmetic so large values keep full precision. For populations so small that
/// rounding would collapse a neighbour onto the exact value, it is nudged by one.
/// The exact value sits in the middle unless there is no room above it.
pub fn population_options(population: u64) -> (Vec<u64>, usize) {
  let lower = scale_quarters(population, LOWER_QUARTERS).min(population.saturating_sub(1));
  let upper = scale_quarters(population, UPPER_QUARTERS).max(population.saturating_add(1));
  if upper > population {
    (vec![lower, population, upper], 1)
  } else {
    // u64::MAX: nothing fits above
    (vec![lower.saturating_sub(1), lower, population], 2)
  }
}

fn scale_quarters(population: u64, quarters: u128) -> u64 {
  let scaled = (u128::from(population) * quarters + 2) / 4;
  u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// The three questions asked about one country.
#[derive(Clone, Debug, PartialEq)]
pub struct Round {
  pub country: Country,
  pub questions: [Question; QUESTIONS_PER_COUNTRY],
}

pub fn build_round<R: Rng + ?Sized>(country: &Country, game_countries: &[Country], pool: &[Country], rng: &mut R) -> Round {
  let (flag_opts, flag_correct) = flag_options(&country.name, game_countries, pool, rng);
  let (pop_opts, pop_correct) = population_options(country.population);
  Round {
    country: country.clone(),
    questions: [
      Question::FlagChoice { flag_url: country.flag_url.clone(), options: flag_opts, correct: flag_correct },
      Question::CapitalText { country_name: country.name.clone(), capital: country.capital.clone() },
      Question::PopulationChoice { country_name: country.name.clone(), options: pop_opts, correct: pop_correct },
    ],
  }
}
