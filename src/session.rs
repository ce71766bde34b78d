//! Game session state machine.
//!
//! ```text
//! AwaitingAnswer --apply_answer--> Feedback --advance--> AwaitingAnswer (next question / country)
//!                                           \--advance--> Complete        (after the last country)
//! ```
//!
//! Transitions never mutate in place: `apply_answer` and `advance` return the
//! next session value, so the whole flow can be exercised without a transport.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::domain::{
  Country, Difficulty, Region, BONUS_PER_COUNTRY, PERFECT_SCORE, POINTS_PER_QUESTION, QUESTIONS_PER_COUNTRY,
};
use crate::error::TriviaError;
use crate::pool::build_pool;
use crate::question::{build_round, Answer, Question, Round};
use crate::sampler::sample_countries;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
  AwaitingAnswer,
  /// Answer recorded; input stays locked until `advance`.
  Feedback { correct: bool },
  Complete,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CountryResult {
  pub country: Country,
  pub correct_answers: u32,
  pub bonus_awarded: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
  pub total_score: u32,
  pub perfect: bool,
  pub details: Vec<CountryResult>,
}

#[derive(Clone, Debug)]
pub struct GameSession {
  region: Region,
  difficulty: Difficulty,
  rounds: Vec<Round>,
  country_index: usize,
  question_index: usize,
  score: u32,
  correct_for_country: u32,
  results: Vec<CountryResult>,
  phase: Phase,
}

impl GameSession {
  /// Filter the reference list, sample the game countries and pre-generate every question.
  pub fn start<R: Rng + ?Sized>(
    countries: &[Country],
    region: Region,
    difficulty: Difficulty,
    rng: &mut R,
  ) -> Result<Self, TriviaError> {
    let pool = build_pool(countries, region, difficulty);
    let selected = sample_countries(&pool, rng)?;
    let rounds = selected.iter().map(|c| build_round(c, &selected, &pool, rng)).collect();
    debug!(target: "trivia", %region, %difficulty, pool = pool.len(), "Game session started");
    Ok(Self::from_rounds(region, difficulty, rounds))
  }

  pub(crate) fn from_rounds(region: Region, difficulty: Difficulty, rounds: Vec<Round>) -> Self {
    Self {
      region,
      difficulty,
      rounds,
      country_index: 0,
      question_index: 0,
      score: 0,
      correct_for_country: 0,
      results: Vec::new(),
      phase: Phase::AwaitingAnswer,
    }
  }

  pub fn region(&self) -> Region { self.region }
  pub fn difficulty(&self) -> Difficulty { self.difficulty }
  pub fn phase(&self) -> Phase { self.phase }
  pub fn score(&self) -> u32 { self.score }
  pub fn country_index(&self) -> usize { self.country_index }
  pub fn question_index(&self) -> usize { self.question_index }
  pub fn countries_total(&self) -> usize { self.rounds.len() }

  /// The question being asked (or just answered, while in feedback). `None` once complete.
  pub fn current_question(&self) -> Option<&Question> {
    if self.phase == Phase::Complete {
      return None;
    }
    self.rounds.get(self.country_index).and_then(|r| r.questions.get(self.question_index))
  }

  /// Record an answer for the current question and move into feedback.
  pub fn apply_answer(&self, answer: &Answer) -> Result<Self, TriviaError> {
    match self.phase {
      Phase::Feedback { .. } => return Err(TriviaError::InputLocked),
      Phase::Complete => return Err(TriviaError::GameFinished),
      Phase::AwaitingAnswer => {}
    }
    let question = self.current_question().ok_or(TriviaError::SessionAborted)?;
    let correct = question.judge(answer)?;

    let mut next = self.clone();
    if correct {
      next.score += POINTS_PER_QUESTION;
      next.correct_for_country += 1;
    }
    next.phase = Phase::Feedback { correct };
    Ok(next)
  }

  /// Leave feedback: next question, next country (with the bonus check), or completion.
  /// Outside of feedback the session is returned unchanged.
  pub fn advance(&self) -> Self {
    let mut next = self.clone();
    if !matches!(self.phase, Phase::Feedback { .. }) {
      return next;
    }

    if next.question_index + 1 < QUESTIONS_PER_COUNTRY {
      next.question_index += 1;
      next.phase = Phase::AwaitingAnswer;
      return next;
    }

    let bonus_awarded = if next.correct_for_country == QUESTIONS_PER_COUNTRY as u32 { BONUS_PER_COUNTRY } else { 0 };
    next.score += bonus_awarded;
    if let Some(round) = next.rounds.get(next.country_index) {
      next.results.push(CountryResult {
        country: round.country.clone(),
        correct_answers: next.correct_for_country,
        bonus_awarded,
      });
    }
    next.correct_for_country = 0;

    if next.country_index + 1 < next.rounds.len() {
      next.country_index += 1;
      next.question_index = 0;
      next.phase = Phase::AwaitingAnswer;
    } else {
      next.phase = Phase::Complete;
      debug!(target: "trivia", score = next.score, "Game session complete");
    }
    next
  }

  /// Final result, including the last country's bonus. Only available once complete.
  pub fn result(&self) -> Option<GameResult> {
    if self.phase != Phase::Complete {
      return None;
    }
    Some(GameResult {
      total_score: self.score,
      perfect: self.score == PERFECT_SCORE,
      details: self.results.clone(),
    })
  }
}
