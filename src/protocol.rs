//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Question views never carry the correct answer; feedback does.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
  Difficulty, Region, BONUS_PER_COUNTRY, COUNTRIES_PER_GAME, PERFECT_SCORE, POINTS_PER_QUESTION, QUESTIONS_PER_COUNTRY,
};
use crate::highscore::HighScoreUpdate;
use crate::pool::TierAvailability;
use crate::question::{Answer, Question};
use crate::session::{GameSession, Phase};
use crate::util::format_thousands;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Rules,
    Pool {
        #[serde(default)]
        region: Option<String>,
        #[serde(default)]
        difficulty: Option<String>,
    },
    StartGame {
        #[serde(default)]
        region: Option<String>,
        #[serde(default)]
        difficulty: Option<String>,
    },
    GetGame {
        #[serde(rename = "gameId")]
        game_id: Uuid,
    },
    SubmitAnswer {
        #[serde(rename = "gameId")]
        game_id: Uuid,
        answer: Answer,
    },
    Replay {
        #[serde(rename = "gameId")]
        game_id: Uuid,
    },
    Abandon {
        #[serde(rename = "gameId")]
        game_id: Uuid,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Rules {
        rules: RulesOut,
    },
    Pool {
        pool: PoolOut,
    },
    Game {
        game: GameView,
    },
    Feedback {
        #[serde(rename = "gameId")]
        game_id: Uuid,
        feedback: FeedbackOut,
    },
    Abandoned {
        #[serde(rename = "gameId")]
        game_id: Uuid,
    },
    Error {
        code: &'static str,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        available: Option<usize>,
    },
}

impl From<ErrorOut> for ServerWsMessage {
    fn from(e: ErrorOut) -> Self {
        ServerWsMessage::Error { code: e.code, message: e.message, available: e.available }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<usize>,
}

//
// Game views
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseOut {
    AwaitingAnswer,
    Feedback,
    Complete,
}

#[derive(Debug, Serialize)]
pub struct PopulationOptionOut {
    pub value: u64,
    pub label: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionView {
    Flag {
        prompt: String,
        #[serde(rename = "flagUrl")]
        flag_url: String,
        options: Vec<String>,
    },
    Capital {
        prompt: String,
        #[serde(rename = "countryName")]
        country_name: String,
    },
    Population {
        prompt: String,
        #[serde(rename = "countryName")]
        country_name: String,
        options: Vec<PopulationOptionOut>,
    },
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        match q {
            Question::FlagChoice { flag_url, options, .. } => QuestionView::Flag {
                prompt: "Which country does this flag belong to?".into(),
                flag_url: flag_url.clone(),
                options: options.clone(),
            },
            Question::CapitalText { country_name, .. } => QuestionView::Capital {
                prompt: format!("What is the capital of {}?", country_name),
                country_name: country_name.clone(),
            },
            Question::PopulationChoice { country_name, options, .. } => QuestionView::Population {
                prompt: format!("Which is closest to {}'s population?", country_name),
                country_name: country_name.clone(),
                options: options
                    .iter()
                    .map(|&value| PopulationOptionOut { value, label: format_thousands(value) })
                    .collect(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackOut {
    pub correct: bool,
    pub expected: String,
    pub score: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryResultOut {
    pub country_id: String,
    pub country_name: String,
    pub correct_answers: u32,
    pub bonus_awarded: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultOut {
    pub total_score: u32,
    pub perfect: bool,
    pub details: Vec<CountryResultOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_score: Option<HighScoreUpdate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub id: Uuid,
    pub region: Region,
    pub difficulty: Difficulty,
    pub phase: PhaseOut,
    /// 1-based.
    pub country_number: usize,
    pub countries_total: usize,
    /// 1-based.
    pub question_number: usize,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultOut>,
}

/// Convert a session (internal) to the public view.
pub fn to_view(id: Uuid, s: &GameSession, high_score: Option<HighScoreUpdate>) -> GameView {
    let question = s.current_question();
    let (phase, feedback) = match s.phase() {
        Phase::AwaitingAnswer => (PhaseOut::AwaitingAnswer, None),
        Phase::Feedback { correct } => (
            PhaseOut::Feedback,
            question.map(|q| FeedbackOut { correct, expected: q.expected(), score: s.score() }),
        ),
        Phase::Complete => (PhaseOut::Complete, None),
    };
    let result = s.result().map(|r| ResultOut {
        total_score: r.total_score,
        perfect: r.perfect,
        details: r
            .details
            .into_iter()
            .map(|d| CountryResultOut {
                country_id: d.country.id,
                country_name: d.country.name,
                correct_answers: d.correct_answers,
                bonus_awarded: d.bonus_awarded,
            })
            .collect(),
        high_score,
    });
    GameView {
        id,
        region: s.region(),
        difficulty: s.difficulty(),
        phase,
        country_number: (s.country_index() + 1).min(s.countries_total()),
        countries_total: s.countries_total(),
        question_number: s.question_index() + 1,
        score: s.score(),
        question: question.map(QuestionView::from),
        feedback,
        result,
    }
}

//
// Rules / pool
//

#[derive(Debug, Serialize)]
pub struct RegionOut {
    pub id: Region,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyOut {
    pub id: Difficulty,
    pub label: &'static str,
    pub min_population: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesOut {
    pub countries_per_game: usize,
    pub questions_per_country: usize,
    pub points_per_question: u32,
    pub bonus_per_country: u32,
    pub perfect_score: u32,
    pub feedback_delay_ms: u64,
    pub regions: Vec<RegionOut>,
    pub difficulties: Vec<DifficultyOut>,
}

impl RulesOut {
    pub fn new(feedback_delay_ms: u64) -> Self {
        Self {
            countries_per_game: COUNTRIES_PER_GAME,
            questions_per_country: QUESTIONS_PER_COUNTRY,
            points_per_question: POINTS_PER_QUESTION,
            bonus_per_country: BONUS_PER_COUNTRY,
            perfect_score: PERFECT_SCORE,
            feedback_delay_ms,
            regions: Region::ALL.iter().map(|&id| RegionOut { id, label: id.label() }).collect(),
            difficulties: Difficulty::ALL
                .iter()
                .map(|&id| DifficultyOut { id, label: id.label(), min_population: id.min_population() })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PoolOut {
    pub region: Region,
    pub difficulty: Difficulty,
    pub available: usize,
    pub playable: bool,
    pub tiers: Vec<TierAvailability>,
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Default, Deserialize)]
pub struct FiltersIn {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    pub answer: Answer,
}

#[derive(Serialize)]
pub struct HighScoreOut {
    pub best: u32,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub countries: usize,
}
