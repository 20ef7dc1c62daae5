//! Public protocol structs for HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! Incoming DTOs are loose on purpose (strings, options); `validate()` turns them into
//! the typed inputs the core works with or an `ApiError`.

use serde::{Deserialize, Serialize};

use crate::domain::{AnswerEvaluation, Classification, Difficulty, Performance};
use crate::error::ApiError;

//
// Question generation
//

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsQuery {
    pub course_id: Option<String>,
    pub difficulty: Option<String>,
    pub topic_id: Option<String>,
    pub count: Option<String>,
    pub cultural_context: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct QuestionsParams {
    pub course_id: String,
    pub difficulty: Difficulty,
    pub topic_id: String,
    pub count: usize,
    pub cultural_context: String,
}

pub const DEFAULT_COUNT: usize = 5;

impl QuestionsQuery {
    pub fn validate(self) -> Result<QuestionsParams, ApiError> {
        let course_id = match self.course_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(ApiError::InvalidInput("courseId is required".into())),
        };
        ensure_integer_like("courseId", &course_id)?;

        let difficulty = match self.difficulty.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => d.parse::<Difficulty>().map_err(ApiError::InvalidInput)?,
            None => Difficulty::default(),
        };

        let count = match self.count.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| ApiError::InvalidInput(format!("count must be a non-negative integer, got '{}'", c)))?,
            None => DEFAULT_COUNT,
        };

        Ok(QuestionsParams {
            course_id,
            difficulty,
            topic_id: non_empty_or(self.topic_id, "water-cycle"),
            count,
            cultural_context: non_empty_or(self.cultural_context, "general"),
        })
    }
}

/// Course ids arrive either as JSON numbers or strings.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum IdIn {
    Num(u64),
    Text(String),
}

impl IdIn {
    pub fn into_string(self) -> String {
        match self {
            IdIn::Num(n) => n.to_string(),
            IdIn::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveIn {
    pub course_id: IdIn,
    pub user_performance: Performance,
    #[serde(default)]
    pub cultural_background: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
}

pub struct AdaptiveParams {
    pub course_id: String,
    pub performance: Performance,
    pub cultural_background: String,
    pub preferred_language: Option<String>,
}

impl AdaptiveIn {
    pub fn validate(self) -> Result<AdaptiveParams, ApiError> {
        let course_id = self.course_id.into_string();
        if course_id.is_empty() {
            return Err(ApiError::InvalidInput("courseId is required".into()));
        }
        ensure_integer_like("courseId", &course_id)?;
        let p = self.user_performance;
        if p.correct > p.total {
            return Err(ApiError::InvalidInput(format!(
                "userPerformance.correct ({}) cannot exceed userPerformance.total ({})",
                p.correct, p.total
            )));
        }
        Ok(AdaptiveParams {
            course_id,
            performance: p,
            cultural_background: non_empty_or(self.cultural_background, "general"),
            preferred_language: self.preferred_language.filter(|l| !l.trim().is_empty()),
        })
    }
}

//
// Answer feedback
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackIn {
    pub user_answer: String,
    pub correct_answer: String,
    pub question_id: IdIn,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub concept: String,
    #[serde(default = "default_attempt")]
    pub attempt_number: i64,
    #[serde(default)]
    pub course_id: Option<IdIn>,
    #[serde(default)]
    pub cultural_context: Option<String>,
}

fn default_attempt() -> i64 { 1 }

#[derive(Clone, Debug)]
pub struct FeedbackParams {
    pub user_answer: String,
    pub correct_answer: String,
    pub question_id: String,
    pub subject: String,
    pub concept: String,
    pub attempt_number: u32,
    pub course_id: Option<String>,
    pub cultural_context: Option<String>,
}

impl FeedbackIn {
    pub fn validate(self) -> Result<FeedbackParams, ApiError> {
        let question_id = self.question_id.into_string();
        if question_id.is_empty() {
            return Err(ApiError::InvalidInput("questionId is required".into()));
        }
        let attempt_number = u32::try_from(self.attempt_number)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| ApiError::InvalidInput(format!("attemptNumber must be >= 1, got {}", self.attempt_number)))?;
        Ok(FeedbackParams {
            user_answer: self.user_answer,
            correct_answer: self.correct_answer,
            question_id,
            subject: self.subject,
            concept: self.concept,
            attempt_number,
            course_id: self.course_id.map(IdIn::into_string).filter(|c| !c.is_empty()),
            cultural_context: self.cultural_context.filter(|c| !c.trim().is_empty()),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackOut {
    pub similarity: f64,
    pub classification: Classification,
    pub score: u32,
    pub attempt_number: u32,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub recommendations: Vec<String>,
}

impl FeedbackOut {
    pub fn new(ev: &AnswerEvaluation, hint: Option<String>, recommendations: Vec<String>) -> Self {
        Self {
            similarity: ev.similarity,
            classification: ev.classification,
            score: ev.score,
            attempt_number: ev.attempt_number,
            is_correct: ev.classification == Classification::Correct,
            hint,
            recommendations,
        }
    }
}

//
// Misc
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub error: String,
    pub message: String,
}

fn non_empty_or(v: Option<String>, default: &str) -> String {
    v.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn ensure_integer_like(field: &str, value: &str) -> Result<(), ApiError> {
    value
        .parse::<u64>()
        .map(|_| ())
        .map_err(|_| ApiError::InvalidInput(format!("{} must be a non-negative integer, got '{}'", field, value)))
}
