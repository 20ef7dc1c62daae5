//! Domain models used by the backend: templates, generated questions, difficulty tiers,
//! performance counters and answer evaluations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Difficulty tier. A batch-level label; it does not change which templates are picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}
impl Default for Difficulty {
  fn default() -> Self { Difficulty::Beginner }
}

impl Difficulty {
  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Beginner => "beginner",
      Difficulty::Intermediate => "intermediate",
      Difficulty::Advanced => "advanced",
    }
  }

  /// `>= 80` advanced, `>= 50` intermediate, anything below is beginner.
  pub fn from_percentage(percentage: f64) -> Self {
    if percentage >= 80.0 {
      Difficulty::Advanced
    } else if percentage >= 50.0 {
      Difficulty::Intermediate
    } else {
      Difficulty::Beginner
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Difficulty {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "beginner" => Ok(Difficulty::Beginner),
      "intermediate" => Ok(Difficulty::Intermediate),
      "advanced" => Ok(Difficulty::Advanced),
      other => Err(format!("unknown difficulty '{}' (expected beginner|intermediate|advanced)", other)),
    }
  }
}

/// Only multiple-choice is produced today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
  MultipleChoice,
}

/// Static, pre-authored question definition keyed by topic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTemplate {
  pub topic: String,
  pub prompt_text: String,
  pub options: Vec<String>,
  pub correct_answer: String,
  pub explanation: String,
}

impl QuestionTemplate {
  /// Checks the per-template invariants: four distinct options and the answer among them.
  pub fn validate(&self) -> Result<(), String> {
    if self.prompt_text.trim().is_empty() {
      return Err("empty prompt text".into());
    }
    if self.options.len() != 4 {
      return Err(format!("expected 4 options, got {}", self.options.len()));
    }
    for (i, a) in self.options.iter().enumerate() {
      if self.options[i + 1..].contains(a) {
        return Err(format!("duplicate option '{}'", a));
      }
    }
    if !self.options.contains(&self.correct_answer) {
      return Err(format!("correct answer '{}' is not one of the options", self.correct_answer));
    }
    Ok(())
  }
}

/// Output record of one generation call. Serialized with the camelCase field names
/// the front-end consumes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
  pub id: u32,
  pub course_id: String,
  pub question_text: String,
  pub question_type: QuestionType,
  pub correct_answer: String,
  pub options: Vec<String>,
  pub explanation: String,
  pub cultural_context: String,
  pub difficulty_level: Difficulty,
  pub topic: String,
}

/// Rolling correct/total counters owned by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
  pub correct: u32,
  pub total: u32,
}

impl Performance {
  /// Percentage correct; 50 when there is no data yet.
  pub fn percentage(&self) -> f64 {
    if self.total > 0 {
      self.correct as f64 / self.total as f64 * 100.0
    } else {
      50.0
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
  Correct,
  Partial,
  Incorrect,
}

impl Classification {
  /// Strict thresholds: exactly 0.8 is partial, exactly 0.5 is incorrect.
  pub fn from_similarity(similarity: f64) -> Self {
    if similarity > 0.8 {
      Classification::Correct
    } else if similarity > 0.5 {
      Classification::Partial
    } else {
      Classification::Incorrect
    }
  }

  pub fn score(&self) -> u32 {
    match self {
      Classification::Correct => 100,
      Classification::Partial => 50,
      Classification::Incorrect => 0,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Classification::Correct => "correct",
      Classification::Partial => "partial",
      Classification::Incorrect => "incorrect",
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvaluation {
  pub similarity: f64,
  pub classification: Classification,
  pub score: u32,
  pub attempt_number: u32,
}
