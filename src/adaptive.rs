//! Adaptive difficulty selection: performance counters → tier, course id → topic,
//! then a fixed-size batch from the question bank.

use rand::Rng;
use tracing::{info, instrument};

use crate::bank::QuestionBank;
use crate::domain::{Difficulty, GeneratedQuestion, Performance};

pub const ADAPTIVE_BATCH_SIZE: usize = 5;
pub const DEFAULT_TOPIC: &str = "water-cycle";

/// Closed course → topic table. Unknown or non-numeric ids map to the default topic.
pub fn topic_for_course(course_id: &str) -> &'static str {
  match course_id.trim().parse::<u64>() {
    Ok(1) => "water-cycle",
    Ok(2) => "sea-history",
    Ok(3) => "sea-culture",
    Ok(4) => "sea-geography",
    _ => DEFAULT_TOPIC,
  }
}

pub fn difficulty_for(performance: &Performance) -> Difficulty {
  Difficulty::from_percentage(performance.percentage())
}

/// Thread-RNG variant of [`generate_adaptive_questions_with`].
pub fn generate_adaptive_questions(
  bank: &QuestionBank,
  course_id: &str,
  performance: &Performance,
  cultural_key: &str,
  language: Option<&str>,
) -> Vec<GeneratedQuestion> {
  let mut rng = rand::thread_rng();
  generate_adaptive_questions_with(&mut rng, bank, course_id, performance, cultural_key, language)
}

/// `language` does not influence selection yet; it is logged so language-specific
/// template sets can be wired in without changing callers.
#[instrument(level = "info", skip(rng, bank))]
pub fn generate_adaptive_questions_with<R: Rng + ?Sized>(
  rng: &mut R,
  bank: &QuestionBank,
  course_id: &str,
  performance: &Performance,
  cultural_key: &str,
  language: Option<&str>,
) -> Vec<GeneratedQuestion> {
  let difficulty = difficulty_for(performance);
  let topic = topic_for_course(course_id);
  info!(
    target: "quiz",
    %course_id,
    %topic,
    %difficulty,
    percentage = performance.percentage(),
    language = language.unwrap_or("-"),
    "Adaptive difficulty resolved"
  );
  bank.generate_questions_with(rng, course_id, topic, ADAPTIVE_BATCH_SIZE, difficulty, cultural_key)
}
