//! Free-text answer evaluation.
//!
//! Answers are compared as token sets (Jaccard overlap) after normalization. The
//! resulting similarity is bucketed into correct / partial / incorrect. Hints are an
//! optional enrichment produced by a [`HintGenerator`] and never block the verdict.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::config::Prompts;
use crate::domain::{AnswerEvaluation, Classification};
use crate::util::fill_template;

/// Lower-case, turn every non-word character into a separator and split on whitespace.
pub fn normalize(text: &str) -> Vec<String> {
  let cleaned: String = text
    .to_lowercase()
    .chars()
    .map(|c| if c.is_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
    .collect();
  cleaned.split_whitespace().map(str::to_string).collect()
}

/// Token-set overlap in `[0, 1]`. Two empty answers score 0.0.
pub fn similarity(user_answer: &str, correct_answer: &str) -> f64 {
  let user: HashSet<String> = normalize(user_answer).into_iter().collect();
  let correct: HashSet<String> = normalize(correct_answer).into_iter().collect();

  let union = user.union(&correct).count();
  if union == 0 {
    return 0.0;
  }
  let intersection = user.iter().filter(|t| correct.contains(*t)).count();
  intersection as f64 / union as f64
}

pub fn evaluate(user_answer: &str, correct_answer: &str, attempt_number: u32) -> AnswerEvaluation {
  let similarity = similarity(user_answer, correct_answer);
  let classification = Classification::from_similarity(similarity);
  AnswerEvaluation {
    similarity,
    classification,
    score: classification.score(),
    attempt_number,
  }
}

/// Hints only make sense after a first miss.
pub fn should_request_hint(classification: Classification, attempt_number: u32) -> bool {
  classification != Classification::Correct && attempt_number > 1
}

/// Everything a hint prompt needs.
#[derive(Clone, Debug)]
pub struct HintRequest {
  pub user_answer: String,
  pub correct_answer: String,
  pub concept: String,
  pub attempt_number: u32,
  pub cultural_context: String,
}

/// Ready-to-send system and user messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintPrompt {
  pub system: String,
  pub user: String,
}

pub fn build_hint_prompt(prompts: &Prompts, req: &HintRequest) -> HintPrompt {
  let attempt = req.attempt_number.to_string();
  let cultural = if req.cultural_context.trim().is_empty() { "general Southeast Asian" } else { req.cultural_context.as_str() };
  let user = fill_template(
    &prompts.hint_user_template,
    &[
      ("attempt", attempt.as_str()),
      ("user_answer", req.user_answer.as_str()),
      ("correct_answer", req.correct_answer.as_str()),
      ("concept", req.concept.as_str()),
      ("cultural_context", cultural),
    ],
  );
  HintPrompt { system: prompts.hint_system.clone(), user }
}

/// External text generator used for hints.
#[async_trait]
pub trait HintGenerator: Send + Sync {
  async fn generate_hint(&self, prompt: &HintPrompt) -> Result<String, String>;
}

/// Ask the generator for a hint, bounded by `timeout`. Timeouts, errors and blank
/// replies all mean "no hint".
#[instrument(level = "info", skip(generator, prompts, req), fields(attempt = req.attempt_number, concept = %req.concept))]
pub async fn generate_adaptive_hint(
  generator: &dyn HintGenerator,
  prompts: &Prompts,
  req: &HintRequest,
  timeout: Duration,
) -> Option<String> {
  let prompt = build_hint_prompt(prompts, req);
  match tokio::time::timeout(timeout, generator.generate_hint(&prompt)).await {
    Ok(Ok(text)) => {
      let text = text.trim().to_string();
      if text.is_empty() {
        debug!(target: "feedback", "Hint generator returned an empty hint");
        None
      } else {
        Some(text)
      }
    }
    Ok(Err(e)) => {
      warn!(target: "feedback", error = %e, "Hint generation failed; continuing without hint");
      None
    }
    Err(_) => {
      warn!(target: "feedback", timeout_ms = timeout.as_millis() as u64, "Hint generation timed out; continuing without hint");
      None
    }
  }
}

/// Follow-up suggestions for the learner based on the verdict.
pub fn recommendations(classification: Classification, concept: &str, cultural_context: Option<&str>) -> Vec<String> {
  let concept = if concept.trim().is_empty() { "this topic" } else { concept.trim() };
  let mut out = match classification {
    Classification::Correct => vec![
      format!("Great work! Try a more challenging question on {}.", concept),
      format!("Explain {} to a friend in your own words.", concept),
    ],
    Classification::Partial => vec![
      format!("You're close. Review the key terms of {}.", concept),
      "Compare your answer with the explanation and note what is missing.".to_string(),
    ],
    Classification::Incorrect => vec![
      format!("Revisit the lesson on {} before trying again.", concept),
      "Read the question slowly and underline the key words.".to_string(),
    ],
  };
  if classification != Classification::Correct {
    if let Some(ctx) = cultural_context.map(str::trim).filter(|c| !c.is_empty()) {
      out.push(format!("Think of an example from {} that relates to {}.", ctx, concept));
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[test]
  fn normalize_strips_punctuation_and_collapses_space() {
    assert_eq!(
      normalize("Rice-Terraces!! in the Philippines."),
      vec!["rice", "terraces", "in", "the", "philippines"]
    );
    assert!(normalize("").is_empty());
    assert!(normalize("  ?!  ").is_empty());
  }

  #[test]
  fn normalize_is_idempotent_after_rejoin() {
    for text in ["Rice-Terraces!! in the Philippines.", "  Mekong,  Delta; (Vietnam) ", "Evaporation!!!"] {
      let once = normalize(text);
      assert_eq!(normalize(&once.join(" ")), once);
    }
  }

  #[test]
  fn normalize_keeps_accented_letters() {
    assert_eq!(normalize("Tết Nguyên Đán"), vec!["tết", "nguyên", "đán"]);
  }

  #[test]
  fn similarity_bounds_and_self_overlap() {
    let samples = ["", "water", "The water cycle", "evaporation and condensation", "!!!"];
    for a in samples {
      for b in samples {
        let s = similarity(a, b);
        assert!((0.0..=1.0).contains(&s), "{a:?} vs {b:?} = {s}");
      }
    }
    assert_eq!(similarity("The Water Cycle", "the water cycle!"), 1.0);
  }

  #[test]
  fn similarity_counts_token_sets() {
    // {water, evaporates} vs {water, condenses}: 1 shared of 3 distinct.
    let s = similarity("water evaporates", "water condenses");
    assert!((s - 1.0 / 3.0).abs() < 1e-9);
    // repeated tokens do not inflate the score
    assert_eq!(similarity("water water water", "water"), 1.0);
  }

  #[test]
  fn empty_answers_are_incorrect() {
    assert_eq!(similarity("", ""), 0.0);
    assert_eq!(similarity("...", "!"), 0.0);
    let ev = evaluate("", "", 1);
    assert_eq!(ev.classification, Classification::Incorrect);
    assert_eq!(ev.score, 0);
  }

  #[test]
  fn evaluation_buckets_by_overlap() {
    // 4 of 5 distinct tokens shared → 0.8 → partial
    let ev = evaluate("heat makes water evaporate", "heat makes water evaporate quickly", 1);
    assert!((ev.similarity - 0.8).abs() < 1e-9);
    assert_eq!(ev.classification, Classification::Partial);
    assert_eq!(ev.score, 50);

    // 1 of 2 → 0.5 → incorrect
    let ev = evaluate("water", "water vapour", 2);
    assert_eq!(ev.classification, Classification::Incorrect);
    assert_eq!(ev.attempt_number, 2);

    let ev = evaluate("Evaporation.", "evaporation", 1);
    assert_eq!(ev.classification, Classification::Correct);
    assert_eq!(ev.score, 100);
  }

  #[test]
  fn hint_only_after_first_miss() {
    assert!(!should_request_hint(Classification::Incorrect, 1));
    assert!(!should_request_hint(Classification::Partial, 1));
    assert!(!should_request_hint(Classification::Correct, 3));
    assert!(should_request_hint(Classification::Partial, 2));
    assert!(should_request_hint(Classification::Incorrect, 5));
  }

  fn request(attempt: u32) -> HintRequest {
    HintRequest {
      user_answer: "rain".into(),
      correct_answer: "evaporation".into(),
      concept: "water cycle".into(),
      attempt_number: attempt,
      cultural_context: "Manila Bay".into(),
    }
  }

  #[test]
  fn hint_prompt_carries_all_inputs() {
    let p = build_hint_prompt(&Prompts::default(), &request(3));
    for needle in ["attempt number 3", "rain", "evaporation", "water cycle", "Manila Bay"] {
      assert!(p.user.contains(needle), "missing {needle}: {}", p.user);
    }
    assert!(p.system.contains("Never state the correct answer"));
    assert!(!p.user.contains('{'));
  }

  struct CountingHints {
    calls: AtomicUsize,
    reply: Result<String, String>,
    delay: Duration,
  }

  #[async_trait]
  impl HintGenerator for CountingHints {
    async fn generate_hint(&self, _prompt: &HintPrompt) -> Result<String, String> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      tokio::time::sleep(self.delay).await;
      self.reply.clone()
    }
  }

  #[tokio::test]
  async fn hint_is_returned_trimmed() {
    let gen = CountingHints { calls: AtomicUsize::new(0), reply: Ok("  Think about the sun. ".into()), delay: Duration::ZERO };
    let hint = generate_adaptive_hint(&gen, &Prompts::default(), &request(2), Duration::from_secs(1)).await;
    assert_eq!(hint.as_deref(), Some("Think about the sun."));
    assert_eq!(gen.calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn failed_or_slow_hint_means_no_hint() {
    let failing = CountingHints { calls: AtomicUsize::new(0), reply: Err("boom".into()), delay: Duration::ZERO };
    assert!(generate_adaptive_hint(&failing, &Prompts::default(), &request(2), Duration::from_secs(1)).await.is_none());

    let slow = CountingHints { calls: AtomicUsize::new(0), reply: Ok("late".into()), delay: Duration::from_secs(5) };
    assert!(generate_adaptive_hint(&slow, &Prompts::default(), &request(2), Duration::from_millis(20)).await.is_none());
  }

  #[test]
  fn recommendations_follow_classification() {
    let ok = recommendations(Classification::Correct, "monsoon", Some("Manila Bay"));
    assert!(ok[0].contains("more challenging"));
    assert!(ok.iter().all(|r| !r.contains("Manila Bay")));

    let miss = recommendations(Classification::Incorrect, "monsoon", Some("Manila Bay"));
    assert!(miss[0].contains("Revisit the lesson on monsoon"));
    assert!(miss.last().is_some_and(|r| r.contains("Manila Bay")));
  }
}
