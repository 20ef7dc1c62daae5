//! Question bank and selector.
//!
//! Holds templates per topic and cultural-context phrases per (country, topic). A
//! generation call samples templates without replacement, binds each pick to a phrase
//! and stamps the requested difficulty on every record.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, error, instrument, warn};

use crate::config::QuizConfig;
use crate::domain::{Difficulty, GeneratedQuestion, QuestionTemplate, QuestionType};
use crate::seeds::{seed_cultural_contexts, seed_templates, GENERAL_BUCKET};

#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
  templates: HashMap<String, Vec<QuestionTemplate>>,
  contexts: HashMap<(String, String), Vec<String>>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TopicSummary {
  pub topic: String,
  pub templates: usize,
}

impl QuestionBank {
  /// Build a bank from raw tables. Invalid or duplicate templates and templates whose
  /// topic has no `general` phrases are skipped.
  pub fn from_parts(
    templates: Vec<QuestionTemplate>,
    contexts: HashMap<(String, String), Vec<String>>,
  ) -> Self {
    let contexts: HashMap<(String, String), Vec<String>> = contexts
      .into_iter()
      .filter(|(_, phrases)| !phrases.is_empty())
      .map(|((country, topic), phrases)| ((country.trim().to_lowercase(), topic), phrases))
      .collect();

    let mut by_topic: HashMap<String, Vec<QuestionTemplate>> = HashMap::new();
    for t in templates {
      if let Err(e) = t.validate() {
        error!(target: "quiz", topic = %t.topic, error = %e, "Skipping template: invalid.");
        continue;
      }
      if !contexts.contains_key(&(GENERAL_BUCKET.to_string(), t.topic.clone())) {
        error!(target: "quiz", topic = %t.topic, "Skipping template: topic has no general cultural context.");
        continue;
      }
      let slot = by_topic.entry(t.topic.clone()).or_default();
      if slot.contains(&t) {
        warn!(target: "quiz", topic = %t.topic, prompt = %t.prompt_text, "Skipping template: duplicate.");
        continue;
      }
      slot.push(t);
    }

    Self { templates: by_topic, contexts }
  }

  /// Built-in tables plus whatever the optional config adds.
  pub fn with_config(cfg: Option<&QuizConfig>) -> Self {
    let mut templates = seed_templates();
    let mut contexts = seed_cultural_contexts();
    if let Some(cfg) = cfg {
      for c in &cfg.cultural_contexts {
        contexts
          .entry((c.country.trim().to_lowercase(), c.topic.clone()))
          .or_default()
          .extend(c.phrases.iter().cloned());
      }
      templates.extend(cfg.templates.iter().cloned());
    }
    Self::from_parts(templates, contexts)
  }

  pub fn topics(&self) -> Vec<TopicSummary> {
    let sorted: BTreeMap<&String, usize> = self.templates.iter().map(|(k, v)| (k, v.len())).collect();
    sorted
      .into_iter()
      .map(|(topic, templates)| TopicSummary { topic: topic.clone(), templates })
      .collect()
  }

  #[cfg(test)]
  pub fn template_count(&self, topic: &str) -> usize {
    self.templates.get(topic).map(Vec::len).unwrap_or(0)
  }

  /// Phrases for a country bucket, falling back to `general`.
  pub fn cultural_phrases(&self, topic: &str, cultural_key: &str) -> &[String] {
    let key = cultural_key.trim().to_lowercase();
    self.contexts
      .get(&(key, topic.to_string()))
      .or_else(|| self.contexts.get(&(GENERAL_BUCKET.to_string(), topic.to_string())))
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Generate questions with the thread-local RNG.
  pub fn generate_questions(
    &self,
    course_id: &str,
    topic_id: &str,
    count: usize,
    difficulty: Difficulty,
    cultural_key: &str,
  ) -> Vec<GeneratedQuestion> {
    let mut rng = rand::thread_rng();
    self.generate_questions_with(&mut rng, course_id, topic_id, count, difficulty, cultural_key)
  }

  /// Sample up to `count` distinct templates of `topic_id`, in pick order.
  /// Unknown topics yield an empty batch.
  #[instrument(level = "debug", skip(self, rng))]
  pub fn generate_questions_with<R: Rng + ?Sized>(
    &self,
    rng: &mut R,
    course_id: &str,
    topic_id: &str,
    count: usize,
    difficulty: Difficulty,
    cultural_key: &str,
  ) -> Vec<GeneratedQuestion> {
    let Some(templates) = self.templates.get(topic_id) else {
      warn!(target: "quiz", %topic_id, "No templates for topic; returning empty batch");
      return Vec::new();
    };
    let phrases = self.cultural_phrases(topic_id, cultural_key);

    let wanted = count.min(templates.len());
    let mut unused: Vec<usize> = (0..templates.len()).collect();
    let mut out = Vec::with_capacity(wanted);

    while out.len() < wanted {
      let pick = unused.swap_remove(rng.gen_range(0..unused.len()));
      let t = &templates[pick];
      let cultural_context = if phrases.is_empty() {
        String::new()
      } else {
        phrases[rng.gen_range(0..phrases.len())].clone()
      };

      out.push(GeneratedQuestion {
        id: out.len() as u32 + 1,
        course_id: course_id.to_string(),
        question_text: t.prompt_text.clone(),
        question_type: QuestionType::MultipleChoice,
        correct_answer: t.correct_answer.clone(),
        options: t.options.clone(),
        explanation: t.explanation.clone(),
        cultural_context,
        difficulty_level: difficulty,
        topic: t.topic.clone(),
      });
    }

    if wanted < count {
      debug!(target: "quiz", %topic_id, requested = count, available = templates.len(), "Batch capped at topic size");
    }
    out
  }
}
