//! Loading quiz configuration (hint prompts + optional extra bank content) from TOML.
//!
//! See `QuizConfig` and `Prompts` for expected schema. Example:
//!
//! ```toml
//! hint_timeout_ms = 3000
//!
//! [[templates]]
//! topic = "water-cycle"
//! prompt_text = "What is dew?"
//! options = ["Condensed water on cool surfaces", "Rain", "Groundwater", "Sea foam"]
//! correct_answer = "Condensed water on cool surfaces"
//! explanation = "Dew forms when vapour condenses on surfaces cooled overnight."
//!
//! [[cultural_contexts]]
//! country = "cambodia"
//! topic = "water-cycle"
//! phrases = ["Tonle Sap", "Mekong floods"]
//! ```

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::QuestionTemplate;

pub const DEFAULT_HINT_TIMEOUT_MS: u64 = 5000;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub hint_timeout_ms: Option<u64>,
  #[serde(default)]
  pub templates: Vec<QuestionTemplate>,
  #[serde(default)]
  pub cultural_contexts: Vec<CulturalContextCfg>,
}

/// Extra phrases for a (country, topic) bucket. Appended to the built-in ones.
#[derive(Clone, Debug, Deserialize)]
pub struct CulturalContextCfg {
  pub country: String,
  pub topic: String,
  pub phrases: Vec<String>,
}

/// Prompts used by the hint generator. Placeholders: `{attempt}`, `{user_answer}`,
/// `{correct_answer}`, `{concept}`, `{cultural_context}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub hint_system: String,
  pub hint_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      hint_system: "You are a patient tutor for Southeast Asian learners. Give ONE short hint (< 40 words). Never state the correct answer or quote it word for word.".into(),
      hint_user_template: "This is attempt number {attempt} on the concept '{concept}'.\nStudent answer: {user_answer}\nReference answer (do NOT reveal it): {correct_answer}\nCultural context to draw examples from: {cultural_context}\nMake the hint more specific the higher the attempt number: attempt 2 points at the idea, attempt 3 names the key term category, later attempts narrow it down further, but never give the answer itself.".into(),
    }
  }
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "sea_bridge", %path, templates = cfg.templates.len(), contexts = cfg.cultural_contexts.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "sea_bridge", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "sea_bridge", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

/// HINT_TIMEOUT_MS wins over the TOML value; both fall back to the default.
pub fn hint_timeout_ms(cfg: Option<&QuizConfig>) -> u64 {
  std::env::var("HINT_TIMEOUT_MS")
    .ok()
    .and_then(|v| v.parse::<u64>().ok())
    .or_else(|| cfg.and_then(|c| c.hint_timeout_ms))
    .unwrap_or(DEFAULT_HINT_TIMEOUT_MS)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_partial_config_with_defaults() {
    let cfg: QuizConfig = toml::from_str(
      r#"
      hint_timeout_ms = 1500

      [[cultural_contexts]]
      country = "cambodia"
      topic = "water-cycle"
      phrases = ["Tonle Sap"]
      "#,
    )
    .expect("config");
    assert_eq!(cfg.hint_timeout_ms, Some(1500));
    assert!(cfg.templates.is_empty());
    assert_eq!(cfg.cultural_contexts[0].phrases, vec!["Tonle Sap".to_string()]);
    assert!(cfg.prompts.hint_user_template.contains("{attempt}"));
  }

  #[test]
  fn parses_template_entries() {
    let cfg: QuizConfig = toml::from_str(
      r#"
      [prompts]
      hint_system = "Be brief."

      [[templates]]
      topic = "water-cycle"
      prompt_text = "What is dew?"
      options = ["Condensed water", "Rain", "Groundwater", "Sea foam"]
      correct_answer = "Condensed water"
      explanation = "Dew forms overnight."
      "#,
    )
    .expect("config");
    assert_eq!(cfg.prompts.hint_system, "Be brief.");
    assert!(cfg.prompts.hint_user_template.contains("{concept}"));
    assert!(cfg.templates[0].validate().is_ok());
  }
}
