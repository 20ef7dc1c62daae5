//! Application state: question bank, persistence store, hint generator and prompts.
//!
//! This module owns:
//!   - the immutable question bank (templates + cultural contexts), shared via `Arc`
//!   - the store used for progress records and learning events
//!   - the optional hint generator (OpenAI when configured)
//!   - the prompts struct (from TOML or defaults) and the hint timeout

use std::{sync::Arc, time::Duration};

use tracing::{info, instrument};

use crate::bank::QuestionBank;
use crate::config::{hint_timeout_ms, load_quiz_config_from_env, Prompts};
use crate::evaluator::HintGenerator;
use crate::openai::OpenAI;
use crate::store::{MemoryStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<QuestionBank>,
    pub store: Arc<dyn Store>,
    pub hints: Option<Arc<dyn HintGenerator>>,
    pub prompts: Prompts,
    pub hint_timeout: Duration,
}

impl AppState {
    /// Build state from env: load config, build the bank, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Self {
        let cfg = load_quiz_config_from_env();
        let prompts = cfg.as_ref().map(|c| c.prompts.clone()).unwrap_or_default();
        let hint_timeout = Duration::from_millis(hint_timeout_ms(cfg.as_ref()));

        let bank = QuestionBank::with_config(cfg.as_ref());
        for t in bank.topics() {
            info!(target: "quiz", topic = %t.topic, templates = t.templates, "Startup question inventory");
        }

        let hints: Option<Arc<dyn HintGenerator>> = match OpenAI::from_env() {
            Some(oa) => {
                info!(target: "sea_bridge", base_url = %oa.base_url, fast_model = %oa.fast_model, timeout_ms = hint_timeout.as_millis() as u64, "OpenAI enabled for hints.");
                Some(Arc::new(oa))
            }
            None => {
                info!(target: "sea_bridge", "OpenAI disabled (no OPENAI_API_KEY). Feedback will carry no hints.");
                None
            }
        };

        Self {
            prompts,
            ..Self::new(bank, Arc::new(MemoryStore::new()), hints, hint_timeout)
        }
    }

    /// Wire state from parts, with default prompts.
    pub fn new(
        bank: QuestionBank,
        store: Arc<dyn Store>,
        hints: Option<Arc<dyn HintGenerator>>,
        hint_timeout: Duration,
    ) -> Self {
        Self {
            bank: Arc::new(bank),
            store,
            hints,
            prompts: Prompts::default(),
            hint_timeout,
        }
    }
}
