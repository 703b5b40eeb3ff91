use std::time::Duration;

use wq_core::Result;

pub mod models;
pub mod placeholder;
pub mod prompt;
pub mod response;
pub mod synthesizer;

pub use models::{create_backend, BackendKind};
pub use synthesizer::Synthesizer;

pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    /// Overrides the backend's default endpoint.
    pub model_url: Option<String>,
    pub timeout: Duration,
    pub max_article_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::None,
            api_key: None,
            model_name: None,
            model_url: None,
            timeout: DEFAULT_MODEL_TIMEOUT,
            max_article_chars: prompt::DEFAULT_MAX_ARTICLE_CHARS,
        }
    }
}

impl Config {
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    pub(crate) fn require_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| wq_core::Error::Config(format!("{} backend requires an API key", self.backend)))
    }
}

pub mod prelude {
    pub use super::models::{create_backend, BackendKind, DummyBackend};
    pub use super::synthesizer::Synthesizer;
    pub use super::Config;
    pub use wq_core::{Completion, Error, GenerativeBackend, Prompt, QuizRecord, Result};
}
