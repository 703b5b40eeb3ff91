use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use wq_core::{Error, GenerativeBackend, Result};

use crate::Config;

pub mod dummy;
pub mod gemini;
#[cfg(feature = "ollama")]
pub mod langchain;
pub mod openai;

pub use dummy::DummyBackend;
pub use gemini::GeminiBackend;
#[cfg(feature = "ollama")]
pub use langchain::LangChainBackend;
pub use openai::OpenAiBackend;

/// Which generative backend to talk to. Chosen by configuration only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// No backend: every quiz comes from the placeholder generator.
    #[default]
    None,
    OpenAi,
    Gemini,
    Ollama,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "placeholder" => Ok(BackendKind::None),
            "openai" => Ok(BackendKind::OpenAi),
            "gemini" => Ok(BackendKind::Gemini),
            "ollama" => Ok(BackendKind::Ollama),
            other => Err(Error::Config(format!(
                "Unknown model backend '{}'. Available backends: none, openai, gemini, ollama",
                other
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::None => "none",
            BackendKind::OpenAi => "openai",
            BackendKind::Gemini => "gemini",
            BackendKind::Ollama => "ollama",
        };
        f.write_str(name)
    }
}

/// Build the configured backend. `Ok(None)` means generation is switched off.
pub fn create_backend(config: &Config) -> Result<Option<Arc<dyn GenerativeBackend>>> {
    let backend: Arc<dyn GenerativeBackend> = match config.backend {
        BackendKind::None => return Ok(None),
        BackendKind::OpenAi => Arc::new(OpenAiBackend::new(config)?),
        BackendKind::Gemini => Arc::new(GeminiBackend::new(config)?),
        #[cfg(feature = "ollama")]
        BackendKind::Ollama => Arc::new(LangChainBackend::new(config)?),
        #[cfg(not(feature = "ollama"))]
        BackendKind::Ollama => {
            return Err(Error::Config(
                "Ollama support is not compiled in; rebuild wq_inference with the 'ollama' feature".to_string(),
            ))
        }
    };
    Ok(Some(backend))
}

/// Shared HTTP client for the REST backends.
pub(crate) fn http_client(config: &Config) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(config.timeout).build()?)
}
