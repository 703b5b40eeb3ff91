use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use langchain_rust::language_models::llm::LLM;
use langchain_rust::llm::client::{Ollama, OllamaClient};
use url::Url;
use wq_core::{Completion, GenerativeBackend, Prompt, Result};

use crate::Config;

const DEFAULT_MODEL_URL: &str = "http://localhost:11434/gemma3:12b";
const DEFAULT_MODEL: &str = "gemma3:12b";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaEndpoint {
    host: String,
    port: u16,
    model_name: String,
}

impl OllamaEndpoint {
    /// Reads `http://host:port/model`. `model_name` in the config wins over the path.
    pub fn from_config(config: &Config) -> Result<Self> {
        let raw = config.model_url.as_deref().unwrap_or(DEFAULT_MODEL_URL);
        let parsed = Url::parse(raw)
            .map_err(|e| wq_core::Error::Config(format!("Invalid Ollama URL '{}': {}", raw, e)))?;

        let path_model = parsed.path().trim_start_matches('/').to_string();
        let model_name = config
            .model_name
            .clone()
            .or_else(|| (!path_model.is_empty()).then_some(path_model))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            host: format!("{}://{}", parsed.scheme(), parsed.host_str().unwrap_or("localhost")),
            port: parsed.port().unwrap_or(11434),
            model_name,
        })
    }
}

/// Local Ollama model driven through langchain-rust.
pub struct LangChainBackend {
    endpoint: OllamaEndpoint,
    ollama: Ollama,
}

impl fmt::Debug for LangChainBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LangChainBackend")
            .field("endpoint", &self.endpoint)
            .field("ollama", &"<Ollama>")
            .finish()
    }
}

impl LangChainBackend {
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = OllamaEndpoint::from_config(config)?;
        let client = Arc::new(OllamaClient::new(endpoint.host.clone(), endpoint.port));
        let ollama = Ollama::new(client, endpoint.model_name.clone(), None);
        Ok(Self { endpoint, ollama })
    }
}

#[async_trait]
impl GenerativeBackend for LangChainBackend {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn submit(&self, prompt: &Prompt) -> Result<Completion> {
        let response = self.ollama.invoke(&prompt.combined()).await.map_err(|e| {
            wq_core::Error::External(anyhow!(
                "Ollama request to {}:{} failed: {}. Please ensure Ollama is running and the model '{}' is installed.",
                self.endpoint.host,
                self.endpoint.port,
                e,
                self.endpoint.model_name
            ))
        })?;
        Ok(Completion::Text(response))
    }
}
