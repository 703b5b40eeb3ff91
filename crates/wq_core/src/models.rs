use async_trait::async_trait;

use crate::Result;

/// Instruction sent to a generative backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Single-string form for backends without a separate system role.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// What a backend answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Text(String),
    Structured(serde_json::Value),
}

#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Submit a prompt and wait for the model's answer
    async fn submit(&self, prompt: &Prompt) -> Result<Completion>;
}
