use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use wq_core::{Completion, Error, GenerativeBackend, Prompt, Result};

#[derive(Debug, Clone)]
enum Reply {
    Completion(Completion),
    Failure(String),
}

/// Backend with a canned answer. Used offline and in tests.
pub struct DummyBackend {
    reply: Reply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<Prompt>>,
}

impl fmt::Debug for DummyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyBackend")
            .field("reply", &self.reply)
            .field("delay", &self.delay)
            .finish()
    }
}

impl DummyBackend {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Completion(Completion::Text(text.into())))
    }

    pub fn structured(value: serde_json::Value) -> Self {
        Self::with_reply(Reply::Completion(Completion::Structured(value)))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Failure(message.into()))
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl GenerativeBackend for DummyBackend {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn submit(&self, prompt: &Prompt) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Reply::Completion(completion) => Ok(completion.clone()),
            Reply::Failure(message) => Err(Error::Inference(message.clone())),
        }
    }
}
