use std::sync::Arc;
use std::time::Duration;

use wq_core::{GenerativeBackend, QuizRecord};

use crate::placeholder::placeholder_quiz;
use crate::prompt::{build_prompt, DEFAULT_MAX_ARTICLE_CHARS};
use crate::response::{parse_completion, QuizDraft, SynthesisFailure};
use crate::{create_backend, Config, DEFAULT_MODEL_TIMEOUT};

/// Turns article text into a quiz. Falls back to the placeholder generator on
/// any failure, so `synthesize` has no error path.
pub struct Synthesizer {
    backend: Option<Arc<dyn GenerativeBackend>>,
    timeout: Duration,
    max_article_chars: usize,
}

impl Synthesizer {
    pub fn new(backend: Option<Arc<dyn GenerativeBackend>>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_MODEL_TIMEOUT,
            max_article_chars: DEFAULT_MAX_ARTICLE_CHARS,
        }
    }

    /// Placeholder-only synthesizer.
    pub fn offline() -> Self {
        Self::new(None)
    }

    /// A backend that cannot be built is logged and treated as absent.
    pub fn from_config(config: &Config) -> Self {
        let backend = match create_backend(config) {
            Ok(backend) => backend,
            Err(e) => {
                tracing::warn!("⚠️ Generative backend '{}' unavailable, using placeholder quizzes: {}", config.backend, e);
                None
            }
        };
        Self::new(backend)
            .with_timeout(config.timeout)
            .with_max_article_chars(config.max_article_chars)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_article_chars(mut self, max_article_chars: usize) -> Self {
        self.max_article_chars = max_article_chars;
        self
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }

    pub async fn synthesize(&self, title: &str, article_text: &str) -> QuizRecord {
        let draft = match self.generate(title, article_text).await {
            Ok(draft) => {
                tracing::info!("✨ Generated {} questions for '{}'", draft.quiz.len(), title);
                draft
            }
            Err(SynthesisFailure::Unavailable) => {
                tracing::debug!("No generative backend, using placeholder quiz for '{}'", title);
                placeholder_quiz(title, article_text)
            }
            Err(failure) => {
                tracing::warn!("⚠️ Quiz generation failed for '{}', falling back to placeholder: {}", title, failure);
                placeholder_quiz(title, article_text)
            }
        };
        draft.into_record(title, article_text)
    }

    async fn generate(&self, title: &str, article_text: &str) -> Result<QuizDraft, SynthesisFailure> {
        let backend = self.backend.as_ref().ok_or(SynthesisFailure::Unavailable)?;
        let prompt = build_prompt(title, article_text, self.max_article_chars);

        tracing::info!("🤖 Requesting quiz from {} for '{}'", backend.name(), title);
        let completion = tokio::time::timeout(self.timeout, backend.submit(&prompt))
            .await
            .map_err(|_| SynthesisFailure::Timeout(self.timeout))??;

        parse_completion(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DummyBackend;
    use serde_json::json;

    const TITLE: &str = "Example";
    const TEXT: &str = "Paragraph one.\n\nParagraph two.";

    fn valid_question() -> serde_json::Value {
        json!({
            "question": "What does the article describe?",
            "options": ["An example", "A counterexample", "Nothing"],
            "answer": "An example",
            "difficulty": "easy",
            "explanation": "It is called Example."
        })
    }

    fn with_backend(backend: DummyBackend) -> Synthesizer {
        let backend: Arc<dyn GenerativeBackend> = Arc::new(backend);
        Synthesizer::new(Some(backend))
    }

    fn assert_placeholder(record: &QuizRecord) {
        assert_eq!(record.title, TITLE);
        assert_eq!(record.full_text, TEXT);
        assert_eq!(record.quiz.len(), 8);
        assert_eq!(record.related_topics, vec!["Related topic 1", "Related topic 2"]);
        for q in &record.quiz {
            assert!(q.options.contains(&q.answer));
        }
    }

    #[tokio::test]
    async fn test_no_backend_uses_placeholder() {
        let synthesizer = Synthesizer::offline();
        assert!(synthesizer.backend_name().is_none());
        assert_placeholder(&synthesizer.synthesize(TITLE, TEXT).await);
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back() {
        let record = with_backend(DummyBackend::failing("connection refused")).synthesize(TITLE, TEXT).await;
        assert_placeholder(&record);
    }

    #[tokio::test]
    async fn test_malformed_json_falls_back() {
        let record = with_backend(DummyBackend::text("{\"quiz\": [")).synthesize(TITLE, TEXT).await;
        assert_placeholder(&record);
    }

    #[tokio::test]
    async fn test_missing_quiz_key_falls_back() {
        let backend = DummyBackend::structured(json!({ "title": TITLE, "sections": ["History"] }));
        assert_placeholder(&with_backend(backend).synthesize(TITLE, TEXT).await);
    }

    #[tokio::test]
    async fn test_all_invalid_batch_falls_back() {
        let backend = DummyBackend::structured(json!({ "quiz": [{ "question": "Q?", "options": [], "answer": "A" }] }));
        assert_placeholder(&with_backend(backend).synthesize(TITLE, TEXT).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let backend = DummyBackend::structured(json!({ "quiz": [valid_question()] }))
            .with_delay(Duration::from_secs(600));
        let synthesizer = with_backend(backend).with_timeout(Duration::from_secs(5));
        assert_placeholder(&synthesizer.synthesize(TITLE, TEXT).await);
    }

    #[tokio::test]
    async fn test_invalid_question_dropped_sibling_kept() {
        let mut invalid = valid_question();
        invalid["answer"] = json!("Not listed");
        let backend = DummyBackend::structured(json!({
            "quiz": [valid_question(), invalid],
            "related_topics": ["Examples in logic"]
        }));

        let record = with_backend(backend).synthesize(TITLE, TEXT).await;
        assert_eq!(record.quiz.len(), 1);
        assert_eq!(record.quiz[0].answer, "An example");
        assert_eq!(record.related_topics, vec!["Examples in logic"]);
        assert!(record.sections.is_empty());
    }

    #[tokio::test]
    async fn test_record_keeps_input_title_and_text() {
        let backend = DummyBackend::structured(json!({ "title": "Something Else", "quiz": [valid_question()] }));
        let record = with_backend(backend).synthesize(TITLE, TEXT).await;
        assert_eq!(record.title, TITLE);
        assert_eq!(record.full_text, TEXT);
        assert!(record.url.is_empty());
    }

    #[tokio::test]
    async fn test_article_prefix_is_bounded() {
        let backend = Arc::new(DummyBackend::failing("offline"));
        let dyn_backend: Arc<dyn GenerativeBackend> = backend.clone();
        let synthesizer = Synthesizer::new(Some(dyn_backend)).with_max_article_chars(10);
        synthesizer.synthesize(TITLE, "0123456789ABCDEF").await;

        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.user.contains("0123456789"));
        assert!(!prompt.user.contains("ABCDEF"));
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_unbuildable_backend_is_absent() {
        let config = Config::new(crate::BackendKind::OpenAi);
        assert!(Synthesizer::from_config(&config).backend_name().is_none());
    }
}
