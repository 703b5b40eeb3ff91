use std::sync::Arc;

use wq_core::{ArticleSource, QuizRecord, QuizStorage, Result, StoredQuiz};
use wq_inference::Synthesizer;

/// URL → article → quiz → stored quiz.
///
/// Holds no per-request state; one pipeline serves concurrent requests.
#[derive(Clone)]
pub struct QuizPipeline {
    source: Arc<dyn ArticleSource>,
    synthesizer: Arc<Synthesizer>,
    storage: Arc<dyn QuizStorage>,
}

impl QuizPipeline {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        synthesizer: Arc<Synthesizer>,
        storage: Arc<dyn QuizStorage>,
    ) -> Self {
        Self {
            source,
            synthesizer,
            storage,
        }
    }

    pub fn storage(&self) -> &Arc<dyn QuizStorage> {
        &self.storage
    }

    /// Extract and synthesize without storing. Only extraction errors escape.
    pub async fn build_record(&self, url: &str) -> Result<QuizRecord> {
        tracing::info!("📰 Extracting article: {}", url);
        let article = self.source.fetch_article(url).await?;
        tracing::info!(
            "✨ Extracted '{}' ({} paragraphs)",
            article.title,
            article.paragraphs().count()
        );

        let record = self.synthesizer.synthesize(&article.title, &article.body).await;
        Ok(record.with_url(url))
    }

    pub async fn generate(&self, url: &str) -> Result<StoredQuiz> {
        let record = self.build_record(url).await?;
        let stored = self.storage.insert(&record).await?;
        tracing::info!("💾 Stored quiz {} for '{}'", stored.id, stored.record.title);
        Ok(stored)
    }
}
