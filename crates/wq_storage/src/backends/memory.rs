use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use wq_core::{Error, QuizRecord, QuizStorage, QuizSummary, Result, StoredQuiz};

use crate::assign_identity;

/// Process-local store, lost on exit. The default backend.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    quizzes: RwLock<Vec<StoredQuiz>>,
    closed: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Storage("Memory storage has been closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl QuizStorage for InMemoryStorage {
    async fn insert(&self, record: &QuizRecord) -> Result<StoredQuiz> {
        self.ensure_open()?;
        let stored = assign_identity(record);
        self.quizzes.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<QuizSummary>> {
        self.ensure_open()?;
        let quizzes = self.quizzes.read().await;
        // insertion order is generation order
        Ok(quizzes.iter().rev().map(QuizSummary::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<StoredQuiz>> {
        self.ensure_open()?;
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.iter().find(|q| q.id == id).cloned())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        self.quizzes.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> QuizRecord {
        QuizRecord {
            url: format!("https://en.wikipedia.org/wiki/{}", title),
            title: title.to_string(),
            full_text: "Some text.".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = InMemoryStorage::new();
        let first = storage.insert(&record("Rust")).await.unwrap();
        let second = storage.insert(&record("Ferris")).await.unwrap();

        let fetched = storage.get(&first.id).await.unwrap().unwrap();
        assert_eq!(fetched, first);
        assert!(storage.get("missing").await.unwrap().is_none());

        let history = storage.list().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].title, "Rust");
    }

    #[tokio::test]
    async fn test_closed_storage_rejects_calls() {
        let storage = InMemoryStorage::new();
        storage.insert(&record("Rust")).await.unwrap();
        storage.close().await.unwrap();

        assert!(matches!(storage.list().await, Err(Error::Storage(_))));
        assert!(matches!(storage.insert(&record("Rust")).await, Err(Error::Storage(_))));
    }
}
