use async_trait::async_trait;

use crate::types::{QuizRecord, QuizSummary, StoredQuiz};
use crate::Result;

#[async_trait]
pub trait QuizStorage: Send + Sync {
    /// Store a quiz, assigning its id and generation date
    async fn insert(&self, record: &QuizRecord) -> Result<StoredQuiz>;

    /// List stored quizzes, newest first
    async fn list(&self) -> Result<Vec<QuizSummary>>;

    /// Fetch one stored quiz by id
    async fn get(&self, id: &str) -> Result<Option<StoredQuiz>>;

    /// Release the underlying resources. Later calls fail.
    async fn close(&self) -> Result<()>;
}
