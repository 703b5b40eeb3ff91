pub mod error;
pub mod models;
pub mod source;
pub mod storage;
pub mod types;

pub use error::{Error, FetchError, QuestionError, Result};
pub use models::{Completion, GenerativeBackend, Prompt};
pub use source::ArticleSource;
pub use storage::QuizStorage;
pub use types::{
    ArticleText, Difficulty, KeyEntities, QuizQuestion, QuizRecord, QuizSummary, StoredQuiz,
};
