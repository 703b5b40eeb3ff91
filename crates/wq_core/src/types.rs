use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuestionError;

pub const MIN_OPTIONS: usize = 3;
pub const MAX_OPTIONS: usize = 5;
pub const MAX_QUESTIONS: usize = 8;

/// Title and body text pulled out of an article page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleText {
    pub title: String,
    /// Paragraphs joined by a blank line, footnote markers removed.
    pub body: String,
}

impl ArticleText {
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.body.split("\n\n").filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(QuestionError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub explanation: String,
}

/// Shape a generated question arrives in, before the invariants are checked.
#[derive(Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    answer: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
}

impl QuizQuestion {
    /// Builds a question from untrusted JSON. Nothing is repaired: a missing
    /// field or a broken invariant rejects the whole question.
    pub fn from_value(value: serde_json::Value) -> std::result::Result<Self, QuestionError> {
        let raw: RawQuestion = serde_json::from_value(value)?;
        let difficulty = match raw.difficulty.as_deref() {
            Some(d) => d.parse()?,
            None => Difficulty::default(),
        };
        let question = QuizQuestion {
            question: raw.question,
            options: raw.options,
            answer: raw.answer,
            difficulty,
            explanation: raw.explanation.unwrap_or_default(),
        };
        question.validate()?;
        Ok(question)
    }

    pub fn validate(&self) -> std::result::Result<(), QuestionError> {
        if self.question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&self.options.len()) {
            return Err(QuestionError::OptionCount(self.options.len()));
        }
        if let Some(idx) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption(idx));
        }
        let matches = self.options.iter().filter(|o| **o == self.answer).count();
        if matches != 1 {
            return Err(QuestionError::AnswerMismatch {
                answer: self.answer.clone(),
                matches,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntities {
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
}

/// Final output of one pipeline run. Identity is assigned by storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub url: String,
    pub title: String,
    pub full_text: String,
    #[serde(default)]
    pub key_entities: KeyEntities,
    #[serde(default)]
    pub sections: Vec<String>,
    pub quiz: Vec<QuizQuestion>,
    #[serde(default)]
    pub related_topics: Vec<String>,
}

impl QuizRecord {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuiz {
    pub id: String,
    pub date_generated: DateTime<Utc>,
    #[serde(flatten)]
    pub record: QuizRecord,
}

/// History entry; leaves out the large fields of a stored quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: String,
    pub url: String,
    pub title: String,
    pub date_generated: DateTime<Utc>,
}

impl From<&StoredQuiz> for QuizSummary {
    fn from(stored: &StoredQuiz) -> Self {
        Self {
            id: stored.id.clone(),
            url: stored.record.url.clone(),
            title: stored.record.title.clone(),
            date_generated: stored.date_generated,
        }
    }
}
