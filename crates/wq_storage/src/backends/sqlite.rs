use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use wq_core::{Error, QuizRecord, QuizStorage, QuizSummary, Result, StoredQuiz};

use crate::assign_identity;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://quizzes.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS quizzes (
        id TEXT PRIMARY KEY,
        url TEXT NOT NULL,
        title TEXT NOT NULL,
        date_generated TEXT NOT NULL,
        document TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS quizzes_date_generated ON quizzes (date_generated)",
];

fn storage_error(context: &str, e: sqlx::Error) -> Error {
    Error::Storage(format!("{}: {}", context, e))
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("Failed to parse date '{}': {}", raw, e)))
}

pub struct SQLiteStorage {
    pool: SqlitePool,
}

impl SQLiteStorage {
    /// Accepts either a `sqlite:` URL or a plain file path.
    pub async fn open(location: &str) -> Result<Self> {
        let options = if location.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(location)
                .map_err(|e| Error::Config(format!("Invalid database URL '{}': {}", location, e)))?
        } else {
            SqliteConnectOptions::new().filename(location)
        }
        .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| storage_error("Failed to connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| storage_error(&format!("Failed to run migration {}", i), e))?;
        }

        tracing::debug!("Opened SQLite quiz store at {}", location);
        Ok(Self { pool })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.pool.is_closed() {
            return Err(Error::Storage("SQLite storage has been closed".to_string()));
        }
        Ok(())
    }

    fn row_to_stored(row: &SqliteRow) -> Result<StoredQuiz> {
        let document: String = row.get("document");
        let record: QuizRecord = serde_json::from_str(&document)?;
        Ok(StoredQuiz {
            id: row.get("id"),
            date_generated: parse_date(row.get::<&str, _>("date_generated"))?,
            record,
        })
    }
}

#[async_trait]
impl QuizStorage for SQLiteStorage {
    async fn insert(&self, record: &QuizRecord) -> Result<StoredQuiz> {
        self.ensure_open()?;
        let stored = assign_identity(record);
        let document = serde_json::to_string(&stored.record)?;

        sqlx::query(
            r#"
            INSERT INTO quizzes (id, url, title, date_generated, document)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&stored.id)
        .bind(&stored.record.url)
        .bind(&stored.record.title)
        .bind(stored.date_generated.to_rfc3339_opts(SecondsFormat::Micros, true))
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to store quiz", e))?;

        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<QuizSummary>> {
        self.ensure_open()?;
        let rows = sqlx::query(
            r#"
            SELECT id, url, title, date_generated FROM quizzes
            ORDER BY date_generated DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to list quizzes", e))?;

        rows.iter()
            .map(|row| {
                Ok(QuizSummary {
                    id: row.get("id"),
                    url: row.get("url"),
                    title: row.get("title"),
                    date_generated: parse_date(row.get::<&str, _>("date_generated"))?,
                })
            })
            .collect()
    }

    async fn get(&self, id: &str) -> Result<Option<StoredQuiz>> {
        self.ensure_open()?;
        let row = sqlx::query("SELECT id, date_generated, document FROM quizzes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to fetch quiz", e))?;

        row.as_ref().map(Self::row_to_stored).transpose()
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wq_core::{Difficulty, QuizQuestion};

    fn record() -> QuizRecord {
        QuizRecord {
            url: "https://en.wikipedia.org/wiki/Rust_(programming_language)".to_string(),
            title: "Rust (programming language)".to_string(),
            full_text: "Rust is a general-purpose programming language.".to_string(),
            quiz: vec![QuizQuestion {
                question: "What kind of language is Rust?".to_string(),
                options: vec!["General-purpose".to_string(), "Markup".to_string(), "Query".to_string()],
                answer: "General-purpose".to_string(),
                difficulty: Difficulty::Easy,
                explanation: String::new(),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sqlite_storage() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = SQLiteStorage::open(db_path.to_str().unwrap()).await.unwrap();

        let first = storage.insert(&record()).await.unwrap();
        let second = storage.insert(&record()).await.unwrap();

        let fetched = storage.get(&first.id).await.unwrap().unwrap();
        assert_eq!(fetched.record, first.record);
        assert_eq!(fetched.id, first.id);
        assert!(storage.get("missing").await.unwrap().is_none());

        let history = storage.list().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);

        storage.close().await.unwrap();
        assert!(matches!(storage.list().await, Err(Error::Storage(_))));
    }

    #[tokio::test]
    async fn test_reopen_keeps_quizzes() {
        let temp_dir = tempdir().unwrap();
        let url = format!("sqlite://{}", temp_dir.path().join("quizzes.db").display());

        let storage = SQLiteStorage::open(&url).await.unwrap();
        let stored = storage.insert(&record()).await.unwrap();
        storage.close().await.unwrap();

        let storage = SQLiteStorage::open(&url).await.unwrap();
        assert!(storage.get(&stored.id).await.unwrap().is_some());
        storage.close().await.unwrap();
    }
}
