use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No article paragraphs found at {url}")]
    EmptyContent { url: String },

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// True for the two errors the extraction step is allowed to surface.
    pub fn is_extraction(&self) -> bool {
        matches!(self, Error::Fetch(_) | Error::EmptyContent { .. })
    }
}

/// Failure to retrieve the article page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The host refused the request, usually an anti-scraping rejection.
    #[error("{status} from {url}; the host may be blocking non-browser clients or this IP")]
    Blocked { url: String, status: u16 },

    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    pub fn is_blocked(&self) -> bool {
        matches!(self, FetchError::Blocked { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Blocked { status, .. } | FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
            FetchError::InvalidUrl(_) => None,
        }
    }
}

/// Why a generated question was rejected.
#[derive(Error, Debug)]
pub enum QuestionError {
    #[error("malformed question object: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("question text is empty")]
    EmptyQuestion,

    #[error("expected 3 to 5 options, got {0}")]
    OptionCount(usize),

    #[error("option {0} is empty")]
    EmptyOption(usize),

    #[error("answer {answer:?} matches {matches} options, expected exactly one")]
    AnswerMismatch { answer: String, matches: usize },

    #[error("unknown difficulty {0:?}")]
    UnknownDifficulty(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_is_distinguished() {
        let blocked = FetchError::Blocked { url: "https://en.wikipedia.org/wiki/Rust".to_string(), status: 403 };
        let generic = FetchError::Status { url: "https://en.wikipedia.org/wiki/Rust".to_string(), status: 500 };

        assert!(blocked.is_blocked());
        assert!(!generic.is_blocked());
        assert_eq!(blocked.status(), Some(403));
        assert_eq!(generic.status(), Some(500));
        assert!(Error::from(blocked).is_extraction());
    }

    #[test]
    fn test_storage_error_is_not_extraction() {
        assert!(!Error::Storage("closed".to_string()).is_extraction());
        assert!(Error::EmptyContent { url: "u".to_string() }.is_extraction());
    }
}
