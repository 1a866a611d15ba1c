use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("invalid question data in entry {index}: {reason}")]
    InvalidQuestionData { index: usize, reason: String },

    #[error("unknown question bank {name} (available: {available})")]
    UnknownBank { name: String, available: String },

    #[error("failed to save leaderboard to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
