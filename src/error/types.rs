// src/error/types.rs
use crate::domain::{DomainError, MovieId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A review arrived at a repository without both of its bidirectional
    /// links in place. Signals a caller bug in link construction order.
    #[error("Repository consistency error: {0}")]
    Consistency(String),

    /// A movie id that is already stored was added again.
    #[error("Movie id {0} already in repository")]
    DuplicateMovie(MovieId),

    #[error("No movie with id {0}")]
    UnknownMovie(MovieId),

    #[error("No user named {0}")]
    UnknownUser(String),

    #[error("Load error: {0}")]
    Loader(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
