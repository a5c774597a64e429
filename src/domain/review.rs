use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::movie::MovieId;

/// A user's comment on a movie.
///
/// Reviews are immutable values. They reference their endpoints by stable
/// identifier (username and movie id) rather than by owning either entity;
/// the bidirectional links live in the user's and the movie's collections
/// and are established only by `domain::associations::make_review`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    username: String,
    movie_id: MovieId,
    comment: String,
    timestamp: DateTime<Utc>,
}

impl Review {
    pub fn new(
        username: impl Into<String>,
        movie_id: MovieId,
        comment: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            movie_id,
            comment: comment.into(),
            timestamp,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
