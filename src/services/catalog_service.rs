// src/services/catalog_service.rs
//
// Catalog queries and the comment-posting command, plus the serializable
// summary shapes the view layer renders.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{make_review, Movie, MovieId, Review};
use crate::error::{AppError, AppResult};
use crate::repositories::CatalogRepository;

/// View of a movie with its association collections flattened to names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    pub year: i32,
    pub runtime_minutes: u32,
    pub rating: f64,
    pub votes: u32,
    pub revenue_millions: Option<f64>,
    pub metascore: Option<u32>,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    pub comments: Vec<CommentSummary>,
}

impl MovieSummary {
    fn from_movie(movie: &Movie) -> Self {
        Self {
            id: movie.id(),
            title: movie.title().to_string(),
            description: movie.description().to_string(),
            year: movie.year(),
            runtime_minutes: movie.runtime_minutes(),
            rating: movie.rating(),
            votes: movie.votes(),
            revenue_millions: movie.revenue_millions(),
            metascore: movie.metascore(),
            genres: movie.genres().map(str::to_string).collect(),
            actors: movie.actors().map(str::to_string).collect(),
            directors: movie.directors().map(str::to_string).collect(),
            comments: movie.comments().map(CommentSummary::from_review).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentSummary {
    pub username: String,
    pub movie_id: MovieId,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

impl CommentSummary {
    fn from_review(review: &Review) -> Self {
        Self {
            username: review.username().to_string(),
            movie_id: review.movie_id(),
            comment: review.comment().to_string(),
            timestamp: review.timestamp(),
        }
    }
}

pub fn get_movie(repo: &dyn CatalogRepository, movie_id: MovieId) -> AppResult<MovieSummary> {
    let movie = repo
        .get_movie(movie_id)?
        .ok_or(AppError::UnknownMovie(movie_id))?;
    Ok(MovieSummary::from_movie(&movie))
}

pub fn movie_ids_all(repo: &dyn CatalogRepository) -> AppResult<Vec<MovieId>> {
    repo.movie_ids_all()
}

pub fn movie_ids_for_genre(repo: &dyn CatalogRepository, genre_name: &str) -> AppResult<Vec<MovieId>> {
    repo.movie_ids_for_genre(genre_name)
}

pub fn movie_ids_for_actor(repo: &dyn CatalogRepository, actor_name: &str) -> AppResult<Vec<MovieId>> {
    repo.movie_ids_for_actor(actor_name)
}

pub fn movie_ids_for_director(
    repo: &dyn CatalogRepository,
    director_name: &str,
) -> AppResult<Vec<MovieId>> {
    repo.movie_ids_for_director(director_name)
}

pub fn get_movies_by_id(
    repo: &dyn CatalogRepository,
    ids: &[MovieId],
) -> AppResult<Vec<MovieSummary>> {
    let movies = repo.get_movies_by_id(ids)?;
    Ok(movies.iter().map(MovieSummary::from_movie).collect())
}

pub fn comments_for_movie(
    repo: &dyn CatalogRepository,
    movie_id: MovieId,
) -> AppResult<Vec<CommentSummary>> {
    let movie = repo
        .get_movie(movie_id)?
        .ok_or(AppError::UnknownMovie(movie_id))?;
    Ok(movie.comments().map(CommentSummary::from_review).collect())
}

/// Posts a comment: resolves the movie and the authenticated user, builds
/// the review through `make_review` so both bidirectional links exist,
/// then hands it to the repository.
pub fn add_comment(
    repo: &mut dyn CatalogRepository,
    movie_id: MovieId,
    comment_text: &str,
    username: &str,
    timestamp: DateTime<Utc>,
) -> AppResult<()> {
    let mut movie = repo
        .get_movie(movie_id)?
        .ok_or(AppError::UnknownMovie(movie_id))?;
    let mut user = repo
        .get_user(username)?
        .ok_or_else(|| AppError::UnknownUser(username.to_string()))?;

    let review = make_review(comment_text, &mut user, &mut movie, timestamp);
    repo.add_review(&user, &movie, review)
}

/// One page of an id listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub ids: Vec<MovieId>,
    /// Cursor of the previous page, `None` on the first page.
    pub prev_cursor: Option<usize>,
    /// Cursor of the next page, `None` on the last page.
    pub next_cursor: Option<usize>,
}

/// Cursor pagination over an id list: `cursor` is the offset of the first
/// id on the page. A cursor past the end yields an empty page.
pub fn paginate(ids: &[MovieId], cursor: usize, per_page: usize) -> Page {
    let end = usize::min(cursor + per_page, ids.len());
    let page_ids = if cursor < ids.len() {
        ids[cursor..end].to_vec()
    } else {
        Vec::new()
    };

    let prev_cursor = if cursor > 0 {
        Some(cursor.saturating_sub(per_page))
    } else {
        None
    };
    let next_cursor = if cursor + per_page < ids.len() {
        Some(cursor + per_page)
    } else {
        None
    };

    Page {
        ids: page_ids,
        prev_cursor,
        next_cursor,
    }
}
