// src/repositories/catalog_repository.rs
//
// The storage-agnostic repository contract

#[cfg(test)]
use mockall::automock;

use crate::domain::{Actor, Director, Genre, Movie, MovieId, Review, User};
use crate::error::{AppError, AppResult};

/// The capability set every backing store implements.
///
/// Lookups by single key return `Ok(None)` for an absent key; they never
/// treat "absent" as an error. Name matches are case-sensitive and exact.
/// Tag and user lists preserve insertion order.
#[cfg_attr(test, automock)]
pub trait CatalogRepository: Send + Sync {
    fn add_user(&mut self, user: User) -> AppResult<()>;

    fn get_user(&self, username: &str) -> AppResult<Option<User>>;

    /// Adding an id that is already stored is an error
    /// (`AppError::DuplicateMovie`); ids are assigned once at load time.
    fn add_movie(&mut self, movie: Movie) -> AppResult<()>;

    fn get_movie(&self, id: MovieId) -> AppResult<Option<Movie>>;

    fn number_of_movies(&self) -> AppResult<usize>;

    /// Resolves the given ids to movies. Ids not present in the store are
    /// silently dropped; the caller-supplied order of the present ids is
    /// preserved.
    fn get_movies_by_id(&self, ids: &[MovieId]) -> AppResult<Vec<Movie>>;

    fn movie_ids_all(&self) -> AppResult<Vec<MovieId>>;

    fn movie_ids_for_genre(&self, genre_name: &str) -> AppResult<Vec<MovieId>>;

    fn movie_ids_for_actor(&self, actor_name: &str) -> AppResult<Vec<MovieId>>;

    fn movie_ids_for_director(&self, director_name: &str) -> AppResult<Vec<MovieId>>;

    /// Registers a genre and persists its association edges.
    fn add_genre(&mut self, genre: Genre) -> AppResult<()>;

    fn genres(&self) -> AppResult<Vec<Genre>>;

    fn add_actor(&mut self, actor: Actor) -> AppResult<()>;

    fn actors(&self) -> AppResult<Vec<Actor>>;

    fn add_director(&mut self, director: Director) -> AppResult<()>;

    fn directors(&self) -> AppResult<Vec<Director>>;

    /// Stores a review whose bidirectional links were already established
    /// by `make_review`. The user-side and movie-side endpoints travel as
    /// borrows so the store can re-validate both links; it never builds
    /// them itself. Fails with `AppError::Consistency`, without mutating
    /// state, when either link is missing.
    fn add_review(&mut self, user: &User, movie: &Movie, review: Review) -> AppResult<()>;

    fn reviews(&self) -> AppResult<Vec<Review>>;
}

/// Shared `add_review` precondition: the review must already sit in both
/// the user's and the movie's collections, and its identifiers must agree
/// with those endpoints.
pub(crate) fn ensure_review_links(user: &User, movie: &Movie, review: &Review) -> AppResult<()> {
    if review.username() != user.username() || !user.reviews().any(|r| r == review) {
        return Err(AppError::Consistency(
            "Review not correctly attached to a User".to_string(),
        ));
    }
    if review.movie_id() != movie.id() || !movie.comments().any(|r| r == review) {
        return Err(AppError::Consistency(
            "Review not correctly attached to a Movie".to_string(),
        ));
    }
    Ok(())
}
