// src/repositories/memory_catalog_repository.rs
//
// Array/index-backed implementation of the repository contract. The sole
// source of truth for tests and the default runtime store.

use std::collections::HashMap;

use crate::domain::{Actor, Director, Genre, Movie, MovieId, Review, User};
use crate::error::{AppError, AppResult};
use crate::repositories::catalog_repository::{ensure_review_links, CatalogRepository};

/// In-memory store.
///
/// Movies live in an id-keyed map with a side vector keeping ids in
/// year-sorted insertion order. Genres, actors, directors and users are
/// plain insertion-ordered vectors with linear scan on name lookups.
#[derive(Debug, Default)]
pub struct MemoryCatalogRepository {
    users: Vec<User>,
    movies: HashMap<MovieId, Movie>,
    // (year, id), kept sorted by year; ties keep insertion order.
    year_order: Vec<(i32, MovieId)>,
    genres: Vec<Genre>,
    actors: Vec<Actor>,
    directors: Vec<Director>,
    reviews: Vec<Review>,
}

impl MemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogRepository for MemoryCatalogRepository {
    fn add_user(&mut self, user: User) -> AppResult<()> {
        self.users.push(user);
        Ok(())
    }

    fn get_user(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }

    fn add_movie(&mut self, movie: Movie) -> AppResult<()> {
        if self.movies.contains_key(&movie.id()) {
            return Err(AppError::DuplicateMovie(movie.id()));
        }

        // Leftmost position among equal years, so insertion order is
        // stable for ties.
        let pos = self
            .year_order
            .partition_point(|(year, _)| *year < movie.year());
        self.year_order.insert(pos, (movie.year(), movie.id()));
        self.movies.insert(movie.id(), movie);
        Ok(())
    }

    fn get_movie(&self, id: MovieId) -> AppResult<Option<Movie>> {
        Ok(self.movies.get(&id).cloned())
    }

    fn number_of_movies(&self) -> AppResult<usize> {
        Ok(self.movies.len())
    }

    fn get_movies_by_id(&self, ids: &[MovieId]) -> AppResult<Vec<Movie>> {
        // Strip out ids that don't represent movies in the store, keeping
        // the caller's order for those that do.
        Ok(ids
            .iter()
            .filter_map(|id| self.movies.get(id).cloned())
            .collect())
    }

    fn movie_ids_all(&self) -> AppResult<Vec<MovieId>> {
        Ok(self.year_order.iter().map(|(_, id)| *id).collect())
    }

    fn movie_ids_for_genre(&self, genre_name: &str) -> AppResult<Vec<MovieId>> {
        // Linear search for the first genre with the given name.
        Ok(self
            .genres
            .iter()
            .find(|genre| genre.name() == genre_name)
            .map(|genre| genre.movies().collect())
            .unwrap_or_default())
    }

    fn movie_ids_for_actor(&self, actor_name: &str) -> AppResult<Vec<MovieId>> {
        Ok(self
            .actors
            .iter()
            .find(|actor| actor.name() == actor_name)
            .map(|actor| actor.movies().collect())
            .unwrap_or_default())
    }

    fn movie_ids_for_director(&self, director_name: &str) -> AppResult<Vec<MovieId>> {
        Ok(self
            .directors
            .iter()
            .find(|director| director.name() == director_name)
            .map(|director| director.movies().collect())
            .unwrap_or_default())
    }

    fn add_genre(&mut self, genre: Genre) -> AppResult<()> {
        // Persist the movie-side edges onto the stored canonical movies.
        // Idempotent: a movie that already carries the name is left alone.
        for movie_id in genre.movies().collect::<Vec<_>>() {
            if let Some(movie) = self.movies.get_mut(&movie_id) {
                if !movie.genres().any(|name| name == genre.name()) {
                    movie.add_genre(genre.name().to_string());
                }
            }
        }
        self.genres.push(genre);
        Ok(())
    }

    fn genres(&self) -> AppResult<Vec<Genre>> {
        Ok(self.genres.clone())
    }

    fn add_actor(&mut self, actor: Actor) -> AppResult<()> {
        for movie_id in actor.movies().collect::<Vec<_>>() {
            if let Some(movie) = self.movies.get_mut(&movie_id) {
                if !movie.actors().any(|name| name == actor.name()) {
                    movie.add_actor(actor.name().to_string());
                }
            }
        }
        self.actors.push(actor);
        Ok(())
    }

    fn actors(&self) -> AppResult<Vec<Actor>> {
        Ok(self.actors.clone())
    }

    fn add_director(&mut self, director: Director) -> AppResult<()> {
        for movie_id in director.movies().collect::<Vec<_>>() {
            if let Some(movie) = self.movies.get_mut(&movie_id) {
                if !movie.directors().any(|name| name == director.name()) {
                    movie.add_director(director.name().to_string());
                }
            }
        }
        self.directors.push(director);
        Ok(())
    }

    fn directors(&self) -> AppResult<Vec<Director>> {
        Ok(self.directors.clone())
    }

    fn add_review(&mut self, user: &User, movie: &Movie, review: Review) -> AppResult<()> {
        ensure_review_links(user, movie, &review)?;

        // Persist the established links onto the stored canonical copies.
        if let Some(stored) = self
            .users
            .iter_mut()
            .find(|u| u.username() == review.username())
        {
            if !stored.reviews().any(|r| r == &review) {
                stored.add_review(review.clone());
            }
        }
        if let Some(stored) = self.movies.get_mut(&review.movie_id()) {
            if !stored.comments().any(|r| r == &review) {
                stored.add_comment(review.clone());
            }
        }

        self.reviews.push(review);
        Ok(())
    }

    fn reviews(&self) -> AppResult<Vec<Review>> {
        Ok(self.reviews.clone())
    }
}
