use serde::{Deserialize, Serialize};

use crate::domain::movie::{Movie, MovieId};

/// An actor tag: a named entity holding the ids of the movies it appears in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    name: String,
    movies: Vec<MovieId>,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            movies: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn movies(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.movies.iter().copied()
    }

    pub fn number_of_movies(&self) -> usize {
        self.movies.len()
    }

    pub fn is_applied_to(&self, movie: &Movie) -> bool {
        self.movies.contains(&movie.id())
    }

    pub(crate) fn add_movie(&mut self, movie_id: MovieId) {
        self.movies.push(movie_id);
    }
}

/// Equality is by name, the actor's natural key.
impl PartialEq for Actor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Actor {}
