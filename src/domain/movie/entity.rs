use serde::{Deserialize, Serialize};

use crate::domain::review::Review;
use crate::domain::{Actor, Director, Genre};

/// External movie key: the 1-based rank the movie held in its source file.
/// Assigned at load time and never reassigned.
pub type MovieId = u32;

/// A catalog movie.
///
/// Scalar attributes are immutable after construction. The association
/// collections (genres, actors, directors, comments) are non-owning edges:
/// tag sides are stored by name, review sides by value. They are appended
/// only through the association builders in `domain::associations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    id: MovieId,
    title: String,
    description: String,
    year: i32,
    runtime_minutes: u32,
    rating: f64,
    votes: u32,
    /// `None` when the source carried the literal "N/A".
    revenue_millions: Option<f64>,
    /// `None` when the source carried the literal "N/A".
    metascore: Option<u32>,

    comments: Vec<Review>,
    genres: Vec<String>,
    actors: Vec<String>,
    directors: Vec<String>,
}

impl Movie {
    pub fn new(
        id: MovieId,
        title: impl Into<String>,
        description: impl Into<String>,
        year: i32,
        runtime_minutes: u32,
        rating: f64,
        votes: u32,
        revenue_millions: Option<f64>,
        metascore: Option<u32>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            year,
            runtime_minutes,
            rating,
            votes,
            revenue_millions,
            metascore,
            comments: Vec::new(),
            genres: Vec::new(),
            actors: Vec::new(),
            directors: Vec::new(),
        }
    }

    pub fn id(&self) -> MovieId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn runtime_minutes(&self) -> u32 {
        self.runtime_minutes
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn votes(&self) -> u32 {
        self.votes
    }

    pub fn revenue_millions(&self) -> Option<f64> {
        self.revenue_millions
    }

    pub fn metascore(&self) -> Option<u32> {
        self.metascore
    }

    pub fn comments(&self) -> impl Iterator<Item = &Review> {
        self.comments.iter()
    }

    pub fn number_of_comments(&self) -> usize {
        self.comments.len()
    }

    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(String::as_str)
    }

    pub fn actors(&self) -> impl Iterator<Item = &str> {
        self.actors.iter().map(String::as_str)
    }

    pub fn directors(&self) -> impl Iterator<Item = &str> {
        self.directors.iter().map(String::as_str)
    }

    pub fn is_genre_by(&self, genre: &Genre) -> bool {
        self.genres.iter().any(|name| name == genre.name())
    }

    pub fn has_genres(&self) -> bool {
        !self.genres.is_empty()
    }

    pub fn is_actor_by(&self, actor: &Actor) -> bool {
        self.actors.iter().any(|name| name == actor.name())
    }

    pub fn has_actors(&self) -> bool {
        !self.actors.is_empty()
    }

    pub fn is_director_by(&self, director: &Director) -> bool {
        self.directors.iter().any(|name| name == director.name())
    }

    pub fn has_directors(&self) -> bool {
        !self.directors.is_empty()
    }

    pub(crate) fn add_comment(&mut self, comment: Review) {
        self.comments.push(comment);
    }

    pub(crate) fn add_genre(&mut self, genre_name: String) {
        self.genres.push(genre_name);
    }

    pub(crate) fn add_actor(&mut self, actor_name: String) {
        self.actors.push(actor_name);
    }

    pub(crate) fn add_director(&mut self, director_name: String) {
        self.directors.push(director_name);
    }
}

/// Equality compares the scalar attributes only; the id and the
/// association collections are not part of it.
impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.year == other.year
            && self.runtime_minutes == other.runtime_minutes
            && self.rating == other.rating
            && self.votes == other.votes
            && self.revenue_millions == other.revenue_millions
            && self.metascore == other.metascore
    }
}
