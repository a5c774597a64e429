// src/domain/associations.rs
//
// Association builders - the only sanctioned way to create bidirectional
// links between entities. Each tag builder checks for a duplicate pairing
// before touching either side, so on failure no partial state exists.

use chrono::{DateTime, Utc};

use crate::domain::actor::Actor;
use crate::domain::director::Director;
use crate::domain::genre::Genre;
use crate::domain::movie::Movie;
use crate::domain::review::Review;
use crate::domain::user::User;
use crate::domain::{DomainError, DomainResult, TagKind};

/// Links a movie and a genre in both directions.
/// Fails if the genre is already applied to the movie.
pub fn make_genre_association(movie: &mut Movie, genre: &mut Genre) -> DomainResult<()> {
    if genre.is_applied_to(movie) {
        return Err(DomainError::DuplicateAssociation {
            kind: TagKind::Genre,
            name: genre.name().to_string(),
            title: movie.title().to_string(),
        });
    }

    movie.add_genre(genre.name().to_string());
    genre.add_movie(movie.id());
    Ok(())
}

/// Links a movie and an actor in both directions.
/// Fails if the actor is already applied to the movie.
pub fn make_actor_association(movie: &mut Movie, actor: &mut Actor) -> DomainResult<()> {
    if actor.is_applied_to(movie) {
        return Err(DomainError::DuplicateAssociation {
            kind: TagKind::Actor,
            name: actor.name().to_string(),
            title: movie.title().to_string(),
        });
    }

    movie.add_actor(actor.name().to_string());
    actor.add_movie(movie.id());
    Ok(())
}

/// Links a movie and a director in both directions.
/// Fails if the director is already applied to the movie.
pub fn make_director_association(movie: &mut Movie, director: &mut Director) -> DomainResult<()> {
    if director.is_applied_to(movie) {
        return Err(DomainError::DuplicateAssociation {
            kind: TagKind::Director,
            name: director.name().to_string(),
            title: movie.title().to_string(),
        });
    }

    movie.add_director(director.name().to_string());
    director.add_movie(movie.id());
    Ok(())
}

/// Creates a review and appends it to both the authoring user's and the
/// movie's collections. Always succeeds; there is no duplicate check for
/// reviews.
pub fn make_review(
    comment_text: &str,
    user: &mut User,
    movie: &mut Movie,
    timestamp: DateTime<Utc>,
) -> Review {
    let review = Review::new(user.username(), movie.id(), comment_text, timestamp);
    user.add_review(review.clone());
    movie.add_comment(review.clone());
    review
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie() -> Movie {
        Movie::new(
            1,
            "Guardians of the Galaxy",
            "A group of intergalactic criminals are forced to work together.",
            2014,
            121,
            8.1,
            757074,
            Some(333.13),
            Some(76),
        )
    }

    #[test]
    fn test_make_genre_association() {
        let mut movie = movie();
        let mut genre = Genre::new("Action");

        make_genre_association(&mut movie, &mut genre).unwrap();

        assert!(genre.is_applied_to(&movie));
        assert!(movie.is_genre_by(&genre));
        assert_eq!(genre.movies().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_duplicate_genre_association_fails() {
        let mut movie = movie();
        let mut genre = Genre::new("Action");

        make_genre_association(&mut movie, &mut genre).unwrap();
        let err = make_genre_association(&mut movie, &mut genre).unwrap_err();

        assert!(matches!(err, DomainError::DuplicateAssociation { .. }));
        // the association count for the pair stays at one
        assert_eq!(genre.number_of_movies(), 1);
        assert_eq!(movie.genres().count(), 1);
    }

    #[test]
    fn test_make_actor_association() {
        let mut movie = movie();
        let mut actor = Actor::new("Chris Pratt");

        make_actor_association(&mut movie, &mut actor).unwrap();

        assert!(actor.is_applied_to(&movie));
        assert!(movie.is_actor_by(&actor));
    }

    #[test]
    fn test_make_director_association() {
        let mut movie = movie();
        let mut director = Director::new("James Gunn");

        make_director_association(&mut movie, &mut director).unwrap();

        assert!(director.is_applied_to(&movie));
        assert!(movie.is_director_by(&director));
    }

    #[test]
    fn test_duplicate_director_association_fails() {
        let mut movie = movie();
        let mut director = Director::new("James Gunn");

        make_director_association(&mut movie, &mut director).unwrap();
        assert!(make_director_association(&mut movie, &mut director).is_err());
        assert_eq!(director.number_of_movies(), 1);
    }

    #[test]
    fn test_make_review_links_both_sides() {
        let mut movie = movie();
        let mut user = User::new("dbowie", "1234567890");

        let review = make_review("awesome movie", &mut user, &mut movie, chrono::Utc::now());

        assert!(user.reviews().any(|r| *r == review));
        assert!(movie.comments().any(|r| *r == review));
        assert_eq!(review.username(), "dbowie");
        assert_eq!(review.movie_id(), 1);
    }
}
