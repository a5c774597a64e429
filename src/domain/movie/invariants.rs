use super::entity::Movie;
use crate::domain::{DomainError, DomainResult};

/// Validates all Movie invariants
/// These are the absolute rules that must hold for a Movie to be valid
pub fn validate_movie(movie: &Movie) -> DomainResult<()> {
    validate_title(movie.title())?;
    validate_runtime(movie.runtime_minutes())?;
    Ok(())
}

/// Title cannot be empty
fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Movie title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Runtime must be a positive number of minutes
fn validate_runtime(runtime_minutes: u32) -> DomainResult<()> {
    if runtime_minutes == 0 {
        return Err(DomainError::InvariantViolation(
            "Movie runtime must be at least one minute".to_string(),
        ));
    }
    Ok(())
}

/// Invariants that must hold true for the Movie domain:
///
/// 1. Movie can exist without genres, actors, directors or comments
/// 2. Identity (source rank) is immutable
/// 3. Scalar attributes never change after construction
/// 4. Title cannot be empty
/// 5. Runtime is a positive number of minutes
/// 6. A tag is associated at most once per movie

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_movie() {
        let movie = Movie::new(1, "Split", "Three girls are kidnapped.", 2016, 117, 7.3, 157606, Some(138.12), Some(62));
        assert!(validate_movie(&movie).is_ok());
    }

    #[test]
    fn test_empty_title_fails() {
        let movie = Movie::new(1, "   ", "desc", 2016, 117, 7.3, 157606, None, None);
        assert!(validate_movie(&movie).is_err());
    }

    #[test]
    fn test_zero_runtime_fails() {
        let movie = Movie::new(1, "Split", "desc", 2016, 0, 7.3, 157606, None, None);
        assert!(validate_movie(&movie).is_err());
    }
}
