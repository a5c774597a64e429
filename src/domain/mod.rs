// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod actor;
pub mod associations;
pub mod director;
pub mod genre;
pub mod movie;
pub mod review;
pub mod user;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Movie Domain
pub use movie::{validate_movie, Movie, MovieId};

// Tag Entities
pub use actor::Actor;
pub use director::Director;
pub use genre::Genre;

// Users & Reviews
pub use review::Review;
pub use user::{validate_user, User};

// Association Builders
pub use associations::{
    make_actor_association, make_director_association, make_genre_association, make_review,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use std::fmt;
use thiserror::Error;

/// The semantic role of a tag entity, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Genre,
    Actor,
    Director,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::Genre => write!(f, "Genre"),
            TagKind::Actor => write!(f, "Actor"),
            TagKind::Director => write!(f, "Director"),
        }
    }
}

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("{kind} {name} already applied to movie \"{title}\"")]
    DuplicateAssociation {
        kind: TagKind,
        name: String,
        title: String,
    },
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
