// src/lib.rs
// MovieHub - storage-agnostic core of a movie catalog
//
// Architecture:
// - Domain-centric: entities and association builders own the link rules
// - One repository contract, two stores: in-memory (tests, default
//   runtime) and SQLite (persistent)
// - Explicit: units of work, accumulators and sessions are passed in,
//   never resolved from ambient state
// - Bulk loader: flat CSV sources in, fully linked entity graph out

// ============================================================================
// MODULES
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod loader;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use domain::{
    make_actor_association,
    make_director_association,
    make_genre_association,
    make_review,
    validate_movie,
    validate_user,
    // Entities
    Actor,
    Director,
    DomainError,
    Genre,
    Movie,
    MovieId,
    Review,
    TagKind,
    User,
};

pub use error::{AppError, AppResult};

pub use repositories::{CatalogRepository, MemoryCatalogRepository, SqliteCatalogRepository};

pub use loader::populate;
