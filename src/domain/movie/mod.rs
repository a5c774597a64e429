pub mod entity;
pub mod invariants;

pub use entity::{Movie, MovieId};
pub use invariants::validate_movie;
