// src/services/mod.rs
//
// Services Module - the call interface the web layer consumes
//
// Storage-agnostic functions over the repository contract. The unit of
// work (the repository borrow) is passed in explicitly by the caller;
// nothing here resolves ambient state.

pub mod catalog_service;


pub use catalog_service::{
    add_comment, comments_for_movie, get_movie, get_movies_by_id, movie_ids_all,
    movie_ids_for_actor, movie_ids_for_director, movie_ids_for_genre, paginate, CommentSummary,
    MovieSummary, Page,
};
