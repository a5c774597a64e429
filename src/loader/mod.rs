// src/loader/mod.rs
//
// Bulk loader: builds the entity graph from flat CSV sources and populates
// a repository through the storage-agnostic contract.
//
// Two-pass construction per tag family: pass 1 scans the movie source
// once, creating movies and filling per-name accumulators; pass 2 turns
// each accumulated name into a tag entity, links it to its movies through
// the domain association builders, and registers it. Users must be loaded
// before comments (comments reference user row keys) and movies before
// comments (comments reference movie ids).

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::info;
use sha2::{Digest, Sha256};

use crate::domain::{
    make_actor_association, make_director_association, make_genre_association, make_review,
    validate_movie, validate_user, Actor, Director, Genre, Movie, MovieId, User,
};
use crate::error::{AppError, AppResult};
use crate::repositories::CatalogRepository;

/// Per-name accumulator built during the movie scan: tag name → the ids of
/// the movies referencing it, both in first-seen order. Passed explicitly
/// between the two load passes; no shared state survives a load call.
#[derive(Debug, Default)]
pub struct TagAccumulator {
    names: Vec<String>,
    ids_by_name: HashMap<String, Vec<MovieId>>,
}

impl TagAccumulator {
    fn push(&mut self, name: &str, movie_id: MovieId) {
        match self.ids_by_name.get_mut(name) {
            Some(ids) => ids.push(movie_id),
            None => {
                self.names.push(name.to_string());
                self.ids_by_name.insert(name.to_string(), vec![movie_id]);
            }
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &[MovieId])> {
        self.names
            .iter()
            .map(|name| (name.as_str(), self.ids_by_name[name].as_slice()))
    }
}

fn csv_records(path: &Path) -> AppResult<Vec<StringRecord>> {
    // Header row skipped; every field arrives whitespace-trimmed.
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| AppError::Loader(format!("{}: {}", path.display(), e)))?;

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?);
    }
    Ok(records)
}

fn field<'a>(record: &'a StringRecord, index: usize, row: usize, what: &str) -> AppResult<&'a str> {
    record
        .get(index)
        .ok_or_else(|| AppError::Loader(format!("row {}: missing {} column", row, what)))
}

fn parse_number<T: std::str::FromStr>(value: &str, row: usize, what: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::Loader(format!("row {}: invalid {} \"{}\"", row, what, value)))
}

/// "N/A" in the source means the value is unknown, not zero.
fn parse_optional_number<T: std::str::FromStr>(
    value: &str,
    row: usize,
    what: &str,
) -> AppResult<Option<T>> {
    if value == "N/A" {
        return Ok(None);
    }
    parse_number(value, row, what).map(Some)
}

/// Comment timestamps are ISO-8601, with either a 'T' or a space between
/// date and time.
fn parse_timestamp(value: &str, row: usize) -> AppResult<DateTime<Utc>> {
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(AppError::Loader(format!(
        "row {}: invalid timestamp \"{}\"",
        row, value
    )))
}

/// The opaque one-way password transform. Plaintext never reaches the
/// domain or a repository.
pub fn hash_password(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Loads the movie source and reconstructs the movie/tag associations.
///
/// Pass 1: one scan creating a Movie per row (the rank column is the id)
/// and accumulating genre/actor/director names. Genres and actors are
/// comma-separated multi-valued; the director is single-valued. Pass 2:
/// one tag entity per unique name, linked movie by movie through the
/// association builders, then registered in the repository.
pub fn load_movies_and_tags(
    data_path: &Path,
    repo: &mut dyn CatalogRepository,
) -> AppResult<()> {
    let mut genres = TagAccumulator::default();
    let mut actors = TagAccumulator::default();
    let mut directors = TagAccumulator::default();

    let records = csv_records(&data_path.join("movies.csv"))?;
    let movie_count = records.len();

    for (i, record) in records.iter().enumerate() {
        let row = i + 2; // 1-based, after the header
        let movie_id: MovieId = parse_number(field(record, 0, row, "rank")?, row, "rank")?;

        for genre in field(record, 2, row, "genres")?.split(',') {
            genres.push(genre.trim(), movie_id);
        }
        for actor in field(record, 5, row, "actors")?.split(',') {
            actors.push(actor.trim(), movie_id);
        }
        directors.push(field(record, 4, row, "director")?.trim(), movie_id);

        let movie = Movie::new(
            movie_id,
            field(record, 1, row, "title")?,
            field(record, 3, row, "description")?,
            parse_number(field(record, 6, row, "year")?, row, "year")?,
            parse_number(field(record, 7, row, "runtime")?, row, "runtime")?,
            parse_number(field(record, 8, row, "rating")?, row, "rating")?,
            parse_number(field(record, 9, row, "votes")?, row, "votes")?,
            parse_optional_number(field(record, 10, row, "revenue")?, row, "revenue")?,
            parse_optional_number(field(record, 11, row, "metascore")?, row, "metascore")?,
        );
        validate_movie(&movie)?;
        repo.add_movie(movie)?;
    }

    for (name, movie_ids) in genres.iter() {
        let mut genre = Genre::new(name);
        for movie_id in movie_ids {
            let mut movie = fetch_movie(repo, *movie_id)?;
            make_genre_association(&mut movie, &mut genre)?;
        }
        repo.add_genre(genre)?;
    }

    for (name, movie_ids) in actors.iter() {
        let mut actor = Actor::new(name);
        for movie_id in movie_ids {
            let mut movie = fetch_movie(repo, *movie_id)?;
            make_actor_association(&mut movie, &mut actor)?;
        }
        repo.add_actor(actor)?;
    }

    for (name, movie_ids) in directors.iter() {
        let mut director = Director::new(name);
        for movie_id in movie_ids {
            let mut movie = fetch_movie(repo, *movie_id)?;
            make_director_association(&mut movie, &mut director)?;
        }
        repo.add_director(director)?;
    }

    info!("loaded {} movies", movie_count);
    Ok(())
}

fn fetch_movie(repo: &dyn CatalogRepository, movie_id: MovieId) -> AppResult<Movie> {
    repo.get_movie(movie_id)?
        .ok_or_else(|| AppError::Loader(format!("movie id {} not in repository", movie_id)))
}

/// Loads the user source. Plaintext passwords run through the one-way
/// transform before a User exists. Returns the users keyed by their source
/// row key, which the comment source references for authorship.
pub fn load_users(
    data_path: &Path,
    repo: &mut dyn CatalogRepository,
) -> AppResult<HashMap<String, User>> {
    let mut users = HashMap::new();

    let records = csv_records(&data_path.join("users.csv"))?;
    for (i, record) in records.iter().enumerate() {
        let row = i + 2;
        let row_key = field(record, 0, row, "row key")?.to_string();
        let username = field(record, 1, row, "username")?;
        let password = field(record, 2, row, "password")?;

        let user = User::new(username, hash_password(password));
        validate_user(&user)?;
        repo.add_user(user.clone())?;
        users.insert(row_key, user);
    }

    info!("loaded {} users", users.len());
    Ok(users)
}

/// Loads the comment source. Each row resolves its author through the user
/// lookup and its movie through the repository, then builds the review via
/// `make_review` so both bidirectional links exist before `add_review`.
pub fn load_comments(
    data_path: &Path,
    repo: &mut dyn CatalogRepository,
    users: &mut HashMap<String, User>,
) -> AppResult<()> {
    let records = csv_records(&data_path.join("comments.csv"))?;
    let comment_count = records.len();

    for (i, record) in records.iter().enumerate() {
        let row = i + 2;
        let user_key = field(record, 1, row, "user key")?;
        let movie_id: MovieId =
            parse_number(field(record, 2, row, "movie id")?, row, "movie id")?;
        let comment_text = field(record, 3, row, "comment")?;
        let timestamp = parse_timestamp(field(record, 4, row, "timestamp")?, row)?;

        let user = users
            .get_mut(user_key)
            .ok_or_else(|| AppError::Loader(format!("row {}: unknown user key {}", row, user_key)))?;
        let mut movie = fetch_movie(repo, movie_id)?;

        let review = make_review(comment_text, user, &mut movie, timestamp);
        repo.add_review(user, &movie, review)?;
    }

    info!("loaded {} comments", comment_count);
    Ok(())
}

/// Full bulk load: movies and tags, then users, then comments.
pub fn populate(data_path: &Path, repo: &mut dyn CatalogRepository) -> AppResult<()> {
    load_movies_and_tags(data_path, repo)?;
    let mut users = load_users(data_path, repo)?;
    load_comments(data_path, repo, &mut users)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_keeps_first_seen_order() {
        let mut acc = TagAccumulator::default();
        acc.push("Action", 1);
        acc.push("Adventure", 1);
        acc.push("Action", 3);

        let collected: Vec<(&str, Vec<MovieId>)> = acc
            .iter()
            .map(|(name, ids)| (name, ids.to_vec()))
            .collect();
        assert_eq!(
            collected,
            vec![("Action", vec![1, 3]), ("Adventure", vec![1])]
        );
    }

    #[test]
    fn test_hash_password_is_deterministic_and_opaque() {
        let a = hash_password("123456789");
        let b = hash_password("123456789");
        assert_eq!(a, b);
        assert_ne!(a, "123456789");
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_parse_timestamp_accepts_both_separators() {
        let t = parse_timestamp("2020-02-28T14:32:21", 2).unwrap();
        let space = parse_timestamp("2020-02-28 14:32:21", 2).unwrap();
        assert_eq!(t, space);
    }

    #[test]
    fn test_parse_optional_number_maps_na_to_none() {
        assert_eq!(parse_optional_number::<f64>("N/A", 2, "revenue").unwrap(), None);
        assert_eq!(
            parse_optional_number::<f64>("333.13", 2, "revenue").unwrap(),
            Some(333.13)
        );
        assert!(parse_optional_number::<f64>("junk", 2, "revenue").is_err());
    }
}
