// src/repositories/sqlite_catalog_repository.rs
//
// SQLite-backed implementation of the repository contract. Entities map to
// rows; the movie/tag many-to-many edges live in id-keyed junction tables
// queried with explicit SQL (no mapped type models the junction rows).
//
// Every mutating call is one unit of work: a transaction on a pooled
// connection, committed explicitly on success. A transaction dropped
// before commit rolls back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::db::{get_connection, ConnectionPool};
use crate::domain::{Actor, Director, Genre, Movie, MovieId, Review, User};
use crate::error::{AppError, AppResult};
use crate::repositories::catalog_repository::{ensure_review_links, CatalogRepository};

pub struct SqliteCatalogRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCatalogRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map a movies row to a Movie - returns rusqlite::Error for query_map
    /// compatibility. Association collections are hydrated separately.
    fn row_to_movie(row: &Row) -> Result<Movie, rusqlite::Error> {
        let id: i64 = row.get("id")?;
        let title: String = row.get("title")?;
        let description: String = row.get("description")?;
        let year: i32 = row.get("year")?;
        let runtime_minutes: i64 = row.get("runtime_minutes")?;
        let rating: f64 = row.get("rating")?;
        let votes: i64 = row.get("votes")?;
        let revenue_millions: Option<f64> = row.get("revenue_millions")?;
        let metascore: Option<i64> = row.get("metascore")?;

        Ok(Movie::new(
            id as MovieId,
            title,
            description,
            year,
            runtime_minutes as u32,
            rating,
            votes as u32,
            revenue_millions,
            metascore.map(|v| v as u32),
        ))
    }

    fn row_to_review(row: &Row) -> Result<Review, rusqlite::Error> {
        let username: String = row.get("username")?;
        let movie_id: i64 = row.get("movie_id")?;
        let comment: String = row.get("comment")?;

        let timestamp_str: String = row.get("timestamp")?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Review::new(username, movie_id as MovieId, comment, timestamp))
    }

    /// Attach genre/actor/director names and comments to a fetched movie.
    /// Edges come straight from the junction and review tables, in
    /// association-insertion order.
    fn hydrate_movie(conn: &Connection, mut movie: Movie) -> AppResult<Movie> {
        let mut stmt = conn.prepare(
            "SELECT g.name FROM genres g
             JOIN movies_genres mg ON mg.genre_id = g.id
             WHERE mg.movie_id = ?1
             ORDER BY mg.id",
        )?;
        let names = stmt
            .query_map(params![movie.id() as i64], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        for name in names {
            movie.add_genre(name);
        }

        let mut stmt = conn.prepare(
            "SELECT a.name FROM actors a
             JOIN movies_actors ma ON ma.actor_id = a.id
             WHERE ma.movie_id = ?1
             ORDER BY ma.id",
        )?;
        let names = stmt
            .query_map(params![movie.id() as i64], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        for name in names {
            movie.add_actor(name);
        }

        let mut stmt = conn.prepare(
            "SELECT d.name FROM directors d
             JOIN movies_directors md ON md.director_id = d.id
             WHERE md.movie_id = ?1
             ORDER BY md.id",
        )?;
        let names = stmt
            .query_map(params![movie.id() as i64], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        for name in names {
            movie.add_director(name);
        }

        let mut stmt = conn.prepare(
            "SELECT u.username AS username, r.movie_id AS movie_id,
                    r.comment AS comment, r.timestamp AS timestamp
             FROM reviews r
             JOIN users u ON r.user_id = u.id
             WHERE r.movie_id = ?1
             ORDER BY r.id",
        )?;
        let comments = stmt
            .query_map(params![movie.id() as i64], Self::row_to_review)?
            .collect::<Result<Vec<_>, _>>()?;
        for comment in comments {
            movie.add_comment(comment);
        }

        Ok(movie)
    }

    /// Register one tag row plus its junction edges inside a transaction.
    fn insert_tag_with_edges(
        tx: &Transaction,
        tag_table: &str,
        junction_table: &str,
        junction_column: &str,
        name: &str,
        movie_ids: impl Iterator<Item = MovieId>,
    ) -> AppResult<()> {
        tx.execute(
            &format!("INSERT INTO {} (name) VALUES (?1)", tag_table),
            params![name],
        )?;
        let tag_id = tx.last_insert_rowid();

        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {} ({}, movie_id) VALUES (?1, ?2)",
            junction_table, junction_column
        ))?;
        for movie_id in movie_ids {
            stmt.execute(params![tag_id, movie_id as i64])?;
        }

        Ok(())
    }

    /// Tag-name lookup, then junction scan by tag id: the two-step query
    /// shape every `movie_ids_for_*` shares.
    fn movie_ids_for_tag(
        &self,
        tag_table: &str,
        junction_table: &str,
        junction_column: &str,
        name: &str,
    ) -> AppResult<Vec<MovieId>> {
        let conn = get_connection(&self.pool)?;

        let tag_id: Option<i64> = conn
            .query_row(
                &format!("SELECT id FROM {} WHERE name = ?1", tag_table),
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        let Some(tag_id) = tag_id else {
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(&format!(
            "SELECT movie_id FROM {} WHERE {} = ?1 ORDER BY movie_id ASC",
            junction_table, junction_column
        ))?;
        let ids = stmt
            .query_map(params![tag_id], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids.into_iter().map(|id| id as MovieId).collect())
    }

    /// Fetch every tag of one type with its junction edges, in insertion
    /// order.
    fn tags_with_edges(
        &self,
        tag_table: &str,
        junction_table: &str,
        junction_column: &str,
    ) -> AppResult<Vec<(String, Vec<MovieId>)>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare(&format!("SELECT id, name FROM {} ORDER BY id", tag_table))?;
        let tags = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT movie_id FROM {} WHERE {} = ?1 ORDER BY id",
            junction_table, junction_column
        ))?;

        let mut result = Vec::with_capacity(tags.len());
        for (tag_id, name) in tags {
            let ids = stmt
                .query_map(params![tag_id], |row| row.get::<_, i64>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            result.push((name, ids.into_iter().map(|id| id as MovieId).collect()));
        }

        Ok(result)
    }
}

impl CatalogRepository for SqliteCatalogRepository {
    fn add_user(&mut self, user: User) -> AppResult<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![user.username(), user.password_hash()],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn get_user(&self, username: &str) -> AppResult<Option<User>> {
        let conn = get_connection(&self.pool)?;

        let row = conn
            .query_row(
                "SELECT username, password FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                },
            )
            .optional()?;

        let Some((username, password)) = row else {
            return Ok(None);
        };

        let mut user = User::new(username, password);

        let mut stmt = conn.prepare(
            "SELECT u.username AS username, r.movie_id AS movie_id,
                    r.comment AS comment, r.timestamp AS timestamp
             FROM reviews r
             JOIN users u ON r.user_id = u.id
             WHERE u.username = ?1
             ORDER BY r.id",
        )?;
        let reviews = stmt
            .query_map(params![user.username()], Self::row_to_review)?
            .collect::<Result<Vec<_>, _>>()?;
        for review in reviews {
            user.add_review(review);
        }

        Ok(Some(user))
    }

    fn add_movie(&mut self, movie: Movie) -> AppResult<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        let already_stored: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM movies WHERE id = ?1)",
            params![movie.id() as i64],
            |row| row.get(0),
        )?;
        if already_stored {
            return Err(AppError::DuplicateMovie(movie.id()));
        }

        tx.execute(
            "INSERT INTO movies (
                id, title, description, year, runtime_minutes,
                rating, votes, revenue_millions, metascore
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                movie.id() as i64,
                movie.title(),
                movie.description(),
                movie.year(),
                movie.runtime_minutes() as i64,
                movie.rating(),
                movie.votes() as i64,
                movie.revenue_millions(),
                movie.metascore().map(|v| v as i64),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn get_movie(&self, id: MovieId) -> AppResult<Option<Movie>> {
        let conn = get_connection(&self.pool)?;

        let movie = conn
            .query_row(
                "SELECT id, title, description, year, runtime_minutes,
                        rating, votes, revenue_millions, metascore
                 FROM movies WHERE id = ?1",
                params![id as i64],
                Self::row_to_movie,
            )
            .optional()?;

        match movie {
            Some(movie) => Ok(Some(Self::hydrate_movie(&conn, movie)?)),
            None => Ok(None),
        }
    }

    fn number_of_movies(&self) -> AppResult<usize> {
        let conn = get_connection(&self.pool)?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn get_movies_by_id(&self, ids: &[MovieId]) -> AppResult<Vec<Movie>> {
        // Point lookups keep the caller's order; absent ids drop out.
        let mut movies = Vec::new();
        for id in ids {
            if let Some(movie) = self.get_movie(*id)? {
                movies.push(movie);
            }
        }
        Ok(movies)
    }

    fn movie_ids_all(&self) -> AppResult<Vec<MovieId>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare("SELECT id FROM movies ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids.into_iter().map(|id| id as MovieId).collect())
    }

    fn movie_ids_for_genre(&self, genre_name: &str) -> AppResult<Vec<MovieId>> {
        self.movie_ids_for_tag("genres", "movies_genres", "genre_id", genre_name)
    }

    fn movie_ids_for_actor(&self, actor_name: &str) -> AppResult<Vec<MovieId>> {
        self.movie_ids_for_tag("actors", "movies_actors", "actor_id", actor_name)
    }

    fn movie_ids_for_director(&self, director_name: &str) -> AppResult<Vec<MovieId>> {
        self.movie_ids_for_tag("directors", "movies_directors", "director_id", director_name)
    }

    fn add_genre(&mut self, genre: Genre) -> AppResult<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;
        Self::insert_tag_with_edges(
            &tx,
            "genres",
            "movies_genres",
            "genre_id",
            genre.name(),
            genre.movies(),
        )?;
        tx.commit()?;
        Ok(())
    }

    fn genres(&self) -> AppResult<Vec<Genre>> {
        let tags = self.tags_with_edges("genres", "movies_genres", "genre_id")?;
        Ok(tags
            .into_iter()
            .map(|(name, ids)| {
                let mut genre = Genre::new(name);
                for id in ids {
                    genre.add_movie(id);
                }
                genre
            })
            .collect())
    }

    fn add_actor(&mut self, actor: Actor) -> AppResult<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;
        Self::insert_tag_with_edges(
            &tx,
            "actors",
            "movies_actors",
            "actor_id",
            actor.name(),
            actor.movies(),
        )?;
        tx.commit()?;
        Ok(())
    }

    fn actors(&self) -> AppResult<Vec<Actor>> {
        let tags = self.tags_with_edges("actors", "movies_actors", "actor_id")?;
        Ok(tags
            .into_iter()
            .map(|(name, ids)| {
                let mut actor = Actor::new(name);
                for id in ids {
                    actor.add_movie(id);
                }
                actor
            })
            .collect())
    }

    fn add_director(&mut self, director: Director) -> AppResult<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;
        Self::insert_tag_with_edges(
            &tx,
            "directors",
            "movies_directors",
            "director_id",
            director.name(),
            director.movies(),
        )?;
        tx.commit()?;
        Ok(())
    }

    fn directors(&self) -> AppResult<Vec<Director>> {
        let tags = self.tags_with_edges("directors", "movies_directors", "director_id")?;
        Ok(tags
            .into_iter()
            .map(|(name, ids)| {
                let mut director = Director::new(name);
                for id in ids {
                    director.add_movie(id);
                }
                director
            })
            .collect())
    }

    fn add_review(&mut self, user: &User, movie: &Movie, review: Review) -> AppResult<()> {
        ensure_review_links(user, movie, &review)?;

        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        let user_id: Option<i64> = tx
            .query_row(
                "SELECT id FROM users WHERE username = ?1",
                params![review.username()],
                |row| row.get(0),
            )
            .optional()?;
        let user_id = user_id.ok_or_else(|| {
            AppError::Consistency(format!("Review author {} is not stored", review.username()))
        })?;

        let movie_stored: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM movies WHERE id = ?1)",
            params![review.movie_id() as i64],
            |row| row.get(0),
        )?;
        if !movie_stored {
            return Err(AppError::Consistency(format!(
                "Reviewed movie {} is not stored",
                review.movie_id()
            )));
        }

        tx.execute(
            "INSERT INTO reviews (user_id, movie_id, comment, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                review.movie_id() as i64,
                review.comment(),
                review.timestamp().to_rfc3339(),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn reviews(&self) -> AppResult<Vec<Review>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare(
            "SELECT u.username AS username, r.movie_id AS movie_id,
                    r.comment AS comment, r.timestamp AS timestamp
             FROM reviews r
             JOIN users u ON r.user_id = u.id
             ORDER BY r.id",
        )?;
        let reviews = stmt
            .query_map([], Self::row_to_review)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool, initialize_database};
    use crate::domain::{make_genre_association, make_review};
    use chrono::Utc;

    fn repo() -> (SqliteCatalogRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool(&dir.path().join("catalog.db")).unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        (SqliteCatalogRepository::new(Arc::new(pool)), dir)
    }

    fn movie(id: MovieId, title: &str, year: i32) -> Movie {
        Movie::new(id, title, "desc", year, 100, 7.0, 1000, Some(12.5), None)
    }

    #[test]
    fn test_movie_round_trip_preserves_scalars() {
        let (mut repo, _dir) = repo();
        let original = Movie::new(
            1,
            "Guardians of the Galaxy",
            "A group of intergalactic criminals are forced to work together.",
            2014,
            121,
            8.1,
            757074,
            Some(333.13),
            Some(76),
        );

        repo.add_movie(original.clone()).unwrap();
        let fetched = repo.get_movie(1).unwrap().unwrap();

        // equality covers every scalar field, id is not part of it
        assert_eq!(fetched, original);
        assert_eq!(fetched.metascore(), Some(76));
        assert_eq!(fetched.revenue_millions(), Some(333.13));
    }

    #[test]
    fn test_missing_rows_map_to_none() {
        let (repo, _dir) = repo();
        assert!(repo.get_movie(101).unwrap().is_none());
        assert!(repo.get_user("prince").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_movie_id_is_an_error() {
        let (mut repo, _dir) = repo();
        repo.add_movie(movie(1, "Original", 2014)).unwrap();

        let err = repo.add_movie(movie(1, "Impostor", 2020)).unwrap_err();
        assert!(matches!(err, AppError::DuplicateMovie(1)));
        assert_eq!(repo.number_of_movies().unwrap(), 1);
    }

    #[test]
    fn test_genre_edges_round_trip() {
        let (mut repo, _dir) = repo();
        repo.add_movie(movie(1, "Guardians of the Galaxy", 2014)).unwrap();
        repo.add_movie(movie(2, "Prometheus", 2012)).unwrap();

        let mut genre = Genre::new("Action");
        for id in [1, 2] {
            let mut m = repo.get_movie(id).unwrap().unwrap();
            make_genre_association(&mut m, &mut genre).unwrap();
        }
        repo.add_genre(genre.clone()).unwrap();

        assert_eq!(repo.movie_ids_for_genre("Action").unwrap(), vec![1, 2]);
        assert!(repo.movie_ids_for_genre("Motoring").unwrap().is_empty());

        let fetched = repo.get_movie(1).unwrap().unwrap();
        assert!(fetched.is_genre_by(&genre));

        let genres = repo.genres().unwrap();
        assert_eq!(genres.len(), 1);
        assert_eq!(genres[0].movies().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_add_review_requires_both_links() {
        let (mut repo, _dir) = repo();
        repo.add_movie(movie(2, "Prometheus", 2012)).unwrap();
        repo.add_user(User::new("thorke", "hash")).unwrap();

        let user = repo.get_user("thorke").unwrap().unwrap();
        let m = repo.get_movie(2).unwrap().unwrap();

        let review = Review::new("thorke", 2, "Nice.", Utc::now());
        let err = repo.add_review(&user, &m, review).unwrap_err();
        assert!(matches!(err, AppError::Consistency(_)));
        assert!(repo.reviews().unwrap().is_empty());
    }

    #[test]
    fn test_review_round_trip() {
        let (mut repo, _dir) = repo();
        repo.add_movie(movie(2, "Prometheus", 2012)).unwrap();
        repo.add_user(User::new("thorke", "hash")).unwrap();

        let mut user = repo.get_user("thorke").unwrap().unwrap();
        let mut m = repo.get_movie(2).unwrap().unwrap();
        let review = make_review("nice nice nice", &mut user, &mut m, Utc::now());

        repo.add_review(&user, &m, review.clone()).unwrap();

        assert_eq!(repo.reviews().unwrap(), vec![review.clone()]);
        let fetched = repo.get_movie(2).unwrap().unwrap();
        assert!(fetched.comments().any(|r| r == &review));
        let fetched_user = repo.get_user("thorke").unwrap().unwrap();
        assert!(fetched_user.reviews().any(|r| r == &review));
    }
}
