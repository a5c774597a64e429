// tests/end_to_end.rs
//
// Full bulk load of the 5-movie fixture into each store, then the same
// observations through the repository contract. Whatever backs the
// repository, the loaded graph must look identical.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use moviehub::db::{create_connection_pool, initialize_database};
use moviehub::loader::{hash_password, populate};
use moviehub::services;
use moviehub::{CatalogRepository, Genre, MemoryCatalogRepository, SqliteCatalogRepository};

fn data_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

fn memory_repo() -> MemoryCatalogRepository {
    let mut repo = MemoryCatalogRepository::new();
    populate(&data_path(), &mut repo).unwrap();
    repo
}

fn sqlite_repo(dir: &tempfile::TempDir) -> SqliteCatalogRepository {
    let pool = create_connection_pool(&dir.path().join("catalog.db")).unwrap();
    initialize_database(&pool.get().unwrap()).unwrap();
    let mut repo = SqliteCatalogRepository::new(Arc::new(pool));
    populate(&data_path(), &mut repo).unwrap();
    repo
}

fn assert_catalog_shape(repo: &dyn CatalogRepository) {
    assert_eq!(repo.number_of_movies().unwrap(), 5);

    // The Action movies are ranks 1 and 4, in association-insertion order.
    let action_ids = repo.movie_ids_for_genre("Action").unwrap();
    assert_eq!(action_ids, vec![1, 4]);

    let movie = repo.get_movie(1).unwrap().unwrap();
    assert!(movie.is_genre_by(&Genre::new("Action")));
    assert!(movie.is_genre_by(&Genre::new("Adventure")));
    assert_eq!(movie.title(), "Guardians of the Galaxy");

    // Tag name matches are exact and case-sensitive; unknown names are
    // empty, never errors.
    assert!(repo.movie_ids_for_genre("action").unwrap().is_empty());
    assert!(repo.movie_ids_for_genre("Motoring").unwrap().is_empty());

    assert_eq!(repo.movie_ids_for_director("James Gunn").unwrap(), vec![1]);
    assert_eq!(repo.movie_ids_for_actor("Chris Pratt").unwrap(), vec![1]);
    assert!(repo.movie_ids_for_actor("Emma Stone").unwrap().is_empty());

    // "N/A" columns load as absent, not zero.
    let mindhorn = repo.get_movie(5).unwrap().unwrap();
    assert_eq!(mindhorn.revenue_millions(), None);
    assert_eq!(mindhorn.metascore(), Some(71));

    // Users arrive with the one-way transform applied.
    let user = repo.get_user("fmercury").unwrap().unwrap();
    assert_eq!(user.password_hash(), hash_password("mvNNbc1eLA$i"));
    assert!(repo.get_user("prince").unwrap().is_none());

    // Three fixture comments: two on Guardians, one on Split.
    assert_eq!(repo.reviews().unwrap().len(), 3);
    assert_eq!(movie.number_of_comments(), 2);
    assert_eq!(
        repo.get_movie(3).unwrap().unwrap().number_of_comments(),
        1
    );

    // Review links land on both sides.
    let fmercury = repo.get_user("fmercury").unwrap().unwrap();
    assert_eq!(fmercury.number_of_reviews(), 1);
    assert!(fmercury.reviews().all(|r| r.movie_id() == 1));

    // Absent ids drop out of id-list resolution; present ids keep the
    // caller's order.
    let movies = repo.get_movies_by_id(&[4, 99, 2]).unwrap();
    assert_eq!(
        movies.iter().map(|m| m.id()).collect::<Vec<_>>(),
        vec![4, 2]
    );

    // Tag registries preserve first-seen order from the source scan.
    let genres = repo.genres().unwrap();
    assert_eq!(genres[0].name(), "Action");
    assert_eq!(genres[1].name(), "Adventure");
    assert_eq!(repo.directors().unwrap().len(), 5);
}

#[test]
fn test_populate_memory_store() {
    let repo = memory_repo();
    assert_catalog_shape(&repo);

    // The in-memory store orders movie ids by year; rank 1 (2014) is the
    // only pre-2016 movie, so it leads.
    assert_eq!(repo.movie_ids_all().unwrap()[0], 1);
}

#[test]
fn test_populate_sqlite_store() {
    let dir = tempfile::tempdir().unwrap();
    let repo = sqlite_repo(&dir);
    assert_catalog_shape(&repo);
}

#[test]
fn test_stores_agree_movie_by_movie() {
    let dir = tempfile::tempdir().unwrap();
    let memory = memory_repo();
    let sqlite = sqlite_repo(&dir);

    for id in memory.movie_ids_all().unwrap() {
        let from_memory = memory.get_movie(id).unwrap().unwrap();
        let from_sqlite = sqlite.get_movie(id).unwrap().unwrap();

        // scalar equality plus identical edges
        assert_eq!(from_memory, from_sqlite);
        assert_eq!(
            from_memory.genres().collect::<Vec<_>>(),
            from_sqlite.genres().collect::<Vec<_>>()
        );
        assert_eq!(
            from_memory.actors().collect::<Vec<_>>(),
            from_sqlite.actors().collect::<Vec<_>>()
        );
        assert_eq!(
            from_memory.directors().collect::<Vec<_>>(),
            from_sqlite.directors().collect::<Vec<_>>()
        );
        assert_eq!(from_memory.number_of_comments(), from_sqlite.number_of_comments());
    }
}

#[test]
fn test_comment_posting_after_load() {
    let mut repo = memory_repo();

    services::add_comment(&mut repo, 2, "Toe-tapping fun", "mjackson", chrono::Utc::now())
        .unwrap();

    assert_eq!(repo.reviews().unwrap().len(), 4);
    let sing = services::get_movie(&repo, 2).unwrap();
    assert_eq!(sing.comments.len(), 1);
    assert_eq!(sing.comments[0].username, "mjackson");

    // Pagination over the year-ordered id listing.
    let ids = services::movie_ids_all(&repo).unwrap();
    let page = services::paginate(&ids, 0, 3);
    assert_eq!(page.ids.len(), 3);
    assert_eq!(page.next_cursor, Some(3));
}
