//! Integration tests for seeding a PostgreSQL database.
//!
//! These tests verify end-to-end behaviour against a real schema:
//! - The full run produces the expected table counts
//! - A second run resets and repopulates to the same counts
//! - The `PopularBook` view returns ordered rows above the rating threshold
//! - Wiping leaves every table empty
//!
//! To run these tests, you need:
//! 1. A PostgreSQL database (migrations are applied by the test)
//! 2. DATABASE_URL environment variable set
//!
//! Run with: `DATABASE_URL=postgres://... cargo nextest run -p seed-data seed_postgres`
//!
//! Note: These tests delete every row in the bookshelf tables. Point them at a
//! scratch database.

use std::env;

use bookshelf::models::Table;
use seed_data::prelude::*;

/// Get a migrated database, skipping tests if DATABASE_URL is not set.
async fn get_test_db() -> Option<Database> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            return None;
        }
    };

    let db = match Database::connect(&database_url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            return None;
        }
    };

    if let Err(e) = db.migrate().await {
        eprintln!("Skipping test: Failed to migrate database: {e}");
        db.close().await;
        return None;
    }

    Some(db)
}

fn test_config(seed: u64) -> SeedConfig {
    SeedConfig {
        rng_seed: Some(seed),
        ..Default::default()
    }
}

// One test owns the database for its whole sequence so runs never interleave.
#[tokio::test]
async fn test_full_seed_against_postgres() {
    let Some(db) = get_test_db().await else {
        return;
    };
    let seeder = Seeder::new(db).with_config(test_config(2024));

    let first = seeder
        .run(&mut seeder.config().rng())
        .await
        .expect("first run");
    let counts = first.summary;
    assert_eq!(counts.authors, 8);
    assert_eq!(counts.books, 24);
    assert_eq!(counts.publishers, 5);
    assert!(counts.genres >= 1 && counts.genres <= 10);
    assert_eq!(counts.users, 15);
    assert!((72..=192).contains(&counts.reviews));

    // Every review points at a live book and user, so the join count matches
    let joined: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM reviews r
        JOIN books b ON b.id = r.book_id
        JOIN users u ON u.id = r.user_id
        WHERE r.rating BETWEEN 1 AND 5
        "#,
    )
    .fetch_one(seeder.store().pool())
    .await
    .expect("join count");
    assert_eq!(joined, counts.reviews);

    // No user reviews the same book twice
    let repeats: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM (
            SELECT book_id, user_id FROM reviews
            GROUP BY book_id, user_id HAVING COUNT(*) > 1
        ) dup
        "#,
    )
    .fetch_one(seeder.store().pool())
    .await
    .expect("repeat count");
    assert_eq!(repeats, 0);

    // Genre links per book stay within 1..=3
    let out_of_range: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM (
            SELECT b.id FROM books b
            LEFT JOIN book_genres bg ON bg.book_id = b.id
            GROUP BY b.id HAVING COUNT(bg.genre_id) NOT BETWEEN 1 AND 3
        ) bad
        "#,
    )
    .fetch_one(seeder.store().pool())
    .await
    .expect("genre link count");
    assert_eq!(out_of_range, 0);

    assert!(first.popular.len() <= 10);
    for pair in first.popular.windows(2) {
        assert!(pair[0].avg_rating >= pair[1].avg_rating);
    }
    assert!(first.popular.iter().all(|p| p.avg_rating > 4.0));

    let second = seeder
        .run(&mut seeder.config().rng())
        .await
        .expect("second run");
    assert_eq!(first.summary, second.summary);

    seeder.wipe().await.expect("wipe");
    for table in Table::WIPE_ORDER {
        assert_eq!(seeder.store().count(table).await.expect("count"), 0);
    }

    seeder.store().close().await;
}
