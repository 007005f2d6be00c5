//! Database seeding utilities.

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use bookshelf::models::{AuthorWithBooks, Book, NewBook, NewReview, PopularBook, Review, Table};
use bookshelf::{Store, StoreError};

use crate::config::SeedConfig;
use crate::generators::{
    CatalogGenerator, PersonGenerator, RatingProfile, ReviewGenerator, sample_unique,
};
use crate::report::{SeedReport, TableCounts};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("No rows in {0} to draw from")]
    EmptyTable(Table),
}

/// Seeds the bookshelf schema through a [`Store`].
pub struct Seeder<S> {
    store: S,
    config: SeedConfig,
    people: PersonGenerator,
    catalog: CatalogGenerator,
    reviews: ReviewGenerator,
}

impl<S: Store> Seeder<S> {
    /// Creates a new seeder with the default configuration.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: SeedConfig::default(),
            people: PersonGenerator::new(),
            catalog: CatalogGenerator::new(),
            reviews: ReviewGenerator::new(),
        }
    }

    /// Sets the seeding configuration.
    pub fn with_config(mut self, config: SeedConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Returns a reference to the store for advanced usage.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates one author with one nested book in a single composite write.
    ///
    /// Nothing is deleted first. The book's publisher is created in the same
    /// write because every book needs one.
    pub async fn seed_minimal(&self, rng: &mut impl Rng) -> Result<AuthorWithBooks, SeedError> {
        let author = self.people.generate(rng);
        let title = self.catalog.book_title(rng);
        let publisher = self.catalog.publisher_name(rng);

        let created = self
            .store
            .create_author_with_book(&author, &title, &publisher)
            .await?;

        info!(
            "Created author {} ({}) with book \"{}\"",
            created.author.id, created.author.name, title
        );
        Ok(created)
    }

    /// Runs the full sequence: wipe, populate in dependency order, then read
    /// back the table counts and the popular-book report.
    ///
    /// The first failing store call aborts the run. Rows written before it stay.
    pub async fn run(&self, rng: &mut impl Rng) -> Result<SeedReport, SeedError> {
        self.config.validate()?;

        self.wipe().await?;
        self.seed_publishers(rng).await?;
        self.seed_genres(rng).await?;
        self.seed_authors(rng).await?;
        let books = self.seed_books(rng).await?;
        self.seed_users(rng).await?;
        self.seed_reviews(&books, rng).await?;

        let summary = self.summary().await?;
        let popular = self.popular_books().await?;

        Ok(SeedReport { summary, popular })
    }

    /// Deletes every seeded row.
    ///
    /// **WARNING**: This deletes all data from the tables. Use with caution.
    pub async fn wipe(&self) -> Result<(), SeedError> {
        info!("Clearing all seeded data...");

        // Order matters due to foreign key constraints
        for table in Table::WIPE_ORDER {
            let removed = self.store.delete_all(table).await?;
            debug!("Deleted {} rows from {}", removed, table);
        }

        info!("All data cleared");
        Ok(())
    }

    /// Seeds publishers with company-style names.
    pub async fn seed_publishers(&self, rng: &mut impl Rng) -> Result<u64, SeedError> {
        let names = self
            .catalog
            .publisher_names(self.config.publisher_count, rng);
        info!("Seeding {} publishers...", names.len());

        let inserted = self.store.create_publishers(&names).await?;

        info!("Seeded {} publishers", inserted);
        Ok(inserted)
    }

    /// Seeds genres, skipping names drawn more than once.
    pub async fn seed_genres(&self, rng: &mut impl Rng) -> Result<u64, SeedError> {
        let names = self.catalog.genre_names(self.config.genre_count, rng);
        info!("Seeding {} genres...", names.len());

        let inserted = self.store.create_genres(&names, true).await?;

        info!(
            "Seeded {} genres ({} duplicates skipped)",
            inserted,
            names.len() as u64 - inserted
        );
        Ok(inserted)
    }

    /// Seeds authors, skipping duplicate emails.
    pub async fn seed_authors(&self, rng: &mut impl Rng) -> Result<u64, SeedError> {
        let authors = self.people.generate_batch(self.config.author_count, rng);
        info!("Seeding {} authors...", authors.len());

        let inserted = self.store.create_authors(&authors, true).await?;

        info!("Seeded {} authors", inserted);
        Ok(inserted)
    }

    /// Seeds `books_per_author` books for every stored author.
    ///
    /// Each book gets a uniformly chosen publisher and a distinct random set of
    /// genres. Returns the books in creation order.
    pub async fn seed_books(&self, rng: &mut impl Rng) -> Result<Vec<Book>, SeedError> {
        self.config.validate()?;

        let authors = self.store.find_authors().await?;
        let publishers = self.store.find_publishers().await?;
        let genres = self.store.find_genres().await?;

        if publishers.is_empty() && !authors.is_empty() {
            return Err(SeedError::EmptyTable(Table::Publisher));
        }
        if genres.is_empty() && self.config.genres_per_book.0 > 0 && !authors.is_empty() {
            return Err(SeedError::EmptyTable(Table::Genre));
        }

        let genre_ids: Vec<i32> = genres.iter().map(|g| g.id).collect();
        let expected = authors.len() * self.config.books_per_author;
        info!("Seeding {} books for {} authors...", expected, authors.len());

        let mut books = Vec::with_capacity(expected);
        for author in &authors {
            for _ in 0..self.config.books_per_author {
                let publisher = &publishers[rng.gen_range(0..publishers.len())];
                let genre_count = rng.gen_range(self.config.genres_per_book_range());

                let book = NewBook {
                    title: self.catalog.book_title(rng),
                    author_id: author.id,
                    publisher_id: publisher.id,
                    genre_ids: sample_unique(&genre_ids, genre_count, rng),
                };

                let created = self.store.create_book(&book).await?;
                debug!(
                    "Created book {} \"{}\" for author {}",
                    created.id, created.title, author.id
                );
                books.push(created);
            }
        }

        info!("Seeded {} books", books.len());
        Ok(books)
    }

    /// Seeds users, skipping duplicate emails.
    pub async fn seed_users(&self, rng: &mut impl Rng) -> Result<u64, SeedError> {
        let users = self.people.generate_batch(self.config.user_count, rng);
        info!("Seeding {} users...", users.len());

        let inserted = self.store.create_users(&users, true).await?;

        info!("Seeded {} users", inserted);
        Ok(inserted)
    }

    /// Seeds reviews for `books`, one write per review.
    ///
    /// Every `bias_every`-th book (starting with the first) draws its ratings
    /// from the high-bias profile. Each book is reviewed by a distinct random
    /// set of users.
    pub async fn seed_reviews(
        &self,
        books: &[Book],
        rng: &mut impl Rng,
    ) -> Result<Vec<Review>, SeedError> {
        self.config.validate()?;

        let users = self.store.find_users().await?;
        if users.is_empty() && self.config.reviewers_per_book.0 > 0 && !books.is_empty() {
            return Err(SeedError::EmptyTable(Table::User));
        }

        let user_ids: Vec<i32> = users.iter().map(|u| u.id).collect();
        info!("Seeding reviews for {} books...", books.len());

        let mut reviews = Vec::new();
        for (index, book) in books.iter().enumerate() {
            let profile = RatingProfile::for_index(index, self.config.bias_every);
            let reviewer_count = rng.gen_range(self.config.reviewers_per_book_range());
            let reviewers = sample_unique(&user_ids, reviewer_count, rng);

            for user_id in reviewers {
                let review = NewReview {
                    book_id: book.id,
                    user_id,
                    rating: self.reviews.rating(profile, rng),
                    comment: self.reviews.comment(rng),
                };
                reviews.push(self.store.create_review(&review).await?);
            }

            debug!("Reviewed book {} ({:?} ratings)", book.id, profile);
        }

        info!("Seeded {} reviews", reviews.len());
        Ok(reviews)
    }

    /// Counts the rows of every table.
    pub async fn summary(&self) -> Result<TableCounts, SeedError> {
        Ok(TableCounts {
            authors: self.store.count(Table::Author).await?,
            books: self.store.count(Table::Book).await?,
            publishers: self.store.count(Table::Publisher).await?,
            genres: self.store.count(Table::Genre).await?,
            users: self.store.count(Table::User).await?,
            reviews: self.store.count(Table::Review).await?,
        })
    }

    /// Reads the top rows of the `PopularBook` view.
    pub async fn popular_books(&self) -> Result<Vec<PopularBook>, SeedError> {
        Ok(self.store.popular_books(self.config.report_limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use bookshelf::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn seeded_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[tokio::test]
    async fn test_run_default_counts() {
        let seeder = Seeder::new(MemoryStore::new());
        let report = seeder.run(&mut seeded_rng(42)).await.unwrap();
        let counts = report.summary;

        assert_eq!(counts.authors, 8);
        assert_eq!(counts.books, 24);
        assert_eq!(counts.publishers, 5);
        assert!(counts.genres >= 1 && counts.genres <= 10);
        assert_eq!(counts.users, 15);
        assert!(
            (72..=192).contains(&counts.reviews),
            "review count {}",
            counts.reviews
        );
        assert!(report.popular.len() <= 10);
    }

    #[tokio::test]
    async fn test_books_per_author() {
        let config = SeedConfig {
            author_count: 4,
            books_per_author: 5,
            ..Default::default()
        };
        let seeder = Seeder::new(MemoryStore::new()).with_config(config);
        seeder.run(&mut seeded_rng(1)).await.unwrap();

        let books = seeder.store().books();
        assert_eq!(books.len(), 20);

        let mut per_author: HashMap<i32, usize> = HashMap::new();
        for book in &books {
            *per_author.entry(book.author_id).or_default() += 1;
        }
        assert_eq!(per_author.len(), 4);
        assert!(per_author.values().all(|&n| n == 5));
    }

    #[tokio::test]
    async fn test_book_genres_distinct_and_bounded() {
        let seeder = Seeder::new(MemoryStore::new());
        seeder.run(&mut seeded_rng(7)).await.unwrap();

        for book in seeder.store().books() {
            assert!(
                (1..=3).contains(&book.genre_ids.len()),
                "book {} has {} genres",
                book.id,
                book.genre_ids.len()
            );
            let distinct: HashSet<_> = book.genre_ids.iter().collect();
            assert_eq!(distinct.len(), book.genre_ids.len());
        }
    }

    #[tokio::test]
    async fn test_reviewers_distinct_per_book() {
        let seeder = Seeder::new(MemoryStore::new());
        seeder.run(&mut seeded_rng(9)).await.unwrap();

        let books: HashSet<i32> = seeder.store().books().iter().map(|b| b.id).collect();
        let users: HashSet<i32> = seeder
            .store()
            .find_users()
            .await
            .unwrap()
            .iter()
            .map(|u| u.id)
            .collect();
        let mut reviewers: HashMap<i32, Vec<i32>> = HashMap::new();
        for review in seeder.store().reviews() {
            assert!(books.contains(&review.book_id));
            assert!(users.contains(&review.user_id), "unknown user {}", review.user_id);
            assert!((1..=5).contains(&review.rating));
            assert!(!review.comment.is_empty());
            reviewers
                .entry(review.book_id)
                .or_default()
                .push(review.user_id);
        }

        assert_eq!(reviewers.len(), books.len());
        for (book_id, users) in reviewers {
            assert!(
                (3..=8).contains(&users.len()),
                "book {book_id} has {} reviews",
                users.len()
            );
            let distinct: HashSet<_> = users.iter().collect();
            assert_eq!(distinct.len(), users.len(), "repeat reviewer on {book_id}");
        }
    }

    #[tokio::test]
    async fn test_biased_books_never_rated_low() {
        let seeder = Seeder::new(MemoryStore::new());

        for seed in 0..5 {
            seeder.run(&mut seeded_rng(seed)).await.unwrap();
            let books = seeder.store().books();

            for (index, book) in books.iter().enumerate() {
                if index % 3 != 0 {
                    continue;
                }
                for review in seeder.store().reviews() {
                    if review.book_id == book.id {
                        assert!(review.rating >= 3, "biased book {} got {}", book.id, review.rating);
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn test_wipe_clears_every_table() {
        let seeder = Seeder::new(MemoryStore::new());
        seeder.run(&mut seeded_rng(3)).await.unwrap();

        seeder.wipe().await.unwrap();
        let counts = seeder.summary().await.unwrap();
        assert_eq!(counts, TableCounts::default());

        // Wiping an empty store is fine too
        seeder.wipe().await.unwrap();
    }

    #[tokio::test]
    async fn test_rerun_resets_counts() {
        let seeder = Seeder::new(MemoryStore::new());
        let first = seeder.run(&mut seeded_rng(21)).await.unwrap();
        let second = seeder.run(&mut seeded_rng(21)).await.unwrap();

        assert_eq!(first.summary, second.summary);
        assert_eq!(seeder.store().books().len(), 24);
    }

    #[tokio::test]
    async fn test_minimal_creates_nested_book() {
        let seeder = Seeder::new(MemoryStore::new());
        let created = seeder.seed_minimal(&mut seeded_rng(4)).await.unwrap();

        assert_eq!(created.books.len(), 1);
        assert_eq!(created.books[0].author_id, created.author.id);
        assert!(created.author.email.contains('@'));

        let counts = seeder.summary().await.unwrap();
        assert_eq!(counts.authors, 1);
        assert_eq!(counts.books, 1);
        assert_eq!(counts.reviews, 0);
    }

    #[tokio::test]
    async fn test_books_need_publishers() {
        let seeder = Seeder::new(MemoryStore::new());
        seeder.seed_authors(&mut seeded_rng(5)).await.unwrap();

        let err = seeder.seed_books(&mut seeded_rng(5)).await.unwrap_err();
        assert!(matches!(err, SeedError::EmptyTable(Table::Publisher)));
    }

    #[tokio::test]
    async fn test_invalid_config_aborts_before_writes() {
        let config = SeedConfig {
            genres_per_book: (3, 1),
            ..Default::default()
        };
        let seeder = Seeder::new(MemoryStore::new()).with_config(config);
        seeder.seed_minimal(&mut seeded_rng(6)).await.unwrap();

        let err = seeder.run(&mut seeded_rng(6)).await.unwrap_err();
        assert!(matches!(err, SeedError::Config(_)));
        // The pre-existing row survived because the wipe never ran
        assert_eq!(seeder.summary().await.unwrap().authors, 1);
    }

    #[tokio::test]
    async fn test_step_methods_reject_invalid_config() {
        let config = SeedConfig {
            genres_per_book: (3, 1),
            ..Default::default()
        };
        let seeder = Seeder::new(MemoryStore::new()).with_config(config);
        let mut rng = seeded_rng(8);

        seeder.seed_publishers(&mut rng).await.unwrap();
        seeder.seed_genres(&mut rng).await.unwrap();
        seeder.seed_authors(&mut rng).await.unwrap();

        let err = seeder.seed_books(&mut rng).await.unwrap_err();
        assert!(matches!(err, SeedError::Config(_)));
        assert!(seeder.store().books().is_empty());

        let err = seeder.seed_reviews(&[], &mut rng).await.unwrap_err();
        assert!(matches!(err, SeedError::Config(_)));
    }

    #[tokio::test]
    async fn test_reviews_reject_zero_bias_period() {
        let config = SeedConfig {
            bias_every: 0,
            ..Default::default()
        };
        let seeder = Seeder::new(MemoryStore::new()).with_config(config);

        let err = seeder
            .seed_reviews(&[], &mut seeded_rng(10))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Config(_)));
    }
}
