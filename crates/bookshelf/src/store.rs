//! Store client abstraction.
//!
//! The [`Store`] trait is the seam between seeding logic and persistence. It is
//! implemented by [`crate::database::Database`] for PostgreSQL and by
//! [`crate::memory::MemoryStore`] for tests and dry runs.

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::{
    Author, AuthorWithBooks, Book, Genre, NewBook, NewPerson, NewReview, PopularBook, Publisher,
    Review, Table, User,
};

#[async_trait]
pub trait Store: Send + Sync {
    /// Deletes every row of `table`. Returns the number of rows removed.
    async fn delete_all(&self, table: Table) -> Result<u64, StoreError>;

    /// Counts the rows of `table`.
    async fn count(&self, table: Table) -> Result<i64, StoreError>;

    /// Inserts one publisher per name. Returns the number of rows inserted.
    async fn create_publishers(&self, names: &[String]) -> Result<u64, StoreError>;

    /// Inserts genres. With `skip_duplicates`, names that already exist are
    /// left out instead of failing the batch.
    async fn create_genres(&self, names: &[String], skip_duplicates: bool)
    -> Result<u64, StoreError>;

    /// Inserts authors, optionally skipping duplicate emails.
    async fn create_authors(
        &self,
        authors: &[NewPerson],
        skip_duplicates: bool,
    ) -> Result<u64, StoreError>;

    /// Inserts users, optionally skipping duplicate emails.
    async fn create_users(
        &self,
        users: &[NewPerson],
        skip_duplicates: bool,
    ) -> Result<u64, StoreError>;

    async fn find_publishers(&self) -> Result<Vec<Publisher>, StoreError>;
    async fn find_genres(&self) -> Result<Vec<Genre>, StoreError>;
    async fn find_authors(&self) -> Result<Vec<Author>, StoreError>;
    async fn find_users(&self) -> Result<Vec<User>, StoreError>;

    /// Creates a book and links its genres in a single write.
    async fn create_book(&self, book: &NewBook) -> Result<Book, StoreError>;

    async fn create_review(&self, review: &NewReview) -> Result<Review, StoreError>;

    /// Creates an author with one nested book (and the publisher that book
    /// needs) in a single write, returning the author with its books.
    async fn create_author_with_book(
        &self,
        author: &NewPerson,
        title: &str,
        publisher_name: &str,
    ) -> Result<AuthorWithBooks, StoreError>;

    /// Reads the `PopularBook` view ordered by average rating, then review
    /// count, both descending.
    async fn popular_books(&self, limit: i64) -> Result<Vec<PopularBook>, StoreError>;

    /// Releases the underlying connection.
    async fn close(&self);
}
