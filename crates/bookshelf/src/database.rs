use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::debug;

use crate::errors::StoreError;
use crate::models::{
    Author, AuthorWithBooks, Book, Genre, NewBook, NewPerson, NewReview, PopularBook, Publisher,
    Review, Table, User,
};
use crate::store::Store;

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a single-connection pool. Every seeding call is sequential, so
    /// one connection is all the store ever holds.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts authors or users, which share the `(name, email)` shape.
    async fn insert_people(
        &self,
        table: Table,
        people: &[NewPerson],
        skip_duplicates: bool,
    ) -> Result<u64, StoreError> {
        let sql = if skip_duplicates {
            format!("INSERT INTO {table} (name, email) VALUES ($1, $2) ON CONFLICT (email) DO NOTHING")
        } else {
            format!("INSERT INTO {table} (name, email) VALUES ($1, $2)")
        };

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for person in people {
            let result = sqlx::query(&sql)
                .bind(&person.name)
                .bind(&person.email)
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::classify(table, e))?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

#[async_trait]
impl Store for Database {
    async fn delete_all(&self, table: Table) -> Result<u64, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::classify(table, e))?;

        Ok(result.rows_affected())
    }

    async fn count(&self, table: Table) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create_publishers(&self, names: &[String]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for name in names {
            let result = sqlx::query("INSERT INTO publishers (name) VALUES ($1)")
                .bind(name)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn create_genres(
        &self,
        names: &[String],
        skip_duplicates: bool,
    ) -> Result<u64, StoreError> {
        let sql = if skip_duplicates {
            "INSERT INTO genres (name) VALUES ($1) ON CONFLICT (name) DO NOTHING"
        } else {
            "INSERT INTO genres (name) VALUES ($1)"
        };

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for name in names {
            let result = sqlx::query(sql)
                .bind(name)
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::classify(Table::Genre, e))?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn create_authors(
        &self,
        authors: &[NewPerson],
        skip_duplicates: bool,
    ) -> Result<u64, StoreError> {
        self.insert_people(Table::Author, authors, skip_duplicates)
            .await
    }

    async fn create_users(
        &self,
        users: &[NewPerson],
        skip_duplicates: bool,
    ) -> Result<u64, StoreError> {
        self.insert_people(Table::User, users, skip_duplicates).await
    }

    async fn find_publishers(&self) -> Result<Vec<Publisher>, StoreError> {
        let publishers = sqlx::query_as("SELECT id, name FROM publishers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(publishers)
    }

    async fn find_genres(&self) -> Result<Vec<Genre>, StoreError> {
        let genres = sqlx::query_as("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(genres)
    }

    async fn find_authors(&self) -> Result<Vec<Author>, StoreError> {
        let authors = sqlx::query_as("SELECT id, name, email FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(authors)
    }

    async fn find_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book, StoreError> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author_id, publisher_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.publisher_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::classify(Table::Book, e))?;

        for genre_id in &book.genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(id)
                .bind(*genre_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::classify(Table::Book, e))?;
        }

        tx.commit().await?;
        debug!("Created book {} with {} genres", id, book.genre_ids.len());

        Ok(Book {
            id,
            title: book.title.clone(),
            author_id: book.author_id,
            publisher_id: book.publisher_id,
            genre_ids: book.genre_ids.clone(),
        })
    }

    async fn create_review(&self, review: &NewReview) -> Result<Review, StoreError> {
        let created = sqlx::query_as(
            r#"
            INSERT INTO reviews (book_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_id, user_id, rating, comment, created_at
            "#,
        )
        .bind(review.book_id)
        .bind(review.user_id)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::classify(Table::Review, e))?;

        Ok(created)
    }

    async fn create_author_with_book(
        &self,
        author: &NewPerson,
        title: &str,
        publisher_name: &str,
    ) -> Result<AuthorWithBooks, StoreError> {
        let mut tx = self.pool.begin().await?;

        let publisher_id: i32 =
            sqlx::query_scalar("INSERT INTO publishers (name) VALUES ($1) RETURNING id")
                .bind(publisher_name)
                .fetch_one(&mut *tx)
                .await?;

        let created: Author = sqlx::query_as(
            "INSERT INTO authors (name, email) VALUES ($1, $2) RETURNING id, name, email",
        )
        .bind(&author.name)
        .bind(&author.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::classify(Table::Author, e))?;

        let book_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author_id, publisher_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(created.id)
        .bind(publisher_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::classify(Table::Book, e))?;

        tx.commit().await?;

        let book = Book {
            id: book_id,
            title: title.to_string(),
            author_id: created.id,
            publisher_id,
            genre_ids: Vec::new(),
        };

        Ok(AuthorWithBooks {
            author: created,
            books: vec![book],
        })
    }

    async fn popular_books(&self, limit: i64) -> Result<Vec<PopularBook>, StoreError> {
        let rows = sqlx::query_as(
            r#"
            SELECT "bookId", title, "authorName", "publisherName", "avgRating", "reviewCount"
            FROM "PopularBook"
            ORDER BY "avgRating" DESC, "reviewCount" DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
