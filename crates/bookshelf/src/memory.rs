//! In-memory store.
//!
//! Mirrors the constraints of the PostgreSQL schema: unique genre names and
//! emails, foreign keys checked on insert, deletes refused while referenced
//! rows remain, book-genre links cascading with their book or genre, and the
//! 1-5 rating check. `popular_books` evaluates the same rule as the
//! `PopularBook` view.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::errors::StoreError;
use crate::models::{
    Author, AuthorWithBooks, Book, Genre, NewBook, NewPerson, NewReview, PopularBook, Publisher,
    Review, Table, User,
};
use crate::store::Store;

/// Average rating a book must exceed to appear in `PopularBook`.
pub const POPULAR_MIN_AVG_RATING: f64 = 4.0;

#[derive(Debug, Default)]
struct Tables {
    publishers: Vec<Publisher>,
    genres: Vec<Genre>,
    authors: Vec<Author>,
    books: Vec<Book>,
    users: Vec<User>,
    reviews: Vec<Review>,
    next_id: [i32; 6],
}

impl Tables {
    fn next_id(&mut self, table: Table) -> i32 {
        let slot = &mut self.next_id[table as usize];
        *slot += 1;
        *slot
    }

    fn len(&self, table: Table) -> usize {
        match table {
            Table::Review => self.reviews.len(),
            Table::Book => self.books.len(),
            Table::Genre => self.genres.len(),
            Table::Publisher => self.publishers.len(),
            Table::Author => self.authors.len(),
            Table::User => self.users.len(),
        }
    }

    fn insert_person(
        &mut self,
        table: Table,
        person: &NewPerson,
        skip_duplicates: bool,
    ) -> Result<bool, StoreError> {
        let taken = match table {
            Table::Author => self.authors.iter().any(|a| a.email == person.email),
            _ => self.users.iter().any(|u| u.email == person.email),
        };
        if taken {
            if skip_duplicates {
                return Ok(false);
            }
            return Err(StoreError::UniqueViolation {
                table,
                value: person.email.clone(),
            });
        }

        let id = self.next_id(table);
        match table {
            Table::Author => self.authors.push(Author {
                id,
                name: person.name.clone(),
                email: person.email.clone(),
            }),
            _ => self.users.push(User {
                id,
                name: person.name.clone(),
                email: person.email.clone(),
            }),
        }
        Ok(true)
    }

    /// Inserts a batch of people, keeping none of them if any insert fails.
    fn insert_people(
        &mut self,
        table: Table,
        people: &[NewPerson],
        skip_duplicates: bool,
    ) -> Result<u64, StoreError> {
        let before = (self.authors.len(), self.users.len());
        let mut inserted = 0;

        for person in people {
            match self.insert_person(table, person, skip_duplicates) {
                Ok(true) => inserted += 1,
                Ok(false) => {}
                Err(e) => {
                    self.authors.truncate(before.0);
                    self.users.truncate(before.1);
                    return Err(e);
                }
            }
        }
        Ok(inserted)
    }

    fn check_book(&self, book: &NewBook) -> Result<(), StoreError> {
        if !self.authors.iter().any(|a| a.id == book.author_id) {
            return Err(StoreError::ForeignKeyViolation {
                table: Table::Book,
                detail: format!("author {} does not exist", book.author_id),
            });
        }
        if !self.publishers.iter().any(|p| p.id == book.publisher_id) {
            return Err(StoreError::ForeignKeyViolation {
                table: Table::Book,
                detail: format!("publisher {} does not exist", book.publisher_id),
            });
        }
        for (i, genre_id) in book.genre_ids.iter().enumerate() {
            if !self.genres.iter().any(|g| g.id == *genre_id) {
                return Err(StoreError::ForeignKeyViolation {
                    table: Table::Book,
                    detail: format!("genre {genre_id} does not exist"),
                });
            }
            if book.genre_ids[..i].contains(genre_id) {
                return Err(StoreError::UniqueViolation {
                    table: Table::Book,
                    value: format!("genre {genre_id} linked twice"),
                });
            }
        }
        Ok(())
    }

    /// Refuses the delete when another table still references `table`.
    fn check_unreferenced(&self, table: Table) -> Result<(), StoreError> {
        let referenced_by = match table {
            Table::Book if !self.reviews.is_empty() => Some("reviews"),
            Table::User if !self.reviews.is_empty() => Some("reviews"),
            Table::Publisher if !self.books.is_empty() => Some("books"),
            Table::Author if !self.books.is_empty() => Some("books"),
            _ => None,
        };

        match referenced_by {
            Some(other) => Err(StoreError::ForeignKeyViolation {
                table,
                detail: format!("rows are still referenced from {other}"),
            }),
            None => Ok(()),
        }
    }
}

/// Store that keeps every table in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock leaves plain vectors behind, still usable.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of every book, in insertion order.
    pub fn books(&self) -> Vec<Book> {
        self.lock().books.clone()
    }

    /// Snapshot of every review, in insertion order.
    pub fn reviews(&self) -> Vec<Review> {
        self.lock().reviews.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn delete_all(&self, table: Table) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        tables.check_unreferenced(table)?;

        let removed = tables.len(table) as u64;
        match table {
            Table::Review => tables.reviews.clear(),
            Table::Book => tables.books.clear(),
            Table::Genre => {
                tables.genres.clear();
                for book in &mut tables.books {
                    book.genre_ids.clear();
                }
            }
            Table::Publisher => tables.publishers.clear(),
            Table::Author => tables.authors.clear(),
            Table::User => tables.users.clear(),
        }
        Ok(removed)
    }

    async fn count(&self, table: Table) -> Result<i64, StoreError> {
        Ok(self.lock().len(table) as i64)
    }

    async fn create_publishers(&self, names: &[String]) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        for name in names {
            let id = tables.next_id(Table::Publisher);
            tables.publishers.push(Publisher {
                id,
                name: name.clone(),
            });
        }
        Ok(names.len() as u64)
    }

    async fn create_genres(
        &self,
        names: &[String],
        skip_duplicates: bool,
    ) -> Result<u64, StoreError> {
        let mut tables = self.lock();

        // All-or-nothing, like the transactional batch in PostgreSQL.
        if !skip_duplicates {
            for (i, name) in names.iter().enumerate() {
                if tables.genres.iter().any(|g| &g.name == name) || names[..i].contains(name) {
                    return Err(StoreError::UniqueViolation {
                        table: Table::Genre,
                        value: name.clone(),
                    });
                }
            }
        }

        let mut inserted = 0;
        for name in names {
            if tables.genres.iter().any(|g| &g.name == name) {
                continue;
            }
            let id = tables.next_id(Table::Genre);
            tables.genres.push(Genre {
                id,
                name: name.clone(),
            });
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn create_authors(
        &self,
        authors: &[NewPerson],
        skip_duplicates: bool,
    ) -> Result<u64, StoreError> {
        self.lock()
            .insert_people(Table::Author, authors, skip_duplicates)
    }

    async fn create_users(
        &self,
        users: &[NewPerson],
        skip_duplicates: bool,
    ) -> Result<u64, StoreError> {
        self.lock().insert_people(Table::User, users, skip_duplicates)
    }

    async fn find_publishers(&self) -> Result<Vec<Publisher>, StoreError> {
        Ok(self.lock().publishers.clone())
    }

    async fn find_genres(&self) -> Result<Vec<Genre>, StoreError> {
        Ok(self.lock().genres.clone())
    }

    async fn find_authors(&self) -> Result<Vec<Author>, StoreError> {
        Ok(self.lock().authors.clone())
    }

    async fn find_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.lock().users.clone())
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book, StoreError> {
        let mut tables = self.lock();
        tables.check_book(book)?;

        let created = Book {
            id: tables.next_id(Table::Book),
            title: book.title.clone(),
            author_id: book.author_id,
            publisher_id: book.publisher_id,
            genre_ids: book.genre_ids.clone(),
        };
        tables.books.push(created.clone());
        Ok(created)
    }

    async fn create_review(&self, review: &NewReview) -> Result<Review, StoreError> {
        let mut tables = self.lock();

        if !tables.books.iter().any(|b| b.id == review.book_id) {
            return Err(StoreError::ForeignKeyViolation {
                table: Table::Review,
                detail: format!("book {} does not exist", review.book_id),
            });
        }
        if !tables.users.iter().any(|u| u.id == review.user_id) {
            return Err(StoreError::ForeignKeyViolation {
                table: Table::Review,
                detail: format!("user {} does not exist", review.user_id),
            });
        }
        if !(1..=5).contains(&review.rating) {
            return Err(StoreError::CheckViolation {
                table: Table::Review,
                detail: format!("rating {} outside 1..=5", review.rating),
            });
        }

        let created = Review {
            id: tables.next_id(Table::Review),
            book_id: review.book_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        tables.reviews.push(created.clone());
        Ok(created)
    }

    async fn create_author_with_book(
        &self,
        author: &NewPerson,
        title: &str,
        publisher_name: &str,
    ) -> Result<AuthorWithBooks, StoreError> {
        let mut tables = self.lock();

        if tables.authors.iter().any(|a| a.email == author.email) {
            return Err(StoreError::UniqueViolation {
                table: Table::Author,
                value: author.email.clone(),
            });
        }

        let publisher_id = tables.next_id(Table::Publisher);
        tables.publishers.push(Publisher {
            id: publisher_id,
            name: publisher_name.to_string(),
        });

        let created = Author {
            id: tables.next_id(Table::Author),
            name: author.name.clone(),
            email: author.email.clone(),
        };
        tables.authors.push(created.clone());

        let book = Book {
            id: tables.next_id(Table::Book),
            title: title.to_string(),
            author_id: created.id,
            publisher_id,
            genre_ids: Vec::new(),
        };
        tables.books.push(book.clone());

        Ok(AuthorWithBooks {
            author: created,
            books: vec![book],
        })
    }

    async fn popular_books(&self, limit: i64) -> Result<Vec<PopularBook>, StoreError> {
        let tables = self.lock();
        let mut rows = Vec::new();

        for book in &tables.books {
            let ratings: Vec<i32> = tables
                .reviews
                .iter()
                .filter(|r| r.book_id == book.id)
                .map(|r| r.rating)
                .collect();
            if ratings.is_empty() {
                continue;
            }

            let avg_rating = ratings.iter().sum::<i32>() as f64 / ratings.len() as f64;
            if avg_rating <= POPULAR_MIN_AVG_RATING {
                continue;
            }

            let author_name = tables
                .authors
                .iter()
                .find(|a| a.id == book.author_id)
                .map(|a| a.name.clone())
                .unwrap_or_default();
            let publisher_name = tables
                .publishers
                .iter()
                .find(|p| p.id == book.publisher_id)
                .map(|p| p.name.clone())
                .unwrap_or_default();

            rows.push(PopularBook {
                book_id: book.id,
                title: book.title.clone(),
                author_name,
                publisher_name,
                avg_rating,
                review_count: ratings.len() as i64,
            });
        }

        rows.sort_by(|a, b| {
            b.avg_rating
                .partial_cmp(&a.avg_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.review_count.cmp(&a.review_count))
        });
        rows.truncate(limit.max(0) as usize);

        Ok(rows)
    }

    async fn close(&self) {}
}
