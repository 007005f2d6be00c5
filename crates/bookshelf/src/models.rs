use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Entity tables, named as they appear in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    Review,
    Book,
    Genre,
    Publisher,
    Author,
    User,
}

impl Table {
    /// Deletion order that satisfies every foreign key in the schema.
    pub const WIPE_ORDER: [Table; 6] = [
        Table::Review,
        Table::Book,
        Table::Genre,
        Table::Publisher,
        Table::Author,
        Table::User,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Table::Review => "reviews",
            Table::Book => "books",
            Table::Genre => "genres",
            Table::Publisher => "publishers",
            Table::Author => "authors",
            Table::User => "users",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// A book together with the ids of its linked genres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub publisher_id: i32,
    pub genre_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: OffsetDateTime,
}

/// An author returned with its nested books, as produced by a composite write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorWithBooks {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<Book>,
}

/// One row of the `PopularBook` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PopularBook {
    #[sqlx(rename = "bookId")]
    pub book_id: i32,
    pub title: String,
    #[sqlx(rename = "authorName")]
    pub author_name: String,
    #[sqlx(rename = "publisherName")]
    pub publisher_name: String,
    #[sqlx(rename = "avgRating")]
    pub avg_rating: f64,
    #[sqlx(rename = "reviewCount")]
    pub review_count: i64,
}

/// Name and email for an author or user insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author_id: i32,
    pub publisher_id: i32,
    pub genre_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub book_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: String,
}
