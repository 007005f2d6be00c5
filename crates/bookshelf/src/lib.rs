//! Bookshelf domain models and store clients.
//!
//! The schema (publishers, genres, authors, books, users, reviews and the
//! `PopularBook` view) lives in `migrations/`. Code that reads or writes it goes
//! through the [`Store`] trait, implemented by [`Database`] for PostgreSQL and
//! by [`MemoryStore`] for tests and dry runs.

pub mod database;
pub mod errors;
pub mod memory;
pub mod models;
pub mod store;

pub use database::Database;
pub use errors::StoreError;
pub use memory::MemoryStore;
pub use store::Store;
