//! Database integration for seeding.
//!
//! The [`Seeder`] drives a [`bookshelf::Store`] through the wipe, populate, and
//! report sequence, one awaited store call at a time.

mod seeder;

pub use seeder::{SeedError, Seeder};
