//! Seed data generation for bookshelf.
//!
//! This crate fills the bookshelf schema with synthetic publishers, genres,
//! authors, books, users, and reviews, then reports table counts and the top
//! rows of the `PopularBook` view.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let db = Database::connect(&database_url).await?;
//! let seeder = Seeder::new(db).with_config(SeedConfig::from_env()?);
//! let mut rng = seeder.config().rng();
//!
//! let report = seeder.run(&mut rng).await?;
//! println!("{report}");
//! seeder.store().close().await;
//! ```

pub mod config;
pub mod db;
pub mod generators;
pub mod report;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{DEFAULT_DATABASE_URL, SeedConfig};
    pub use crate::db::{SeedError, Seeder};
    pub use crate::generators::{
        CatalogGenerator, PersonGenerator, RatingProfile, ReviewGenerator, sample_unique,
    };
    pub use crate::report::{SeedReport, TableCounts, render_popular_table};
    pub use bookshelf::{Database, MemoryStore, Store};
}
