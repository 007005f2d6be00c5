//! Value generators for seed data.
//!
//! - [`PersonGenerator`]: names and emails for authors and users
//! - [`CatalogGenerator`]: publisher names, genre names, book titles
//! - [`ReviewGenerator`]: ratings (uniform or high-biased) and comments
//! - [`sample_unique`]: distinct random subsets

pub mod catalog;
pub mod person;
pub mod review;
pub mod sample;

pub use catalog::CatalogGenerator;
pub use person::{PersonGenConfig, PersonGenerator};
pub use review::{RatingProfile, ReviewGenerator};
pub use sample::sample_unique;
