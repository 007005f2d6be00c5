//! Publisher, genre, and book title generation.

use fake::{
    Fake,
    faker::{company::en::CompanyName, lorem::en::Words},
};
use rand::Rng;
use rand::seq::SliceRandom;

/// Generates catalog values: publisher names, genre names, and book titles.
pub struct CatalogGenerator {
    genres: Vec<&'static str>,
    /// Probability that a title starts with "The".
    article_probability: f64,
}

impl CatalogGenerator {
    /// Creates a new catalog generator with the built-in genre list.
    pub fn new() -> Self {
        Self {
            genres: default_genres(),
            article_probability: 0.3,
        }
    }

    /// Generates a company-style publisher name.
    pub fn publisher_name(&self, rng: &mut impl Rng) -> String {
        CompanyName().fake_with_rng(rng)
    }

    /// Draws a genre name. Draws are independent, so repeats are expected.
    pub fn genre_name(&self, rng: &mut impl Rng) -> String {
        self.genres
            .choose(rng)
            .map(|g| g.to_string())
            .unwrap_or_else(|| "General".to_string())
    }

    /// Generates a title-cased book title of two to four words.
    pub fn book_title(&self, rng: &mut impl Rng) -> String {
        let words: Vec<String> = Words(2..5).fake_with_rng(rng);
        let title = words
            .iter()
            .map(|w| capitalize(w))
            .collect::<Vec<_>>()
            .join(" ");

        if rng.r#gen::<f64>() < self.article_probability {
            format!("The {title}")
        } else {
            title
        }
    }

    pub fn publisher_names(&self, count: usize, rng: &mut impl Rng) -> Vec<String> {
        (0..count).map(|_| self.publisher_name(rng)).collect()
    }

    pub fn genre_names(&self, count: usize, rng: &mut impl Rng) -> Vec<String> {
        (0..count).map(|_| self.genre_name(rng)).collect()
    }
}

impl Default for CatalogGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn default_genres() -> Vec<&'static str> {
    vec![
        "Fantasy",
        "Science Fiction",
        "Mystery",
        "Thriller",
        "Romance",
        "Horror",
        "Historical Fiction",
        "Literary Fiction",
        "Biography",
        "Memoir",
        "Poetry",
        "Self-Help",
        "Travel",
        "Young Adult",
        "Graphic Novel",
        "Philosophy",
        "Science",
        "True Crime",
        "Humor",
        "Classics",
    ]
}
