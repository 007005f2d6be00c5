//! Author and user generation.

use fake::{Fake, faker::name::en::Name};
use rand::Rng;
use rand::seq::SliceRandom;

use bookshelf::models::NewPerson;

/// Configuration for person generation.
#[derive(Debug, Clone)]
pub struct PersonGenConfig {
    /// Mail domains picked uniformly for generated emails.
    pub domains: Vec<String>,
    /// Upper bound (exclusive) of the numeric suffix appended to the local part.
    pub max_suffix: u32,
}

impl Default for PersonGenConfig {
    fn default() -> Self {
        Self {
            domains: vec![
                "gmail.com".to_string(),
                "outlook.com".to_string(),
                "yahoo.com".to_string(),
                "proton.me".to_string(),
            ],
            max_suffix: 9999,
        }
    }
}

/// Generates names and emails for authors and users.
pub struct PersonGenerator {
    config: PersonGenConfig,
}

impl PersonGenerator {
    /// Creates a new person generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: PersonGenConfig::default(),
        }
    }

    /// Generates a single person.
    pub fn generate(&self, rng: &mut impl Rng) -> NewPerson {
        let name: String = Name().fake_with_rng(rng);
        let email = self.generate_email(&name, rng);
        NewPerson { name, email }
    }

    /// Generates multiple people.
    pub fn generate_batch(&self, count: usize, rng: &mut impl Rng) -> Vec<NewPerson> {
        (0..count).map(|_| self.generate(rng)).collect()
    }

    /// Generates an email from a name.
    fn generate_email(&self, name: &str, rng: &mut impl Rng) -> String {
        let normalized: String = name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ')
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");

        let suffix: u32 = rng.gen_range(1..self.config.max_suffix.max(2));
        let domain = self
            .config
            .domains
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("example.com");

        format!("{normalized}{suffix}@{domain}")
    }
}

impl Default for PersonGenerator {
    fn default() -> Self {
        Self::new()
    }
}
