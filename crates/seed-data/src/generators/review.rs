//! Review rating and comment generation.

use fake::{Fake, faker::lorem::en::Sentences};
use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};

/// How ratings are drawn for a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingProfile {
    /// Every rating from 1 to 5 equally likely.
    Uniform,
    /// Skewed toward the top: 5 (70%), 4 (25%), 3 (5%), never 1 or 2.
    HighBias,
}

impl RatingProfile {
    /// Profile for the book at `index` in creation order: every `every`-th book,
    /// starting with the first, is high-biased.
    pub fn for_index(index: usize, every: usize) -> Self {
        if every > 0 && index % every == 0 {
            Self::HighBias
        } else {
            Self::Uniform
        }
    }
}

/// Ratings and weights (percent) of the high-bias profile.
const HIGH_BIAS_WEIGHTS: [(i32, u32); 3] = [(5, 70), (4, 25), (3, 5)];

/// Generates review ratings and comments.
pub struct ReviewGenerator {
    high_bias: WeightedIndex<u32>,
}

impl ReviewGenerator {
    pub fn new() -> Self {
        let high_bias = WeightedIndex::new(HIGH_BIAS_WEIGHTS.iter().map(|(_, w)| *w))
            .expect("high-bias weights are positive");
        Self { high_bias }
    }

    /// Draws a rating in 1..=5 according to `profile`.
    pub fn rating(&self, profile: RatingProfile, rng: &mut impl Rng) -> i32 {
        match profile {
            RatingProfile::Uniform => rng.gen_range(1..=5),
            RatingProfile::HighBias => HIGH_BIAS_WEIGHTS[self.high_bias.sample(rng)].0,
        }
    }

    /// Generates a comment of one or two lorem sentences.
    pub fn comment(&self, rng: &mut impl Rng) -> String {
        let sentences: Vec<String> = Sentences(1..3).fake_with_rng(rng);
        sentences.join(" ")
    }
}

impl Default for ReviewGenerator {
    fn default() -> Self {
        Self::new()
    }
}
