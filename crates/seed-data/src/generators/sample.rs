//! Sampling without replacement.

use rand::Rng;
use rand::seq::SliceRandom;

/// Returns up to `count` distinct elements of `items` in random order.
///
/// Shuffles a copy uniformly and keeps the first `min(count, items.len())`
/// elements, so the result never repeats an element and never exceeds the
/// population.
pub fn sample_unique<T: Clone>(items: &[T], count: usize, rng: &mut impl Rng) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count.min(items.len()));
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_sample_is_distinct() {
        let mut rng = StdRng::seed_from_u64(1);
        let items: Vec<u32> = (0..15).collect();

        for count in 0..=15 {
            let picked = sample_unique(&items, count, &mut rng);
            assert_eq!(picked.len(), count);
            let distinct: HashSet<_> = picked.iter().collect();
            assert_eq!(distinct.len(), count);
            assert!(picked.iter().all(|p| items.contains(p)));
        }
    }

    #[test]
    fn test_sample_capped_at_population() {
        let mut rng = StdRng::seed_from_u64(2);
        let picked = sample_unique(&["a", "b"], 5, &mut rng);
        assert_eq!(picked.len(), 2);

        let empty: Vec<u8> = Vec::new();
        assert!(sample_unique(&empty, 3, &mut rng).is_empty());
    }

    #[test]
    fn test_sample_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(3);
        let items: Vec<usize> = (0..10).collect();
        let mut hits = [0usize; 10];

        for _ in 0..10_000 {
            for i in sample_unique(&items, 3, &mut rng) {
                hits[i] += 1;
            }
        }

        // Each element expects 3000 hits
        for h in hits {
            assert!(h > 2700 && h < 3300, "uneven sampling: {hits:?}");
        }
    }
}
