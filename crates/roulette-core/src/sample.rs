use rand::seq::SliceRandom;

/// Draw up to `count` distinct items uniformly at random, without
/// replacement. Asking for more than the pool holds returns the whole pool
/// in random order.
pub fn sample_without_replacement<T: Clone>(pool: &[T], count: usize) -> Vec<T> {
    let mut rng = rand::thread_rng();
    pool.choose_multiple(&mut rng, count).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_size_is_min_of_request_and_pool() {
        let pool: Vec<u32> = (0..10).collect();
        assert_eq!(sample_without_replacement(&pool, 3).len(), 3);
        assert_eq!(sample_without_replacement(&pool, 10).len(), 10);
        assert_eq!(sample_without_replacement(&pool, 25).len(), 10);
    }

    #[test]
    fn test_sample_is_distinct() {
        let pool: Vec<u32> = (0..50).collect();
        for _ in 0..20 {
            let drawn = sample_without_replacement(&pool, 3);
            let distinct: HashSet<u32> = drawn.iter().copied().collect();
            assert_eq!(distinct.len(), drawn.len());
        }
    }

    #[test]
    fn test_empty_pool_yields_empty_sample() {
        let pool: Vec<u32> = Vec::new();
        assert!(sample_without_replacement(&pool, 3).is_empty());
    }

    #[test]
    fn test_samples_come_from_the_pool() {
        let pool: Vec<u32> = (100..110).collect();
        for item in sample_without_replacement(&pool, 5) {
            assert!(pool.contains(&item));
        }
    }
}
