//! Identifier permutation.

use rand::seq::SliceRandom;
use rand::Rng;

/// Returns `1..=total` in uniformly random order.
///
/// Uses a Fisher-Yates shuffle over `rng`, so every permutation is equally
/// likely and a seeded rng reproduces the same order.
pub fn permuted_ids<R: Rng + ?Sized>(total: u64, rng: &mut R) -> Vec<u64> {
    let mut ids: Vec<u64> = (1..=total).collect();
    ids.shuffle(rng);
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn should_contain_each_identifier_once() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ids = permuted_ids(1_000, &mut rng);
        ids.sort_unstable();
        assert_eq!(ids, (1..=1_000).collect::<Vec<_>>());
    }

    #[test]
    fn should_reproduce_order_when_seed_matches() {
        let a = permuted_ids(100, &mut StdRng::seed_from_u64(9));
        let b = permuted_ids(100, &mut StdRng::seed_from_u64(9));
        let c = permuted_ids(100, &mut StdRng::seed_from_u64(10));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn should_return_empty_when_total_zero() {
        assert!(permuted_ids(0, &mut StdRng::seed_from_u64(0)).is_empty());
    }
}
