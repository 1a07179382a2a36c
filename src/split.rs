//! Routing identifiers between the two target files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which file a write goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Configured,
    Vanilla,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Configured => f.write_str("configured"),
            Destination::Vanilla => f.write_str("vanilla"),
        }
    }
}

/// Real-valued cutoff `total × (percentage / 100.0)`.
///
/// Identifiers are compared against the threshold as `f64`, so a
/// fractional threshold is never rounded: with a threshold of 5.5,
/// identifier 5 is configured and identifier 6 is vanilla.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitThreshold(f64);

impl SplitThreshold {
    pub fn new(total: u64, percentage: i64) -> Self {
        Self(total as f64 * (percentage as f64 / 100.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Destination of a single identifier. Depends only on its value.
    pub fn route(&self, id: u64) -> Destination {
        if id as f64 <= self.0 {
            Destination::Configured
        } else {
            Destination::Vanilla
        }
    }

    /// Number of identifiers in `1..=total` that route to the configured file.
    pub fn configured_count(&self, total: u64) -> u64 {
        if self.0 < 1.0 {
            0
        } else {
            (self.0.floor() as u64).min(total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_route_everything_vanilla_when_percentage_zero() {
        let t = SplitThreshold::new(10, 0);
        assert!((1..=10).all(|id| t.route(id) == Destination::Vanilla));
        assert_eq!(t.configured_count(10), 0);
    }

    #[test]
    fn should_route_everything_configured_when_percentage_hundred() {
        let t = SplitThreshold::new(10, 100);
        assert!((1..=10).all(|id| t.route(id) == Destination::Configured));
        assert_eq!(t.configured_count(10), 10);
    }

    #[test]
    fn should_split_in_half_when_percentage_fifty() {
        let t = SplitThreshold::new(10, 50);
        assert_eq!(t.value(), 5.0);
        assert_eq!(t.route(5), Destination::Configured);
        assert_eq!(t.route(6), Destination::Vanilla);
        assert_eq!(t.configured_count(10), 5);
    }

    #[test]
    fn should_compare_real_valued_when_threshold_fractional() {
        let t = SplitThreshold::new(10, 55);
        assert_eq!(t.value(), 5.5);
        assert_eq!(t.route(5), Destination::Configured);
        assert_eq!(t.route(6), Destination::Vanilla);
        assert_eq!(t.configured_count(10), 5);
    }

    #[test]
    fn should_clamp_counts_when_percentage_out_of_range() {
        assert_eq!(SplitThreshold::new(10, -20).configured_count(10), 0);
        assert_eq!(SplitThreshold::new(10, 250).configured_count(10), 10);
        assert_eq!(SplitThreshold::new(10, 250).route(10), Destination::Configured);
    }

    #[test]
    fn should_match_brute_force_count_for_every_percentage() {
        let total = 1_000;
        for p in 0..=100 {
            let t = SplitThreshold::new(total, p);
            let counted = (1..=total)
                .filter(|&id| t.route(id) == Destination::Configured)
                .count() as u64;
            assert_eq!(t.configured_count(total), counted, "percentage {p}");
        }
    }
}
