//! Complexity scorer
//!
//! Maps structural facts (plus a style discount) onto the fixed 1-10
//! scale. The composite is monotonic in every input and nothing is
//! learned at runtime: the same signals always land in the same bucket.
//!
//! # Bucket Boundaries
//!
//! The [0,1] composite maps onto fixed tenths:
//!
//! - 1-2: tutorial-equivalent boilerplate
//! - 3-4: routine CRUD / glue work
//! - 5-6: moderate engineering
//! - 7-8: substantial system work
//! - 9-10: novel algorithmic / system design

use crate::config::Calibration;
use crate::models::{ComplexityRating, Signal, SignalCategory};

/// Rates technical complexity from the collected signal set.
pub struct ComplexityScorer<'a> {
    calibration: &'a Calibration,
}

impl<'a> ComplexityScorer<'a> {
    pub fn new(calibration: &'a Calibration) -> Self {
        Self { calibration }
    }

    /// Compute the rating. Only `complexity_input` signals enter the
    /// composite; the naming-genericity style signal applies a bounded
    /// discount and everything else is ignored.
    pub fn rate(&self, signals: &[Signal]) -> ComplexityRating {
        let contributing: Vec<Signal> = signals
            .iter()
            .filter(|s| s.category == SignalCategory::ComplexityInput)
            .cloned()
            .collect();

        if contributing.is_empty() {
            return ComplexityRating {
                score: 1,
                contributing,
            };
        }

        let weights = &self.calibration.complexity;
        let value_of = |name: &str| {
            contributing
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.value)
                .unwrap_or(0.0)
        };

        let mut composite = weights.branching_density * value_of("branching_density")
            + weights.custom_code_share * value_of("custom_code_share")
            + weights.structural_breadth * value_of("structural_breadth");

        // Generic naming caps how sophisticated the corpus can read:
        // boilerplate dressed in branches still scores like boilerplate.
        let genericity = signals
            .iter()
            .find(|s| s.name == "naming_genericity")
            .map(|s| s.value)
            .unwrap_or(0.0);
        composite -= weights.genericity_discount * genericity;

        ComplexityRating {
            score: bucket(composite),
            contributing,
        }
    }
}

/// Fixed tenth-buckets over the clamped composite.
fn bucket(composite: f64) -> u8 {
    let clamped = composite.clamp(0.0, 1.0);
    ((clamped * 10.0).floor() as u8 + 1).min(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, value: f64) -> Signal {
        Signal::new(name, SignalCategory::ComplexityInput, value, 1.0, "test")
    }

    fn style(name: &str, value: f64) -> Signal {
        Signal::new(name, SignalCategory::Style, value, 0.7, "test")
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(bucket(-0.5), 1);
        assert_eq!(bucket(0.0), 1);
        assert_eq!(bucket(0.05), 1);
        assert_eq!(bucket(0.15), 2);
        assert_eq!(bucket(0.55), 6);
        assert_eq!(bucket(0.95), 10);
        assert_eq!(bucket(1.0), 10);
        assert_eq!(bucket(2.0), 10);
    }

    #[test]
    fn test_no_structural_signals_is_floor() {
        let calibration = Calibration::default();
        let scorer = ComplexityScorer::new(&calibration);
        let rating = scorer.rate(&[style("naming_genericity", 0.2)]);
        assert_eq!(rating.score, 1);
        assert!(rating.contributing.is_empty());
    }

    #[test]
    fn test_maximal_inputs_hit_ceiling() {
        let calibration = Calibration::default();
        let scorer = ComplexityScorer::new(&calibration);
        let rating = scorer.rate(&[
            input("branching_density", 1.0),
            input("custom_code_share", 1.0),
            input("structural_breadth", 1.0),
        ]);
        assert_eq!(rating.score, 10);
        assert_eq!(rating.contributing.len(), 3);
    }

    #[test]
    fn test_monotonic_in_branching() {
        let calibration = Calibration::default();
        let scorer = ComplexityScorer::new(&calibration);
        let rate_at = |branching: f64| {
            scorer
                .rate(&[
                    input("branching_density", branching),
                    input("custom_code_share", 0.5),
                    input("structural_breadth", 0.5),
                ])
                .score
        };
        let mut last = 0u8;
        for step in 0..=10 {
            let score = rate_at(step as f64 / 10.0);
            assert!(score >= last, "composite dipped at step {}", step);
            last = score;
        }
    }

    #[test]
    fn test_genericity_discounts_rating() {
        let calibration = Calibration::default();
        let scorer = ComplexityScorer::new(&calibration);
        let structural = [
            input("branching_density", 0.6),
            input("custom_code_share", 0.6),
            input("structural_breadth", 0.6),
        ];

        let plain = scorer.rate(&structural).score;
        let mut with_generic: Vec<Signal> = structural.to_vec();
        with_generic.push(style("naming_genericity", 1.0));
        let discounted = scorer.rate(&with_generic).score;

        assert!(discounted <= plain);
        assert_eq!(plain - discounted, 1); // 0.10 discount crosses one bucket
    }

    #[test]
    fn test_same_inputs_same_bucket() {
        let calibration = Calibration::default();
        let scorer = ComplexityScorer::new(&calibration);
        let signals = [
            input("branching_density", 0.37),
            input("custom_code_share", 0.81),
            input("structural_breadth", 0.12),
        ];
        assert_eq!(scorer.rate(&signals), scorer.rate(&signals));
    }
}
