//! Deterministic confidence aggregation.
//!
//! Pure arithmetic over up to three partial scores; no I/O, no oracle.

use super::domain::{ConfidenceBreakdown, ConfidenceIndex, ConfidenceLevel};

const TEST_WEIGHT: f64 = 0.6;
const RELEVANCE_WEIGHT: f64 = 0.3;
const CONSISTENCY_WEIGHT: f64 = 0.1;

const HIGH_THRESHOLD: u8 = 75;
const MEDIUM_THRESHOLD: u8 = 50;

/// Collapse test, relevance, and consistency scores into one index.
///
/// A missing relevance score substitutes the test score; a missing
/// consistency score derives from the spread between the other two.
pub fn confidence_index(
    test_score: u8,
    relevance_score: Option<u8>,
    consistency_score: Option<u8>,
) -> ConfidenceIndex {
    let test = f64::from(test_score.min(100));
    let relevance = f64::from(relevance_score.unwrap_or(test_score).min(100));
    let consistency = match consistency_score {
        Some(value) => f64::from(value.min(100)),
        None => (100.0 - (test - relevance).abs()).max(0.0),
    };

    let test_weighted = test * TEST_WEIGHT;
    let relevance_weighted = relevance * RELEVANCE_WEIGHT;
    let consistency_weighted = consistency * CONSISTENCY_WEIGHT;

    let score = (test_weighted + relevance_weighted + consistency_weighted).round() as u8;

    ConfidenceIndex {
        score,
        level: level_for(score),
        breakdown: ConfidenceBreakdown {
            test_weighted: test_weighted as f32,
            relevance_weighted: relevance_weighted as f32,
            consistency_weighted: consistency_weighted as f32,
        },
    }
}

const fn level_for(score: u8) -> ConfidenceLevel {
    if score >= HIGH_THRESHOLD {
        ConfidenceLevel::High
    } else if score >= MEDIUM_THRESHOLD {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_example_scores_78_high() {
        let index = confidence_index(80, Some(70), Some(90));
        assert_eq!(index.score, 78);
        assert_eq!(index.level, ConfidenceLevel::High);
    }

    #[test]
    fn weighted_components_sum_to_the_score_within_rounding() {
        for (test, relevance, consistency) in
            [(80, Some(70), Some(90)), (33, Some(91), Some(12)), (100, Some(0), None)]
        {
            let index = confidence_index(test, relevance, consistency);
            let sum = index.breakdown.test_weighted
                + index.breakdown.relevance_weighted
                + index.breakdown.consistency_weighted;
            assert!(
                (f64::from(sum) - f64::from(index.score)).abs() <= 1.0,
                "components {sum} drift from score {}",
                index.score
            );
        }
    }

    #[test]
    fn missing_relevance_substitutes_the_test_score() {
        // All three inputs collapse to the test score, so the index does too.
        let index = confidence_index(64, None, None);
        assert_eq!(index.score, 64);
        assert_eq!(index.level, ConfidenceLevel::Medium);
    }

    #[test]
    fn missing_consistency_derives_from_the_spread() {
        // test 90, relevance 40: consistency = 100 - 50 = 50.
        // 90*0.6 + 40*0.3 + 50*0.1 = 71.
        let index = confidence_index(90, Some(40), None);
        assert_eq!(index.score, 71);
        assert_eq!(index.level, ConfidenceLevel::Medium);
    }

    #[test]
    fn derived_consistency_floors_at_zero() {
        let index = confidence_index(100, Some(0), None);
        // 100*0.6 + 0*0.3 + 0*0.1 = 60.
        assert_eq!(index.score, 60);
    }

    #[test]
    fn level_thresholds_are_inclusive() {
        assert_eq!(confidence_index(75, Some(75), Some(75)).level, ConfidenceLevel::High);
        assert_eq!(confidence_index(74, Some(74), Some(74)).level, ConfidenceLevel::Medium);
        assert_eq!(confidence_index(50, Some(50), Some(50)).level, ConfidenceLevel::Medium);
        assert_eq!(confidence_index(49, Some(49), Some(49)).level, ConfidenceLevel::Low);
    }

    #[test]
    fn determinism_holds_across_repeated_calls() {
        let first = confidence_index(67, Some(88), Some(52));
        let second = confidence_index(67, Some(88), Some(52));
        assert_eq!(first, second);
    }
}
