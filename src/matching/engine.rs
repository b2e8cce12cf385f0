//! Composes the factor scorers into one weighted score.

use std::cmp::Ordering;

use super::factors::score_factor;
use crate::models::{Factor, Intent, Property, ScoreBreakdownItem, ScoredProperty};

/// Most explanations surfaced as top reasons.
pub const MAX_TOP_REASONS: usize = 4;

/// Score one property against an intent.
///
/// The breakdown always holds one item per [`Factor`], in [`Factor::ALL`]
/// order, and `score` is the plain sum of their points. Sparse or invalid
/// intents never fail; the affected factors just contribute nothing.
pub fn score(intent: &Intent, property: &Property) -> ScoredProperty {
    let breakdown: Vec<ScoreBreakdownItem> = Factor::ALL
        .iter()
        .map(|&factor| {
            let scored = score_factor(factor, intent, property);
            ScoreBreakdownItem {
                factor,
                weight: factor.weight(),
                value: scored.value,
                points: scored.points,
                explanation: scored.explanation,
            }
        })
        .collect();

    let score = breakdown.iter().map(|item| item.points).sum();
    let top_reasons = top_reasons(&breakdown);

    ScoredProperty {
        property: property.clone(),
        score,
        breakdown,
        top_reasons,
    }
}

/// Score every property, preserving input order.
pub fn score_all(intent: &Intent, properties: &[Property]) -> Vec<ScoredProperty> {
    properties.iter().map(|property| score(intent, property)).collect()
}

/// Explanations of the contributing factors, strongest first.
///
/// Ties keep breakdown order. Empty when nothing scored.
pub fn top_reasons(breakdown: &[ScoreBreakdownItem]) -> Vec<String> {
    let mut contributing: Vec<&ScoreBreakdownItem> =
        breakdown.iter().filter(|item| item.points > 0.0).collect();

    // sort_by is stable
    contributing.sort_by(|a, b| b.points.partial_cmp(&a.points).unwrap_or(Ordering::Equal));

    contributing
        .into_iter()
        .take(MAX_TOP_REASONS)
        .map(|item| item.explanation.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_intent() -> Intent {
        Intent {
            max_budget: Some(2_000_000.0),
            location: Some("Palm Jumeirah".to_string()),
            min_bedrooms: Some(2),
            property_type: Some("Apartment".to_string()),
            status: Some("ready".to_string()),
        }
    }

    fn palm_apartment() -> Property {
        Property::new("PJ_1")
            .with_price(1_950_000.0)
            .located("Palm Jumeirah", "Dubai")
            .with_type("Apartment")
            .with_bedrooms(2)
            .with_status("Ready")
    }

    #[test]
    fn perfect_match_scores_100() {
        let scored = score(&full_intent(), &palm_apartment());

        assert_eq!(scored.score, 100.0);
        assert_eq!(scored.display_score(), 100);
        assert_eq!(scored.breakdown.len(), 5);
        assert_eq!(scored.breakdown[0].value, "AED 1.95M");
        assert_eq!(scored.top_reasons.len(), MAX_TOP_REASONS);
        assert!(scored.top_reasons[0].starts_with("Within your budget"));
    }

    #[test]
    fn one_bedroom_off_and_wrong_status_scores_80() {
        let property = palm_apartment().with_bedrooms(3).with_status("Off-plan");
        let scored = score(&full_intent(), &property);

        assert_eq!(scored.score, 80.0);
        assert_eq!(scored.points_for(Factor::Budget), 35.0);
        assert_eq!(scored.points_for(Factor::Location), 25.0);
        assert_eq!(scored.points_for(Factor::Bedrooms), 10.0);
        assert_eq!(scored.points_for(Factor::PropertyType), 10.0);
        assert_eq!(scored.points_for(Factor::Status), 0.0);
    }

    #[test]
    fn breakdown_order_and_weights_are_fixed() {
        let scored = score(&Intent::default(), &palm_apartment());
        let factors: Vec<Factor> = scored.breakdown.iter().map(|item| item.factor).collect();
        let weights: u32 = scored.breakdown.iter().map(|item| item.weight).sum();

        assert_eq!(factors, Factor::ALL.to_vec());
        assert_eq!(weights, 100);
    }

    #[test]
    fn empty_intent_scores_zero_without_reasons() {
        let scored = score(&Intent::default(), &palm_apartment());

        assert_eq!(scored.score, 0.0);
        assert!(scored.top_reasons.is_empty());
        assert!(scored.breakdown.iter().all(|item| item.points == 0.0));
    }

    #[test]
    fn budget_only_intent_over_buffer_scores_zero() {
        let intent = Intent {
            max_budget: Some(1_000_000.0),
            ..Intent::default()
        };
        let scored = score(&intent, &Property::new("x").with_price(1_200_000.0));

        assert_eq!(scored.score, 0.0);
        assert!(scored.top_reasons.is_empty());
    }

    #[test]
    fn top_reasons_ordered_by_points_with_stable_ties() {
        let intent = Intent {
            location: Some("Palm".to_string()),
            min_bedrooms: Some(2),
            property_type: Some("Apartment".to_string()),
            status: Some("Ready".to_string()),
            ..Intent::default()
        };
        let scored = score(&intent, &palm_apartment());

        // bedrooms 20, location 12.5, type 10, status 10
        assert_eq!(scored.score, 52.5);
        assert_eq!(
            scored.top_reasons,
            vec![
                "Exact bedroom match: 2BR".to_string(),
                "Partial location match: Palm Jumeirah (near 'Palm')".to_string(),
                "Property type matches: Apartment".to_string(),
                "Status matches: Ready".to_string(),
            ]
        );
    }

    #[test]
    fn scoring_is_deterministic() {
        let property = palm_apartment().with_price(2_150_000.0).with_bedrooms(1);
        let first = score(&full_intent(), &property);
        let second = score(&full_intent(), &property);

        assert_eq!(first, second);
        assert_eq!(first.score.to_bits(), second.score.to_bits());
    }

    #[test]
    fn score_is_exact_sum_of_points() {
        let property = palm_apartment().with_price(2_130_000.0).located("Palm Jebel Ali", "Dubai");
        let scored = score(&full_intent(), &property);
        let sum: f64 = scored.breakdown.iter().map(|item| item.points).sum();

        assert_eq!(scored.score, sum);
        assert!(scored.score > 0.0 && scored.score < 100.0);
        assert!(scored
            .breakdown
            .iter()
            .all(|item| item.points >= 0.0 && item.points <= f64::from(item.weight)));
    }
}
