use serde::{Deserialize, Serialize};

use super::Property;

/// One of the five scoring factors, in breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Factor {
    Budget,
    Location,
    Bedrooms,
    PropertyType,
    Status,
}

const _: () = assert!(
    Factor::Budget.weight()
        + Factor::Location.weight()
        + Factor::Bedrooms.weight()
        + Factor::PropertyType.weight()
        + Factor::Status.weight()
        == Factor::TOTAL_WEIGHT
);

impl Factor {
    /// Fixed evaluation and breakdown order.
    pub const ALL: [Factor; 5] = [
        Factor::Budget,
        Factor::Location,
        Factor::Bedrooms,
        Factor::PropertyType,
        Factor::Status,
    ];

    pub const TOTAL_WEIGHT: u32 = 100;

    /// Maximum points this factor can contribute.
    pub const fn weight(self) -> u32 {
        match self {
            Factor::Budget => 35,
            Factor::Location => 25,
            Factor::Bedrooms => 20,
            Factor::PropertyType => 10,
            Factor::Status => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Factor::Budget => "Budget Fit",
            Factor::Location => "Location Match",
            Factor::Bedrooms => "Bedrooms Match",
            Factor::PropertyType => "Property Type",
            Factor::Status => "Status Match",
        }
    }
}

/// Points awarded by a single factor, with the observed value and the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdownItem {
    pub factor: Factor,
    pub weight: u32,
    /// Observed property value, e.g. "AED 1.95M"
    pub value: String,
    /// Unrounded, `0.0 ..= weight`
    pub points: f64,
    pub explanation: String,
}

/// A property annotated with its match score against one intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProperty {
    pub property: Property,
    /// Exact sum of the breakdown points. Never rounded; see [`ScoredProperty::display_score`].
    pub score: f64,
    pub breakdown: Vec<ScoreBreakdownItem>,
    pub top_reasons: Vec<String>,
}

impl ScoredProperty {
    /// Score rounded to the nearest integer, for display only.
    pub fn display_score(&self) -> u32 {
        self.score.round().clamp(0.0, f64::from(Factor::TOTAL_WEIGHT)) as u32
    }

    pub fn points_for(&self, factor: Factor) -> f64 {
        self.breakdown
            .iter()
            .find(|item| item.factor == factor)
            .map_or(0.0, |item| item.points)
    }
}

/// Position of a page within the full ranked sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub current_count: usize,
    pub has_more: bool,
}
