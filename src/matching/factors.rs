//! The five factor scorers.
//!
//! Each scorer is a pure function of (intent, property) returning the points it
//! awards, the observed value and an explanation. A missing or invalid intent
//! field always yields zero points with a "not specified" explanation.

use tracing::debug;

use super::location::{compare_normalized, contains_word_run, match_location, normalize, LocationTier};
use crate::models::{Factor, Intent, Property};

/// Share of the budget a price may exceed it by and still earn partial credit.
pub const BUDGET_BUFFER: f64 = 0.10;

/// Share of the location weight awarded for a partial match.
pub const PARTIAL_LOCATION_SHARE: f64 = 0.5;

/// Share of the bedroom weight awarded when the count is off by one.
pub const NEAR_BEDROOM_SHARE: f64 = 0.5;

/// Property type spellings folded onto one canonical form.
const TYPE_ALIASES: &[(&str, &str)] = &[
    ("town house", "townhouse"),
    ("flat", "apartment"),
    ("condo", "apartment"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct FactorScore {
    pub points: f64,
    pub value: String,
    pub explanation: String,
}

impl FactorScore {
    fn new(points: f64, value: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            points,
            value: value.into(),
            explanation: explanation.into(),
        }
    }

    fn zero(value: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(0.0, value, explanation)
    }
}

/// Dispatch to the scorer for `factor`.
pub fn score_factor(factor: Factor, intent: &Intent, property: &Property) -> FactorScore {
    let scored = match factor {
        Factor::Budget => budget(intent, property),
        Factor::Location => location(intent, property),
        Factor::Bedrooms => bedrooms(intent, property),
        Factor::PropertyType => property_type(intent, property),
        Factor::Status => status(intent, property),
    };
    debug!(
        property = %property.id,
        factor = factor.label(),
        points = scored.points,
        "factor scored"
    );
    scored
}

pub fn budget(intent: &Intent, property: &Property) -> FactorScore {
    let weight = f64::from(Factor::Budget.weight());
    let price = property.listed_price();
    let value = price.map_or_else(|| "Price on request".to_string(), format_aed);

    let Some(max_budget) = intent.budget() else {
        return FactorScore::zero(value, "No budget specified");
    };
    let Some(price) = price else {
        return FactorScore::zero(value, "Price on request");
    };

    if price <= max_budget {
        return FactorScore::new(
            weight,
            value,
            format!(
                "Within your budget ({} ≤ {})",
                format_aed(price),
                format_aed(max_budget)
            ),
        );
    }

    let buffer = max_budget * BUDGET_BUFFER;
    let excess = price - max_budget;
    if excess <= buffer {
        // Linear from full weight at the budget down to zero at the edge of the buffer
        let points = (weight * (1.0 - excess / buffer)).clamp(0.0, weight);
        FactorScore::new(
            points,
            value,
            format!(
                "Slightly over budget, within 10% buffer ({:.1}% over)",
                excess / max_budget * 100.0
            ),
        )
    } else {
        FactorScore::zero(
            value,
            format!(
                "Over budget by more than 10% ({} > {})",
                format_aed(price),
                format_aed(max_budget)
            ),
        )
    }
}

pub fn location(intent: &Intent, property: &Property) -> FactorScore {
    let weight = f64::from(Factor::Location.weight());
    let value = property.display_location();

    let Some(wanted) = intent.location() else {
        return FactorScore::zero(value, "No location specified");
    };

    let found = match_location(Some(wanted), &property.community, &property.city);
    match found.tier {
        LocationTier::Exact => FactorScore::new(
            weight,
            value,
            format!("Exact location match: {}", found.label),
        ),
        LocationTier::Partial => FactorScore::new(
            weight * PARTIAL_LOCATION_SHARE,
            value,
            format!("Partial location match: {} (near '{}')", found.label, wanted),
        ),
        LocationTier::None => FactorScore::zero(
            value,
            format!("Location: {} (doesn't match '{}')", found.label, wanted),
        ),
    }
}

pub fn bedrooms(intent: &Intent, property: &Property) -> FactorScore {
    let weight = f64::from(Factor::Bedrooms.weight());
    let value = bedroom_label(i64::from(property.bedrooms));

    let Some(wanted) = intent.bedrooms() else {
        return FactorScore::zero(value, "No bedroom preference specified");
    };

    match (i64::from(property.bedrooms) - wanted).unsigned_abs() {
        0 => FactorScore::new(weight, &value, format!("Exact bedroom match: {}", value)),
        1 => FactorScore::new(
            weight * NEAR_BEDROOM_SHARE,
            &value,
            format!("±1 bedroom: {} (requested {})", value, bedroom_label(wanted)),
        ),
        _ => FactorScore::zero(
            &value,
            format!(
                "Bedrooms don't match: {} (requested {})",
                value,
                bedroom_label(wanted)
            ),
        ),
    }
}

pub fn property_type(intent: &Intent, property: &Property) -> FactorScore {
    let weight = f64::from(Factor::PropertyType.weight());
    let value = display_or_unknown(&property.property_type);

    let Some(wanted) = intent.property_type() else {
        return FactorScore::zero(value, "No property type specified");
    };

    let listed = canonical_type(&property.property_type);
    if !listed.is_empty() && listed == canonical_type(wanted) {
        FactorScore::new(weight, &value, format!("Property type matches: {}", value))
    } else {
        FactorScore::zero(
            &value,
            format!("Property type: {} (requested {})", value, wanted),
        )
    }
}

pub fn status(intent: &Intent, property: &Property) -> FactorScore {
    let weight = f64::from(Factor::Status.weight());
    let listed = property.status.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let value = listed.unwrap_or("Not listed").to_string();

    let Some(wanted) = intent.status() else {
        return FactorScore::zero(value, "No status preference specified");
    };
    let Some(listed) = listed else {
        return FactorScore::zero(value, "Status not listed");
    };

    if status_matches(wanted, listed) {
        FactorScore::new(weight, &value, format!("Status matches: {}", value))
    } else {
        FactorScore::zero(&value, format!("Status: {} (requested {})", value, wanted))
    }
}

/// Completion status, folded into the two categories listings use.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StatusCategory {
    Ready,
    OffPlan,
    Other(String),
}

fn categorize_status(raw: &str) -> StatusCategory {
    let normalized = normalize(raw);
    let words: Vec<&str> = normalized.split(' ').collect();

    if normalized == "offplan" || contains_word_run(&words, &["off", "plan"]) {
        StatusCategory::OffPlan
    } else if words.contains(&"ready") || normalized == "completed" {
        StatusCategory::Ready
    } else {
        StatusCategory::Other(normalized)
    }
}

fn status_matches(wanted: &str, listed: &str) -> bool {
    match (categorize_status(wanted), categorize_status(listed)) {
        (StatusCategory::Other(wanted), StatusCategory::Other(listed)) => {
            compare_normalized(&wanted, &listed).is_match()
        }
        (wanted, listed) => wanted == listed,
    }
}

/// Normalized type with plurals dropped and common synonyms folded.
fn canonical_type(raw: &str) -> String {
    let normalized = normalize(raw);
    let singular = match normalized.strip_suffix('s') {
        Some(stem) if stem.len() >= 3 && !stem.ends_with('s') => stem.to_string(),
        _ => normalized.clone(),
    };

    TYPE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == singular)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(singular)
}

fn display_or_unknown(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

/// "Studio" for zero bedrooms, "2BR" otherwise.
pub fn bedroom_label(bedrooms: i64) -> String {
    if bedrooms == 0 {
        "Studio".to_string()
    } else {
        format!("{}BR", bedrooms)
    }
}

/// Compact AED amount: "AED 1.95M", "AED 850K" or "AED 900".
pub fn format_aed(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("AED {:.2}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("AED {:.0}K", amount / 1_000.0)
    } else {
        format!("AED {:.0}", amount)
    }
}
