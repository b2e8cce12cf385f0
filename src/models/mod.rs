pub(crate) mod lenient;
mod score;

use serde::{Deserialize, Serialize};

pub use score::{Factor, PaginationInfo, ScoreBreakdownItem, ScoredProperty};

/// Source of the property listing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Static dataset loaded from disk
    #[default]
    Dataset,
    /// Third-party listings API
    Listings,
    /// Built-in demo catalog
    Sample,
}

/// Structured housing preferences extracted from a free-text query.
///
/// Every field is optional and absence means "no preference". Deserialization
/// is lenient: a field with the wrong JSON type, a blank string or a
/// non-finite number is read as absent instead of failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default, deserialize_with = "lenient::number")]
    pub max_budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub min_bedrooms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

impl Intent {
    /// Budget usable for scoring: finite and strictly positive.
    pub fn budget(&self) -> Option<f64> {
        self.max_budget.filter(|b| b.is_finite() && *b > 0.0)
    }

    /// Bedroom count usable for scoring: non-negative.
    pub fn bedrooms(&self) -> Option<i64> {
        self.min_bedrooms.filter(|b| *b >= 0)
    }

    pub fn location(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }

    pub fn property_type(&self) -> Option<&str> {
        non_blank(self.property_type.as_deref())
    }

    pub fn status(&self) -> Option<&str> {
        non_blank(self.status.as_deref())
    }

    /// True when at least one field would contribute to a score.
    pub fn has_constraints(&self) -> bool {
        self.budget().is_some()
            || self.location().is_some()
            || self.bedrooms().is_some()
            || self.property_type().is_some()
            || self.status().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Core property data model
///
/// Only `price`, `community`, `city`, `property_type`, `bedrooms` and `status`
/// take part in scoring. The remaining fields are carried through for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "price_aed")]
    pub price: Option<f64>,
    #[serde(default)]
    pub community: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub property_type: String,
    /// 0 is a studio
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub size_sqft: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub source: Source,
}

impl Property {
    /// Create an empty record with the given id; fill it in with the `with_*` setters.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            price: None,
            community: String::new(),
            city: String::new(),
            property_type: String::new(),
            bedrooms: 0,
            status: None,
            bathrooms: None,
            size_sqft: None,
            image_url: None,
            featured: false,
            source: Source::default(),
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn located(mut self, community: impl Into<String>, city: impl Into<String>) -> Self {
        self.community = community.into();
        self.city = city.into();
        self
    }

    pub fn with_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_type = property_type.into();
        self
    }

    pub fn with_bedrooms(mut self, bedrooms: u32) -> Self {
        self.bedrooms = bedrooms;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_size(mut self, size_sqft: f64) -> Self {
        self.size_sqft = Some(size_sqft);
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    /// Price usable for scoring: finite and strictly positive.
    pub fn listed_price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite() && *p > 0.0)
    }

    /// Price per square foot, when both price and size are known.
    pub fn price_per_sqft(&self) -> Option<f64> {
        let size = self.size_sqft.filter(|s| s.is_finite() && *s > 0.0)?;
        Some(self.listed_price()? / size)
    }

    /// "Community, City", or whichever of the two is present.
    pub fn display_location(&self) -> String {
        match (self.community.trim(), self.city.trim()) {
            ("", "") => "Unknown".to_string(),
            (community, "") => community.to_string(),
            ("", city) => city.to_string(),
            (community, city) if community.eq_ignore_ascii_case(city) => community.to_string(),
            (community, city) => format!("{}, {}", community, city),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn intent_ignores_wrongly_typed_fields() {
        let intent: Intent = serde_json::from_str(
            r#"{"max_budget": "2,000,000", "location": 42, "min_bedrooms": "two",
                "property_type": "  ", "status": "Ready"}"#,
        )
        .unwrap();

        assert_eq!(
            intent,
            Intent {
                max_budget: Some(2_000_000.0),
                location: None,
                min_bedrooms: None,
                property_type: None,
                status: Some("Ready".to_string()),
            }
        );
    }

    #[test]
    fn empty_intent_has_no_constraints() {
        let intent: Intent = serde_json::from_str("{}").unwrap();
        assert!(!intent.has_constraints());

        let negative = Intent {
            max_budget: Some(-5.0),
            min_bedrooms: Some(-1),
            ..Intent::default()
        };
        assert!(!negative.has_constraints());
    }

    #[test]
    fn property_accepts_price_aed_alias() {
        let property: Property = serde_json::from_str(
            r#"{"id": "DV_001", "price_aed": 1400000, "community": "Meydan Avenue",
                "city": "Dubai", "property_type": "Apartment", "bedrooms": 1,
                "status": "Off-plan", "featured": true}"#,
        )
        .unwrap();

        assert_eq!(property.price, Some(1_400_000.0));
        assert_eq!(property.source, Source::Dataset);
        assert!(property.featured);
        assert_eq!(property.display_location(), "Meydan Avenue, Dubai");
    }

    #[test]
    fn price_per_sqft_needs_both_values() {
        let property = Property::new("p1").with_price(1_000_000.0).with_size(1_000.0);
        assert_eq!(property.price_per_sqft(), Some(1_000.0));
        assert_eq!(Property::new("p2").with_price(1.0).price_per_sqft(), None);
        assert_eq!(Property::new("p3").with_size(900.0).price_per_sqft(), None);
    }
}
