use crate::models::Property;

/// A listing is a good deal when it is at least this much cheaper per sqft than the median.
const VALUE_DISCOUNT: f64 = 0.9;

/// Median price per square foot across a catalog snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueBenchmark {
    median_price_per_sqft: Option<f64>,
}

impl ValueBenchmark {
    pub fn from_properties(properties: &[Property]) -> Self {
        let mut rates: Vec<f64> = properties.iter().filter_map(Property::price_per_sqft).collect();
        rates.sort_by(f64::total_cmp);

        let median_price_per_sqft = match rates.len() {
            0 => None,
            n if n % 2 == 1 => Some(rates[n / 2]),
            n => Some((rates[n / 2 - 1] + rates[n / 2]) / 2.0),
        };
        Self {
            median_price_per_sqft,
        }
    }

    pub fn median(&self) -> Option<f64> {
        self.median_price_per_sqft
    }

    /// "Great value: AED 1,050/sqft (below median AED 1,420/sqft)" for cheap listings.
    pub fn insight_for(&self, property: &Property) -> Option<String> {
        let median = self.median_price_per_sqft?;
        let rate = property.price_per_sqft()?;

        (rate < median * VALUE_DISCOUNT).then(|| {
            format!(
                "Great value: AED {}/sqft (below median AED {}/sqft)",
                group_thousands(rate as u64),
                group_thousands(median as u64)
            )
        })
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, price: f64, size: f64) -> Property {
        Property::new(id).with_price(price).with_size(size)
    }

    #[test]
    fn median_of_odd_and_even_sets() {
        let odd = [
            listing("a", 1_000_000.0, 1_000.0),
            listing("b", 3_000_000.0, 1_000.0),
            listing("c", 2_000_000.0, 1_000.0),
        ];
        assert_eq!(ValueBenchmark::from_properties(&odd).median(), Some(2_000.0));

        let even = [listing("a", 1_000_000.0, 1_000.0), listing("b", 2_000_000.0, 1_000.0)];
        assert_eq!(ValueBenchmark::from_properties(&even).median(), Some(1_500.0));

        assert_eq!(ValueBenchmark::from_properties(&[Property::new("x")]).median(), None);
    }

    #[test]
    fn insight_only_below_ninety_percent_of_median() {
        let catalog = [
            listing("a", 1_000_000.0, 1_000.0),
            listing("b", 1_500_000.0, 1_000.0),
            listing("c", 2_000_000.0, 1_000.0),
        ];
        let benchmark = ValueBenchmark::from_properties(&catalog);

        assert_eq!(
            benchmark.insight_for(&catalog[0]).as_deref(),
            Some("Great value: AED 1,000/sqft (below median AED 1,500/sqft)")
        );
        assert_eq!(benchmark.insight_for(&catalog[1]), None);
        assert_eq!(benchmark.insight_for(&Property::new("unpriced")), None);
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
