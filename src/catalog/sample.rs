use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::traits::CatalogSource;
use crate::models::{Property, Source};

/// Built-in Dubai catalog for demos and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCatalog;

impl SampleCatalog {
    pub fn new() -> Self {
        Self
    }

    /// The sample records, in a fixed order.
    pub fn properties() -> Vec<Property> {
        // (id, title, community, city, type, bedrooms, size, price, status, featured)
        let rows: [(&str, &str, &str, &str, &str, u32, f64, Option<f64>, &str, bool); 16] = [
            ("DV_001", "Védaire Residences", "Meydan Avenue", "Dubai", "Apartment", 1, 850.0, Some(1_400_000.0), "Off-plan", true),
            ("DV_002", "Bellagio by Sunrise", "Wasl Gate", "Dubai", "Apartment", 1, 750.0, Some(970_000.0), "Off-plan", true),
            ("DV_003", "Trillium Heights", "Jumeirah Garden City", "Dubai", "Apartment", 2, 1_100.0, Some(1_020_000.0), "Off-plan", true),
            ("SYN_0001", "Apartment in Palm Jumeirah - 2 Bed", "Palm Jumeirah", "Dubai", "Apartment", 2, 1_450.0, Some(1_950_000.0), "Ready", false),
            ("SYN_0002", "Apartment in Palm Jumeirah - 3 Bed", "Palm Jumeirah", "Dubai", "Apartment", 3, 2_050.0, Some(3_600_000.0), "Ready", false),
            ("SYN_0003", "Villa in Palm Jebel Ali - 4 Bed", "Palm Jebel Ali", "Dubai", "Villa", 4, 5_200.0, Some(8_900_000.0), "Off-plan", false),
            ("SYN_0004", "Apartment in Dubai Marina - 2 Bed", "Dubai Marina", "Dubai", "Apartment", 2, 1_250.0, Some(2_050_000.0), "Ready", false),
            ("SYN_0005", "Penthouse in Dubai Marina - 4 Bed", "Dubai Marina", "Dubai", "Penthouse", 4, 4_100.0, Some(9_500_000.0), "Ready", false),
            ("SYN_0006", "Apartment in Downtown - 1 Bed", "Downtown", "Dubai", "Apartment", 1, 820.0, Some(1_750_000.0), "Ready", false),
            ("SYN_0007", "Studio in Jumeirah Village Circle", "Jumeirah Village Circle", "Dubai", "Apartment", 0, 420.0, Some(520_000.0), "Ready", false),
            ("SYN_0008", "Townhouse in Arabian Ranches - 3 Bed", "Arabian Ranches", "Dubai", "Townhouse", 3, 2_600.0, Some(3_100_000.0), "Ready", false),
            ("SYN_0009", "Villa in Dubai Hills - 5 Bed", "Dubai Hills", "Dubai", "Villa", 5, 6_300.0, None, "Ready", false),
            ("SYN_0010", "Apartment in Business Bay - 2 Bed", "Business Bay", "Dubai", "Apartment", 2, 1_180.0, Some(1_680_000.0), "Off-plan", false),
            ("SYN_0011", "Apartment in Al Reem Island - 2 Bed", "Al Reem Island", "Abu Dhabi", "Apartment", 2, 1_300.0, Some(1_150_000.0), "Ready", false),
            ("SYN_0012", "Villa in Aljada - 3 Bed", "Aljada", "Sharjah", "Villa", 3, 2_900.0, Some(2_200_000.0), "Off-plan", false),
            ("SYN_0013", "Apartment in Al Helio - 1 Bed", "Al Helio", "Ajman", "Apartment", 1, 780.0, Some(430_000.0), "Ready", false),
        ];

        rows.into_iter()
            .map(
                |(id, title, community, city, property_type, bedrooms, size, price, status, featured)| {
                    Property {
                        id: id.to_string(),
                        title: Some(title.to_string()),
                        price,
                        community: community.to_string(),
                        city: city.to_string(),
                        property_type: property_type.to_string(),
                        bedrooms,
                        status: Some(status.to_string()),
                        bathrooms: Some(bedrooms + 1),
                        size_sqft: Some(size),
                        image_url: None,
                        featured,
                        source: Source::Sample,
                    }
                },
            )
            .collect()
    }
}

#[async_trait]
impl CatalogSource for SampleCatalog {
    async fn load(&self) -> Result<Vec<Property>> {
        let properties = Self::properties();
        info!("📋 Using {} built-in sample properties", properties.len());
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "Sample"
    }
}
