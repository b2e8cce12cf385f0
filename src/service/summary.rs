use crate::models::Intent;

/// Short rule-based reply describing what was searched for and how much was found.
pub fn describe(intent: &Intent, total: usize) -> String {
    let criteria = criteria(intent);

    if total == 0 {
        return match intent.location() {
            Some(location) => {
                let others: Vec<&str> = criteria
                    .iter()
                    .filter(|c| !c.starts_with("in "))
                    .map(String::as_str)
                    .collect();
                let detail = if others.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", others.join(", "))
                };
                format!(
                    "I couldn't find any properties in {}{}. Try adjusting your search criteria or check a different location.",
                    location, detail
                )
            }
            None => "No properties are available right now. Try again in a moment or refine your search.".to_string(),
        };
    }

    let mut text = if total == 1 {
        "I found 1 property".to_string()
    } else {
        format!("I found {} properties", total)
    };

    if criteria.is_empty() {
        text.push('.');
    } else {
        text.push_str(" matching ");
        text.push_str(&criteria.join(", "));
        text.push('.');
    }

    if total > 5 {
        text.push_str(" Ask me to refine further to narrow them down.");
    } else {
        text.push_str(" Let me know if you'd like more options or different criteria.");
    }
    text
}

fn criteria(intent: &Intent) -> Vec<String> {
    let mut parts = Vec::new();

    if let Some(bedrooms) = intent.bedrooms() {
        parts.push(match bedrooms {
            0 => "studio".to_string(),
            1 => "1 bedroom".to_string(),
            n => format!("{} bedrooms", n),
        });
    }
    if let Some(location) = intent.location() {
        parts.push(format!("in {}", location));
    }
    if let Some(budget) = intent.budget() {
        parts.push(if budget >= 1_000_000.0 {
            format!("under {:.1}M AED", budget / 1_000_000.0)
        } else {
            format!("under {:.0}K AED", budget / 1_000.0)
        });
    }
    if let Some(property_type) = intent.property_type() {
        parts.push(property_type.to_lowercase());
    }
    if let Some(status) = intent.status() {
        parts.push(status.to_lowercase());
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_matches_with_criteria() {
        let intent = Intent {
            max_budget: Some(2_000_000.0),
            location: Some("Dubai Marina".to_string()),
            min_bedrooms: Some(2),
            property_type: Some("Apartment".to_string()),
            status: None,
        };
        assert_eq!(
            describe(&intent, 12),
            "I found 12 properties matching 2 bedrooms, in Dubai Marina, under 2.0M AED, apartment. Ask me to refine further to narrow them down."
        );
    }

    #[test]
    fn singular_and_plain() {
        assert_eq!(
            describe(&Intent::default(), 1),
            "I found 1 property. Let me know if you'd like more options or different criteria."
        );
    }

    #[test]
    fn no_results_names_location() {
        let intent = Intent {
            location: Some("Fujairah".to_string()),
            min_bedrooms: Some(0),
            max_budget: Some(800_000.0),
            ..Intent::default()
        };
        assert_eq!(
            describe(&intent, 0),
            "I couldn't find any properties in Fujairah (studio, under 800K AED). Try adjusting your search criteria or check a different location."
        );
        assert!(describe(&Intent::default(), 0).starts_with("No properties are available"));
    }
}
