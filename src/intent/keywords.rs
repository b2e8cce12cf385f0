use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::IntentExtractor;
use crate::matching::location::{contains_word_run, normalize};
use crate::models::Intent;

/// Known places as (normalized alias, canonical name). Longer aliases win over
/// shorter ones; among equal lengths the earlier entry wins.
const KNOWN_LOCATIONS: &[(&str, &str)] = &[
    ("dubai marina", "Dubai Marina"),
    ("marina", "Dubai Marina"),
    ("downtown dubai", "Downtown"),
    ("downtown", "Downtown"),
    ("business bay", "Business Bay"),
    ("jumeirah village circle", "Jumeirah Village Circle"),
    ("jvc", "Jumeirah Village Circle"),
    ("palm jumeirah", "Palm Jumeirah"),
    ("palm jebel ali", "Palm Jebel Ali"),
    ("palm deira", "Palm Deira"),
    ("palm", "Palm Jumeirah"),
    ("meydan", "Meydan"),
    ("wasl gate", "Wasl Gate"),
    ("jumeirah garden city", "Jumeirah Garden City"),
    ("dubai hills", "Dubai Hills"),
    ("dubai land", "Dubai Land"),
    ("arabian ranches", "Arabian Ranches"),
    ("emirates hills", "Emirates Hills"),
    ("dubai sports city", "Dubai Sports City"),
    ("damac hills", "Damac Hills"),
    ("motor city", "Motor City"),
    ("international city", "International City"),
    ("bur dubai", "Bur Dubai"),
    ("deira", "Deira"),
    ("al barsha", "Al Barsha"),
    ("al quoz", "Al Quoz"),
    ("al sufouh", "Al Sufouh"),
    ("dubai silicon oasis", "Dubai Silicon Oasis"),
    ("dso", "Dubai Silicon Oasis"),
    ("jumeirah lakes towers", "Jumeirah Lakes Towers"),
    ("jlt", "Jumeirah Lakes Towers"),
    ("jumeirah beach residence", "Jumeirah Beach Residence"),
    ("jbr", "Jumeirah Beach Residence"),
    ("dubai international financial centre", "Dubai International Financial Centre"),
    ("difc", "Dubai International Financial Centre"),
    ("sheikh zayed road", "Sheikh Zayed Road"),
    ("szr", "Sheikh Zayed Road"),
    ("dubai creek harbour", "Dubai Creek Harbour"),
    ("creek harbour", "Dubai Creek Harbour"),
    ("dubai festival city", "Dubai Festival City"),
    ("festival city", "Dubai Festival City"),
    ("city walk", "City Walk"),
    ("bluewaters", "Bluewaters"),
    ("zabeel", "Zabeel"),
    ("remraam", "Remraam"),
    ("al reem island", "Al Reem Island"),
    ("jumeirah", "Jumeirah"),
    ("abu dhabi", "Abu Dhabi"),
    ("sharjah", "Sharjah"),
    ("ajman", "Ajman"),
    ("ras al khaimah", "Ras Al Khaimah"),
    ("rak", "Ras Al Khaimah"),
    ("fujairah", "Fujairah"),
    ("umm al quwain", "Umm Al Quwain"),
    ("dubai", "Dubai"),
];

/// Property type keywords, checked in order. Words are singularized first.
const TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("Townhouse", &["townhouse", "town house"]),
    ("Villa", &["villa", "mansion", "detached"]),
    ("Penthouse", &["penthouse"]),
    // "studio" is a zero-bedroom apartment; the bedroom count carries the rest
    ("Apartment", &["apartment", "flat", "condo", "residence", "studio"]),
];

const NUMBER_WORDS: &[(&str, i64)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
];

/// Words that mark a following or preceding plain number as a budget.
const BUDGET_CUES: &[&str] = &["under", "below", "max", "maximum", "upto", "around", "about", "aed"];

/// Rule-based intent extraction from free text
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordIntentParser;

impl KeywordIntentParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, text: &str) -> Intent {
        let normalized = normalize(text);
        let words: Vec<&str> = normalized.split_whitespace().collect();

        let intent = Intent {
            max_budget: parse_budget(&text.to_lowercase()),
            location: parse_location(&words),
            min_bedrooms: parse_bedrooms(&words),
            property_type: parse_property_type(&words),
            status: parse_status(&words),
        };
        debug!(?intent, "parsed intent from keywords");
        intent
    }
}

#[async_trait]
impl IntentExtractor for KeywordIntentParser {
    async fn extract(&self, text: &str) -> Result<Intent> {
        Ok(self.parse(text))
    }

    fn extractor_name(&self) -> &'static str {
        "Keywords"
    }
}

/// "2M", "1.5 million", "800k", "budget 1500000", "under 2,000,000 AED".
fn parse_budget(lowered: &str) -> Option<f64> {
    let tokens: Vec<&str> = lowered
        .split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric() && c != '.' && c != ',')
                .trim_matches(|c: char| c == '.' || c == ',')
        })
        .filter(|t| !t.is_empty())
        .collect();

    for (i, &token) in tokens.iter().enumerate() {
        let token = token.strip_prefix("aed").unwrap_or(token);
        let Some((amount, suffix)) = leading_number(token) else {
            continue;
        };
        let unit = if suffix.is_empty() {
            tokens.get(i + 1).copied().unwrap_or_default()
        } else {
            suffix
        };
        if let Some(multiplier) = amount_multiplier(unit) {
            return Some(amount * multiplier);
        }
    }

    let mut after_budget_word = false;
    for (i, token) in tokens.iter().enumerate() {
        if token.starts_with("budget") {
            after_budget_word = true;
            continue;
        }
        let Some((amount, "")) = leading_number(token) else {
            continue;
        };
        let cued = |j: Option<usize>| {
            j.and_then(|j| tokens.get(j))
                .is_some_and(|t| BUDGET_CUES.contains(t))
        };
        if (after_budget_word && amount >= 1_000.0)
            || (amount >= 10_000.0 && (cued(i.checked_sub(1)) || cued(Some(i + 1))))
        {
            return Some(amount);
        }
    }

    None
}

/// Split "1,500.5abc" into (1500.5, "abc").
fn leading_number(token: &str) -> Option<(f64, &str)> {
    let end = token
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(token.len());
    if end == 0 {
        return None;
    }
    let amount = token[..end].replace(',', "").parse().ok()?;
    Some((amount, &token[end..]))
}

fn amount_multiplier(unit: &str) -> Option<f64> {
    match unit {
        "m" | "mn" | "mil" | "million" | "millions" => Some(1_000_000.0),
        "k" | "thousand" | "thousands" => Some(1_000.0),
        _ => None,
    }
}

/// "2 bed", "3br", "2bhk", "two bedrooms"; "studio" means 0.
fn parse_bedrooms(words: &[&str]) -> Option<i64> {
    for (i, word) in words.iter().enumerate() {
        let (count, suffix) = match leading_integer(word) {
            Some(found) => found,
            None => match NUMBER_WORDS.iter().find(|(name, _)| name == word) {
                Some((_, n)) => (*n, ""),
                None => continue,
            },
        };
        let unit = if suffix.is_empty() {
            words.get(i + 1).copied().unwrap_or_default()
        } else {
            suffix
        };
        if is_bedroom_unit(unit) {
            return Some(count);
        }
    }

    words.contains(&"studio").then_some(0)
}

fn leading_integer(word: &str) -> Option<(i64, &str)> {
    let end = word.find(|c: char| !c.is_ascii_digit()).unwrap_or(word.len());
    if end == 0 {
        return None;
    }
    Some((word[..end].parse().ok()?, &word[end..]))
}

fn is_bedroom_unit(unit: &str) -> bool {
    unit.starts_with("bed") || matches!(unit, "br" | "brs" | "bhk" | "bdr" | "bd")
}

fn parse_property_type(words: &[&str]) -> Option<String> {
    let singular: Vec<&str> = words.iter().copied().map(singularize).collect();

    TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords.iter().any(|keyword| {
                let keyword_words: Vec<&str> = keyword.split(' ').collect();
                contains_word_run(&singular, &keyword_words)
            })
        })
        .map(|(canonical, _)| canonical.to_string())
}

fn singularize(word: &str) -> &str {
    match word.strip_suffix('s') {
        Some(stem) if stem.len() >= 3 && !stem.ends_with('s') => stem,
        _ => word,
    }
}

fn parse_location(words: &[&str]) -> Option<String> {
    KNOWN_LOCATIONS
        .iter()
        .map(|(alias, canonical)| (alias.split(' ').collect::<Vec<_>>(), *canonical))
        .filter(|(alias_words, _)| contains_word_run(words, alias_words))
        // max_by_key keeps the last maximum; reverse so the earliest entry wins ties
        .rev()
        .max_by_key(|(alias_words, _)| alias_words.len())
        .map(|(_, canonical)| canonical.to_string())
}

fn parse_status(words: &[&str]) -> Option<String> {
    if words.contains(&"offplan") || contains_word_run(words, &["off", "plan"]) {
        Some("Off-plan".to_string())
    } else if words.contains(&"ready") {
        Some("Ready".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SampleCatalog;
    use crate::matching::score;
    use crate::models::Factor;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Intent {
        KeywordIntentParser::new().parse(text)
    }

    #[test]
    fn full_query() {
        assert_eq!(
            parse("Ready 2 bed apartment in Palm Jumeirah under 2M"),
            Intent {
                max_budget: Some(2_000_000.0),
                location: Some("Palm Jumeirah".to_string()),
                min_bedrooms: Some(2),
                property_type: Some("Apartment".to_string()),
                status: Some("Ready".to_string()),
            }
        );
    }

    #[test]
    fn budget_forms() {
        assert_eq!(parse("around 1.5 million").max_budget, Some(1_500_000.0));
        assert_eq!(parse("800k max").max_budget, Some(800_000.0));
        assert_eq!(parse("AED2.5M please").max_budget, Some(2_500_000.0));
        assert_eq!(parse("my budget is 1500000").max_budget, Some(1_500_000.0));
        assert_eq!(parse("under 2,000,000 AED").max_budget, Some(2_000_000.0));
        assert_eq!(parse("3 bed villa").max_budget, None);
    }

    #[test]
    fn bedroom_forms() {
        assert_eq!(parse("3br townhouse").min_bedrooms, Some(3));
        assert_eq!(parse("2bhk flat").min_bedrooms, Some(2));
        assert_eq!(parse("a 4-bedroom villa").min_bedrooms, Some(4));
        assert_eq!(parse("two bedrooms near the beach").min_bedrooms, Some(2));
        assert_eq!(parse("studio in JVC").min_bedrooms, Some(0));
        assert_eq!(parse("something nice").min_bedrooms, None);
    }

    #[test]
    fn property_types() {
        assert_eq!(parse("town houses in dubai").property_type.as_deref(), Some("Townhouse"));
        assert_eq!(parse("detached villa").property_type.as_deref(), Some("Villa"));
        assert_eq!(parse("cheap flats").property_type.as_deref(), Some("Apartment"));
        assert_eq!(parse("penthouse with a view").property_type.as_deref(), Some("Penthouse"));
        assert_eq!(parse("studio in JVC").property_type.as_deref(), Some("Apartment"));
        assert_eq!(parse("somewhere quiet").property_type, None);
    }

    #[test]
    fn parsed_types_score_against_listed_types() {
        let catalog = SampleCatalog::properties();
        let listing = |id: &str| catalog.iter().find(|p| p.id == id).unwrap();

        let townhouse = score(&parse("3 bed townhouse in Arabian Ranches"), listing("SYN_0008"));
        assert_eq!(townhouse.points_for(Factor::PropertyType), 10.0);
        assert_eq!(townhouse.points_for(Factor::Bedrooms), 20.0);

        let studio = score(&parse("studio in JVC"), listing("SYN_0007"));
        assert_eq!(studio.points_for(Factor::PropertyType), 10.0);
        assert_eq!(studio.points_for(Factor::Bedrooms), 20.0);
        assert_eq!(studio.points_for(Factor::Location), 25.0);
    }

    #[test]
    fn longest_location_alias_wins() {
        assert_eq!(parse("villa on palm jebel ali").location.as_deref(), Some("Palm Jebel Ali"));
        assert_eq!(parse("something on the palm").location.as_deref(), Some("Palm Jumeirah"));
        assert_eq!(parse("flat in Dubai Marina").location.as_deref(), Some("Dubai Marina"));
        assert_eq!(parse("JLT 1 bed").location.as_deref(), Some("Jumeirah Lakes Towers"));
        assert_eq!(parse("anything in dubai").location.as_deref(), Some("Dubai"));
        assert_eq!(parse("no place named").location, None);
    }

    #[test]
    fn status_keywords() {
        assert_eq!(parse("off-plan investment").status.as_deref(), Some("Off-plan"));
        assert_eq!(parse("off plan").status.as_deref(), Some("Off-plan"));
        assert_eq!(parse("ready to move").status.as_deref(), Some("Ready"));
        assert_eq!(parse("anything").status, None);
    }

    #[tokio::test]
    async fn extractor_trait_delegates_to_parse() {
        let parser = KeywordIntentParser::new();
        let intent = parser.extract("2 bed in Downtown").await.unwrap();
        assert_eq!(intent, parser.parse("2 bed in Downtown"));
        assert_eq!(parser.extractor_name(), "Keywords");
    }
}
