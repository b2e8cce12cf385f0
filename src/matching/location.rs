//! Place-name normalization and tiered comparison.

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Shortest word that counts as a shared word for a partial match.
const MIN_SHARED_WORD_LEN: usize = 3;

/// Confidence of a location match. Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationTier {
    None,
    Partial,
    Exact,
}

impl LocationTier {
    pub fn is_match(self) -> bool {
        self != LocationTier::None
    }
}

/// Outcome of comparing an intent location with a property's community and city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationMatch {
    pub tier: LocationTier,
    /// Original spelling of the side that matched.
    pub label: String,
}

/// Lowercase, strip diacritics, turn punctuation into spaces and collapse whitespace.
///
/// `"  Dubaï Marina/JBR "` becomes `"dubai marina jbr"`.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compare an intent location against a property's community and city.
///
/// The stronger tier wins. On equal tiers the community is reported, so the
/// label is stable regardless of how the city is spelled.
pub fn match_location(intent_location: Option<&str>, community: &str, city: &str) -> LocationMatch {
    let fallback_label = if community.trim().is_empty() { city } else { community };

    let wanted = match intent_location.map(normalize) {
        Some(wanted) if !wanted.is_empty() => wanted,
        _ => {
            return LocationMatch {
                tier: LocationTier::None,
                label: fallback_label.trim().to_string(),
            }
        }
    };

    let community_tier = compare_normalized(&wanted, &normalize(community));
    let city_tier = compare_normalized(&wanted, &normalize(city));

    let (tier, label) = if city_tier > community_tier {
        (city_tier, city)
    } else if community_tier.is_match() {
        (community_tier, community)
    } else {
        (LocationTier::None, fallback_label)
    };

    LocationMatch {
        tier,
        label: label.trim().to_string(),
    }
}

/// Tier between two already-normalized strings.
pub(crate) fn compare_normalized(wanted: &str, candidate: &str) -> LocationTier {
    if wanted.is_empty() || candidate.is_empty() {
        return LocationTier::None;
    }
    if wanted == candidate {
        return LocationTier::Exact;
    }

    let wanted_words: Vec<&str> = wanted.split(' ').collect();
    let candidate_words: Vec<&str> = candidate.split(' ').collect();

    if contains_word_run(&candidate_words, &wanted_words)
        || contains_word_run(&wanted_words, &candidate_words)
        || shares_word(&wanted_words, &candidate_words)
    {
        LocationTier::Partial
    } else {
        LocationTier::None
    }
}

/// True when `needle` appears as consecutive whole words inside `haystack`.
pub(crate) fn contains_word_run(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

fn shares_word(left: &[&str], right: &[&str]) -> bool {
    left.iter()
        .filter(|word| word.chars().count() >= MIN_SHARED_WORD_LEN)
        .any(|word| right.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_case_accents_and_punctuation() {
        assert_eq!(normalize("  Dubaï   Marina—JBR "), "dubai marina jbr");
        assert_eq!(normalize("Off-Plan"), "off plan");
        assert_eq!(normalize("Ras Al-Khaimah!"), "ras al khaimah");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn exact_match_on_community() {
        let found = match_location(Some("palm jumeirah"), "Palm Jumeirah", "Dubai");
        assert_eq!(found.tier, LocationTier::Exact);
        assert_eq!(found.label, "Palm Jumeirah");
    }

    #[test]
    fn exact_match_on_city() {
        let found = match_location(Some("Dubai"), "Business Bay", "Dubai");
        assert_eq!(found.tier, LocationTier::Exact);
        assert_eq!(found.label, "Dubai");
    }

    #[test]
    fn whole_word_substring_is_partial() {
        let found = match_location(Some("Palm"), "Palm Jumeirah", "Dubai");
        assert_eq!(found.tier, LocationTier::Partial);
        assert_eq!(found.label, "Palm Jumeirah");

        let reverse = match_location(Some("Dubai Marina Walk"), "Dubai Marina", "Dubai");
        assert_eq!(reverse.tier, LocationTier::Partial);
    }

    #[test]
    fn shared_word_is_partial() {
        let found = match_location(Some("Palm Jumeirah"), "Palm Jebel Ali", "Dubai");
        assert_eq!(found.tier, LocationTier::Partial);
    }

    #[test]
    fn short_shared_words_do_not_count() {
        assert_eq!(compare_normalized("al barsha", "al quoz"), LocationTier::None);
    }

    #[test]
    fn inner_substrings_are_not_words() {
        // "marina" inside "marinas" is not a whole word, and neither side is a run of the other
        assert_eq!(compare_normalized("marina", "marinas"), LocationTier::None);
    }

    #[test]
    fn community_wins_ties_over_city() {
        let found = match_location(Some("Dubai"), "Dubai", "Dubai");
        assert_eq!(found.tier, LocationTier::Exact);
        assert_eq!(found.label, "Dubai");

        let partial = match_location(Some("jumeirah"), "Jumeirah Park", "Jumeirah Village");
        assert_eq!(partial.tier, LocationTier::Partial);
        assert_eq!(partial.label, "Jumeirah Park");
    }

    #[test]
    fn stronger_city_tier_beats_partial_community() {
        let found = match_location(Some("Dubai"), "Dubai Hills", "Dubai");
        assert_eq!(found.tier, LocationTier::Exact);
        assert_eq!(found.label, "Dubai");
    }

    #[test]
    fn absent_or_blank_intent_is_none() {
        assert_eq!(match_location(None, "Downtown", "Dubai").tier, LocationTier::None);
        assert_eq!(match_location(Some("  "), "Downtown", "Dubai").tier, LocationTier::None);
    }

    #[test]
    fn no_overlap_is_none() {
        let found = match_location(Some("Palm Jumeirah"), "Downtown", "Dubai");
        assert_eq!(found.tier, LocationTier::None);
        assert_eq!(found.label, "Downtown");
    }
}
