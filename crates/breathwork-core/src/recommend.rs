//! Keyword recommendation.
//!
//! Maps free text ("I feel stressed and can't sleep") to at most three
//! catalog techniques by matching a fixed pain-point vocabulary.

use crate::catalog::builtin_techniques;
use crate::technique::Technique;

/// Maximum number of techniques returned by [`recommend`].
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Pain-point keyword to technique ids, in match priority order.
pub const PAIN_POINTS: &[(&str, &[&str])] = &[
    (
        "anxiety",
        &["box-breathing", "physiological-sigh", "coherence-breathing"],
    ),
    ("sleep", &["4-7-8-breathing", "buteyko-method"]),
    ("focus", &["extended-exhalation", "coherence-breathing"]),
    ("energy", &["wim-hof-breathing"]),
    ("stress", &["box-breathing", "physiological-sigh"]),
    (
        "overwhelmed",
        &["extended-exhalation", "coherence-breathing"],
    ),
    ("tired", &["wim-hof-breathing"]),
    ("restless", &["4-7-8-breathing", "buteyko-method"]),
];

/// Keywords from [`PAIN_POINTS`] contained in `input` (case-insensitive).
pub fn matched_keywords(input: &str) -> Vec<&'static str> {
    let input = input.to_lowercase();
    PAIN_POINTS
        .iter()
        .map(|(keyword, _)| *keyword)
        .filter(|keyword| input.contains(keyword))
        .collect()
}

/// Recommend up to three techniques for a free-text description.
///
/// With no keyword match the first three catalog entries are returned.
pub fn recommend(input: &str) -> Vec<Technique> {
    let catalog = builtin_techniques();
    let keywords = matched_keywords(input);

    if keywords.is_empty() {
        log::debug!("No pain-point keyword in input, using default recommendations");
        return catalog.into_iter().take(MAX_RECOMMENDATIONS).collect();
    }

    let mut ids: Vec<&str> = Vec::new();
    for keyword in keywords {
        let mapped = PAIN_POINTS
            .iter()
            .find(|(k, _)| *k == keyword)
            .map(|(_, ids)| *ids)
            .unwrap_or_default();
        for id in mapped {
            if !ids.contains(id) {
                ids.push(id);
            }
        }
    }

    ids.into_iter()
        .filter_map(|id| catalog.iter().find(|t| t.id == id).cloned())
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(techniques: &[Technique]) -> Vec<&str> {
        techniques.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn no_match_returns_first_three() {
        let rec = recommend("just curious");
        assert_eq!(
            ids(&rec),
            vec!["box-breathing", "physiological-sigh", "coherence-breathing"]
        );
    }

    #[test]
    fn single_keyword_case_insensitive() {
        let rec = recommend("I can't SLEEP at all");
        assert_eq!(ids(&rec), vec!["4-7-8-breathing", "buteyko-method"]);
    }

    #[test]
    fn multiple_keywords_dedupe_and_truncate() {
        // sleep -> 4-7-8, buteyko; focus -> extended, coherence
        let rec = recommend("tired, need focus and sleep");
        assert_eq!(rec.len(), MAX_RECOMMENDATIONS);
        assert_eq!(
            ids(&rec),
            vec!["4-7-8-breathing", "buteyko-method", "extended-exhalation"]
        );
    }

    #[test]
    fn overlapping_keywords_do_not_duplicate() {
        let rec = recommend("stress and anxiety");
        assert_eq!(
            ids(&rec),
            vec!["box-breathing", "physiological-sigh", "coherence-breathing"]
        );
    }

    #[test]
    fn substring_matching() {
        // "stressed" contains "stress"
        assert_eq!(matched_keywords("I'm stressed"), vec!["stress"]);
    }
}
