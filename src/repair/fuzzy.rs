//! Approximate matching of slugs against the catalog.

use anyhow::{Context, Result};
use regex::Regex;
use similar::TextDiff;

use crate::catalog::{Catalog, slugify};

/// Similarity ratio in `0.0..=1.0`: twice the matched characters over the combined length.
///
/// Matches are counted from a Myers diff, so a few borderline pairs score slightly higher
/// than with Ratcliff/Obershelp matching blocks.
pub fn similarity(a: &str, b: &str) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    TextDiff::from_chars(a, b).ratio()
}

/// Best scoring catalog entry for a slug.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'c> {
    /// Catalog slug that matched.
    pub slug: &'c str,
    /// File name mapped to that slug.
    pub name: &'c str,
    /// Similarity ratio of the match.
    pub score: f32,
}

/// Find the highest scoring slug at or above `threshold`. Ties keep the earliest slug.
pub fn best_match<'c>(query: &str, catalog: &'c Catalog, threshold: f32) -> Option<FuzzyMatch<'c>> {
    let mut best: Option<FuzzyMatch<'c>> = None;

    for (slug, name) in catalog.slugs() {
        let score = similarity(query, slug);
        if score < threshold {
            continue;
        }
        if best.as_ref().is_none_or(|current| score > current.score) {
            best = Some(FuzzyMatch { slug, name, score });
        }
    }

    best
}

/// Removes runs of known noise tokens from a slug before matching.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    pattern: Option<Regex>,
}

impl NoiseFilter {
    /// Compile a filter for the given tokens; an empty list filters nothing.
    pub fn new(tokens: &[String]) -> Result<Self> {
        let alternatives: Vec<String> = tokens
            .iter()
            .map(|token| token.trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .map(|token| regex::escape(&token))
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let source = format!("(?:{})+", alternatives.join("|"));
        let pattern = Regex::new(&source)
            .with_context(|| format!("failed to compile noise token pattern {source}"))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Strip noise from `slug` and re-normalise what is left.
    pub fn clean(&self, slug: &str) -> String {
        match &self.pattern {
            Some(pattern) => slugify(&pattern.replace_all(slug, "")),
            None => slug.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_slugs_score_one() {
        assert!((similarity("minneapolis-skyline", "minneapolis-skyline") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_slugs_score_zero() {
        assert!(similarity("abc", "xyz") < 1e-6);
    }

    #[test]
    fn picks_closest_slug_above_threshold() {
        let catalog = Catalog::from_names(["team-photo.jpg", "office.png", "teamwork.webp"]);
        let found = best_match("team-photos", &catalog, 0.6).unwrap();
        assert_eq!(found.name, "team-photo.jpg");
        assert!(found.score > 0.9);
    }

    #[test]
    fn ratio_equal_to_threshold_is_accepted() {
        let catalog = Catalog::from_names(["abcxyzw.png"]);
        assert!((similarity("abc", "abcxyzw") - 0.6).abs() < 1e-6);

        let found = best_match("abc", &catalog, 0.6).unwrap();
        assert_eq!(found.name, "abcxyzw.png");
        assert!(best_match("abc", &catalog, 0.61).is_none());
    }

    #[test]
    fn rejects_matches_below_threshold() {
        let catalog = Catalog::from_names(["office.png"]);
        assert!(best_match("zebra-crossing", &catalog, 0.6).is_none());
    }

    #[test]
    fn removes_repeated_noise_tokens() {
        let filter = NoiseFilter::new(&["xresdefault".to_string()]).unwrap();
        assert_eq!(filter.clean("thumbnailxresdefaultxresdefault"), "thumbnail");
        assert_eq!(filter.clean("clip-xresdefault-2"), "clip-2");
    }

    #[test]
    fn empty_noise_list_is_identity() {
        let filter = NoiseFilter::new(&[]).unwrap();
        assert_eq!(filter.clean("clip-xresdefault"), "clip-xresdefault");
    }
}
