use std::sync::OnceLock;

use regex::Regex;

struct SlugPatterns {
    separators: Regex,
    disallowed: Regex,
    hyphen_runs: Regex,
}

fn slug_patterns() -> &'static SlugPatterns {
    static PATTERNS: OnceLock<SlugPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SlugPatterns {
        separators: Regex::new(r"[\s_]+").expect("invalid separator regex"),
        disallowed: Regex::new(r"[^a-z0-9-]").expect("invalid disallowed-char regex"),
        hyphen_runs: Regex::new(r"-{2,}").expect("invalid hyphen regex"),
    })
}

/// Normalise an extension-less file name into the key used for fuzzy lookup.
///
/// Lower-cases the input, turns whitespace and underscore runs into a single hyphen, drops
/// anything outside `[a-z0-9-]`, collapses repeated hyphens and trims them from both ends.
pub fn slugify(stem: &str) -> String {
    let patterns = slug_patterns();
    let lowered = stem.to_lowercase();
    let hyphenated = patterns.separators.replace_all(&lowered, "-");
    let stripped = patterns.disallowed.replace_all(&hyphenated, "");
    let collapsed = patterns.hyphen_runs.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

/// Split a file name into its stem, dropping the last extension if there is one.
pub fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
