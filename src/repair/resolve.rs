use std::borrow::Cow;
use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::catalog::{file_stem, slugify};

use super::LinkRepairer;
use super::filters::{has_foreign_extension, should_ignore_reference, strip_query_and_fragment};
use super::fuzzy::best_match;

/// Bytes escaped when a catalog file name is written into a reference. Whitespace and commas
/// would split a `srcset` entry; quotes and parentheses would end an attribute or `url()`.
const NAME_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b',')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// How a reference was matched to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    /// The file name is a known catalog name.
    Exact,
    /// The name had trailing garbage after a valid image extension.
    Truncated,
    /// The slug was close enough to a catalog slug.
    Fuzzy {
        /// Similarity ratio of the accepted match.
        score: f32,
    },
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Exact => f.write_str("exact"),
            MatchKind::Truncated => f.write_str("truncated"),
            MatchKind::Fuzzy { score } => write!(f, "fuzzy {score:.2}"),
        }
    }
}

/// A replacement value for a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// New reference text, always the canonical prefix plus a percent-encoded catalog file name.
    pub value: String,
    /// Strategy that produced it.
    pub kind: MatchKind,
}

impl LinkRepairer<'_> {
    /// Resolve a single reference value, returning `None` when it should stay as it is.
    ///
    /// Values naming a non-image file (`app.js`) are never resolved. A value that already
    /// equals its canonical form also yields `None`, which keeps a second pass over repaired
    /// text free of changes.
    pub fn resolve(&self, value: &str) -> Option<Resolution> {
        let trimmed = value.trim();
        if trimmed.is_empty() || should_ignore_reference(trimmed) {
            return None;
        }

        let mut path = strip_query_and_fragment(trimmed);
        if self.relative {
            path = path.strip_prefix('/').unwrap_or(path);
        }

        let name = path.rsplit('/').next().unwrap_or(path);
        if name.is_empty() {
            return None;
        }
        let name = percent_decode_str(name)
            .decode_utf8()
            .unwrap_or(Cow::Borrowed(name));
        if has_foreign_extension(&name, &self.extensions) {
            return None;
        }

        let (matched, kind) = self.match_name(&name)?;
        let candidate = format!(
            "{}{}",
            self.prefix,
            utf8_percent_encode(&matched, NAME_ENCODE_SET)
        );
        if candidate == value {
            return None;
        }

        Some(Resolution {
            value: candidate,
            kind,
        })
    }

    fn match_name(&self, name: &str) -> Option<(String, MatchKind)> {
        if self.catalog.contains_name(name) {
            return Some((name.to_string(), MatchKind::Exact));
        }

        if let Some(truncated) = truncate_after_extension(name, &self.extensions) {
            if truncated != name && self.catalog.contains_name(truncated) {
                return Some((truncated.to_string(), MatchKind::Truncated));
            }
        }

        let slug = self.noise.clean(&slugify(file_stem(name)));
        if slug.is_empty() {
            return None;
        }

        best_match(&slug, self.catalog, self.threshold)
            .map(|found| (found.name.to_string(), MatchKind::Fuzzy { score: found.score }))
    }
}

/// Cut `name` right after the first occurrence of any `.ext` in `extensions` (case-insensitive).
pub fn truncate_after_extension<'a>(name: &'a str, extensions: &[String]) -> Option<&'a str> {
    let lowered = name.to_ascii_lowercase();
    let mut earliest: Option<(usize, usize)> = None;

    for ext in extensions {
        let needle = format!(".{}", ext.to_ascii_lowercase());
        if let Some(start) = lowered.find(&needle) {
            let end = start + needle.len();
            let better = match earliest {
                Some((best_start, best_end)) => {
                    start < best_start || (start == best_start && end > best_end)
                }
                None => true,
            };
            if better {
                earliest = Some((start, end));
            }
        }
    }

    earliest.map(|(_, end)| &name[..end])
}
