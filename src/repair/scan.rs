use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::LinkRepairer;
use super::filters::looks_like_image_reference;

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\b(src|srcset|href)(\s*=\s*)(?:"([^"]*)"|'([^']*)')"#)
            .expect("invalid attribute regex")
    })
}

fn css_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)(url\(\s*)(?:"([^"]*)"|'([^']*)'|([^"')\s]+))(\s*\))"#)
            .expect("invalid css url regex")
    })
}

/// Result of repairing one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    /// Page text with repaired references.
    pub text: String,
    /// Number of individual references that were rewritten.
    pub changes: usize,
}

impl LinkRepairer<'_> {
    /// Repair every eligible `src`, `srcset`, `href` and CSS `url()` reference in `html`.
    ///
    /// `src` and `srcset` values are always considered. `href` and `url()` values are only
    /// considered when they already look like image references. Values naming a non-image
    /// file are never rewritten. The original quote style of each occurrence is kept.
    pub fn repair(&self, html: &str) -> RepairOutcome {
        let mut changes = 0;

        let text = attribute_pattern()
            .replace_all(html, |caps: &Captures| {
                self.repair_attribute(caps, &mut changes)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();

        let text = css_url_pattern()
            .replace_all(&text, |caps: &Captures| {
                self.repair_css_url(caps, &mut changes)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();

        RepairOutcome { text, changes }
    }

    fn repair_attribute(&self, caps: &Captures, changes: &mut usize) -> Option<String> {
        let attribute = &caps[1];
        let (value, quote) = match (caps.get(3), caps.get(4)) {
            (Some(value), _) => (value.as_str(), '"'),
            (None, Some(value)) => (value.as_str(), '\''),
            (None, None) => return None,
        };

        let repaired = match attribute.to_ascii_lowercase().as_str() {
            "srcset" => self.repair_srcset(value, changes)?,
            "href" if !self.is_image_reference(value) => return None,
            _ => self.repair_value(value, changes)?,
        };

        Some(format!("{attribute}{}{quote}{repaired}{quote}", &caps[2]))
    }

    fn repair_css_url(&self, caps: &Captures, changes: &mut usize) -> Option<String> {
        let (value, quote) = match (caps.get(2), caps.get(3), caps.get(4)) {
            (Some(value), _, _) => (value.as_str(), "\""),
            (None, Some(value), _) => (value.as_str(), "'"),
            (None, None, Some(value)) => (value.as_str(), ""),
            _ => return None,
        };

        if !self.is_image_reference(value) {
            return None;
        }
        let repaired = self.repair_value(value, changes)?;

        Some(format!("{}{quote}{repaired}{quote}{}", &caps[1], &caps[5]))
    }

    /// Repair each comma-separated descriptor independently, keeping size/density tokens.
    fn repair_srcset(&self, value: &str, changes: &mut usize) -> Option<String> {
        // Data URIs contain commas that are not descriptor separators.
        if value.to_ascii_lowercase().contains("data:") {
            return None;
        }

        let mut changed = false;
        let mut entries = Vec::new();

        for entry in value.split(',') {
            let lead = entry.len() - entry.trim_start().len();
            let body = &entry[lead..];
            let url_end = body.find(char::is_whitespace).unwrap_or(body.len());
            let (url, descriptor) = body.split_at(url_end);

            match self.repair_value(url, changes) {
                Some(repaired) => {
                    changed = true;
                    entries.push(format!("{}{repaired}{descriptor}", &entry[..lead]));
                }
                None => entries.push(entry.to_string()),
            }
        }

        changed.then(|| entries.join(","))
    }

    fn repair_value(&self, value: &str, changes: &mut usize) -> Option<String> {
        let resolution = self.resolve(value)?;
        *changes += 1;
        crate::debug!("repair"; "{value} -> {} ({})", resolution.value, resolution.kind);
        Some(resolution.value)
    }

    fn is_image_reference(&self, value: &str) -> bool {
        looks_like_image_reference(value, &self.web_root, &self.extensions)
    }
}
