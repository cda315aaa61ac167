use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

fn mailto_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"(?i)mailto:([A-Z0-9._%+\-]+)@([A-Z0-9.\-]+\.[A-Z]{2,})(\?[^"'\s>]*)?"#)
      .expect("invalid mailto regex")
  })
}

/// Point every `mailto:` link with a known role alias at the canonical address on `domain`.
///
/// Unknown local parts are left as they are. Any query string (`?subject=...`) is kept.
/// Returns the new text and the number of links whose text actually changed.
pub fn normalize_mailto_links(
  html: &str,
  role_map: &BTreeMap<String, String>,
  domain: &str,
) -> (String, usize) {
  let mut changes = 0;

  let text = mailto_pattern()
    .replace_all(html, |caps: &Captures| {
      let original = &caps[0];
      let Some(canonical) = role_map.get(&caps[1].to_lowercase()) else {
        return original.to_string();
      };

      let query = caps.get(3).map_or("", |m| m.as_str());
      let rewritten = format!("mailto:{canonical}@{domain}{query}");
      if rewritten != original {
        changes += 1;
      }
      rewritten
    })
    .into_owned();

  (text, changes)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ContactSettings;

  fn roles() -> BTreeMap<String, String> {
    ContactSettings::default().role_map
  }

  #[test]
  fn maps_aliases_to_canonical_addresses() {
    let html = r#"<a href="mailto:Info@old-host.example.com">x</a> <a href='mailto:help@acme.io?subject=Hi%20there'>y</a>"#;
    let (text, changes) = normalize_mailto_links(html, &roles(), "acme.org");

    assert_eq!(changes, 2);
    assert_eq!(
      text,
      r#"<a href="mailto:hello@acme.org">x</a> <a href='mailto:support@acme.org?subject=Hi%20there'>y</a>"#
    );
  }

  #[test]
  fn leaves_unknown_aliases_alone() {
    let html = r#"<a href="mailto:jane.doe@acme.io">Jane</a>"#;
    let (text, changes) = normalize_mailto_links(html, &roles(), "acme.org");
    assert_eq!(changes, 0);
    assert_eq!(text, html);
  }

  #[test]
  fn canonical_addresses_are_not_counted() {
    let html = r#"<a href="mailto:security@acme.org">s</a>"#;
    let (text, changes) = normalize_mailto_links(html, &roles(), "acme.org");
    assert_eq!(changes, 0);
    assert_eq!(text, html);
  }
}
