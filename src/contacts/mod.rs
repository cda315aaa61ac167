//! Contact normalisation: canonical role addresses, a standard footer and structured data.

mod footer;
mod mailto;
mod structured_data;

use std::collections::BTreeMap;

use anyhow::Result;

pub use footer::{FooterPlacer, LEGACY_FOOTER_ID, footer_id, render_footer};
pub use mailto::normalize_mailto_links;
pub use structured_data::{insert_structured_data, organization_script};

use crate::config::ContactSettings;

/// Result of normalising one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactOutcome {
  /// Updated page text.
  pub text: String,
  /// Number of `mailto:` links rewritten.
  pub mailto_changes: usize,
  /// Whether the footer block was inserted or moved.
  pub footer_changed: bool,
  /// Whether a JSON-LD block was inserted.
  pub structured_data_added: bool,
}

impl ContactOutcome {
  /// Total number of edits, zero when the page is unchanged.
  pub fn changes(&self) -> usize {
    self.mailto_changes + usize::from(self.footer_changed) + usize::from(self.structured_data_added)
  }
}

/// Applies the contact conventions of one organization to pages.
#[derive(Debug, Clone)]
pub struct ContactNormalizer {
  domain: String,
  organization: String,
  role_map: BTreeMap<String, String>,
  footer: FooterPlacer,
  structured_data: Option<String>,
}

impl ContactNormalizer {
  /// Prepare a normaliser from configuration.
  pub fn new(settings: &ContactSettings) -> Result<Self> {
    let role_map = settings
      .role_map
      .iter()
      .map(|(alias, canonical)| (alias.to_lowercase(), canonical.clone()))
      .collect();
    let footer = FooterPlacer::new(
      render_footer(settings),
      &footer_id(&settings.organization),
    )?;

    Ok(Self {
      domain: settings.domain.clone(),
      organization: settings.organization.clone(),
      role_map,
      footer,
      structured_data: settings
        .structured_data
        .then(|| organization_script(settings)),
    })
  }

  /// Normalise mail links, place the footer and add structured data, in that order.
  pub fn normalize(&self, html: &str) -> ContactOutcome {
    let (text, mailto_changes) = normalize_mailto_links(html, &self.role_map, &self.domain);

    let placed = self.footer.place(&text);
    let footer_changed = placed != text;

    let (text, structured_data_added) = match &self.structured_data {
      Some(script) => match insert_structured_data(&placed, script, &self.organization) {
        Some(updated) => (updated, true),
        None => (placed, false),
      },
      None => (placed, false),
    };

    ContactOutcome {
      text,
      mailto_changes,
      footer_changed,
      structured_data_added,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn normalizer() -> ContactNormalizer {
    ContactNormalizer::new(&ContactSettings {
      domain: "acme.org".into(),
      organization: "Acme".into(),
      ..ContactSettings::default()
    })
    .unwrap()
  }

  const PAGE: &str = r#"<html><head><title>Acme</title></head>
<body>
<a href="mailto:media@acme.gt.tc">Press</a>
<footer><p>(c) Acme</p>
</footer>
</body></html>"#;

  #[test]
  fn normalizes_a_full_page() {
    let outcome = normalizer().normalize(PAGE);

    assert_eq!(outcome.mailto_changes, 1);
    assert!(outcome.footer_changed);
    assert!(outcome.structured_data_added);
    assert_eq!(outcome.changes(), 3);
    assert!(outcome.text.contains(r#"href="mailto:press@acme.org""#));
    assert!(outcome.text.contains(r#"<div id="contacts-acme""#));
    assert!(outcome.text.contains("application/ld+json"));
  }

  #[test]
  fn second_pass_is_a_no_op() {
    let normalizer = normalizer();
    let first = normalizer.normalize(PAGE);
    let second = normalizer.normalize(&first.text);

    assert_eq!(second.changes(), 0);
    assert_eq!(second.text, first.text);
  }

  #[test]
  fn structured_data_can_be_disabled() {
    let normalizer = ContactNormalizer::new(&ContactSettings {
      structured_data: false,
      ..ContactSettings::default()
    })
    .unwrap();
    let outcome = normalizer.normalize(PAGE);
    assert!(!outcome.structured_data_added);
    assert!(!outcome.text.contains("application/ld+json"));
  }
}
