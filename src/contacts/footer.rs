//! The standard contact footer block and its placement.

use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

use crate::catalog::slugify;
use crate::config::ContactSettings;

/// Block id used by an older generation of the footer; always removed.
pub const LEGACY_FOOTER_ID: &str = "auto-contacts";

const SUBJECT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'.')
  .remove(b'_')
  .remove(b'~');

/// Element id of the footer block for an organization, e.g. `contacts-acme`.
pub fn footer_id(organization: &str) -> String {
  format!("contacts-{}", slugify(organization))
}

/// Render the footer block listing one mail link per configured footer entry.
pub fn render_footer(settings: &ContactSettings) -> String {
  let name = escape_html(&settings.organization);
  let links: Vec<String> = settings
    .footer_links
    .iter()
    .map(|link| {
      let address = format!("{}@{}", link.local, settings.domain);
      let subject = link.subject.replace("{name}", &settings.organization);
      format!(
        r#"<a href="mailto:{address}?subject={}">{address}</a>"#,
        utf8_percent_encode(&subject, SUBJECT_ENCODE_SET)
      )
    })
    .collect();

  format!(
    r#"<div id="{id}" style="margin-top:1.25rem;font-size:.95rem;line-height:1.5">
  <strong>Contact {name}:</strong>
  {links}
</div>"#,
    id = footer_id(&settings.organization),
    links = links.join(" &middot;\n  "),
  )
}

/// Removes earlier footer blocks and inserts the current one.
#[derive(Debug, Clone)]
pub struct FooterPlacer {
  block: String,
  stale_blocks: Vec<Regex>,
  footer_close: Regex,
  body_close: Regex,
}

impl FooterPlacer {
  /// Prepare a placer for `block`, whose element id is `id`.
  pub fn new(block: String, id: &str) -> Result<Self> {
    let stale_blocks = [LEGACY_FOOTER_ID, id]
      .iter()
      .map(|block_id| {
        let source = format!(r#"(?is)<div id="{}".*?</div>\s*"#, regex::escape(block_id));
        Regex::new(&source).with_context(|| format!("failed to compile footer pattern {source}"))
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Self {
      block,
      stale_blocks,
      footer_close: Regex::new(r"(?i)</footer>").expect("invalid footer regex"),
      body_close: Regex::new(r"(?i)</body>").expect("invalid body regex"),
    })
  }

  /// Place the block before `</footer>`, else before `</body>`, else at the end of the page.
  pub fn place(&self, html: &str) -> String {
    let mut text = html.to_string();
    for pattern in &self.stale_blocks {
      text = pattern.replace_all(&text, "").into_owned();
    }

    let anchor = self
      .footer_close
      .find(&text)
      .or_else(|| self.body_close.find(&text))
      .map(|found| found.start());

    match anchor {
      Some(index) => format!("{}{}\n{}", &text[..index], self.block, &text[index..]),
      None => format!("{}\n{}\n", text.trim_end(), self.block),
    }
  }
}

fn escape_html(value: &str) -> String {
  value
    .replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn settings() -> ContactSettings {
    ContactSettings {
      domain: "acme.org".into(),
      organization: "Acme Co".into(),
      ..ContactSettings::default()
    }
  }

  fn placer() -> FooterPlacer {
    let settings = settings();
    FooterPlacer::new(render_footer(&settings), &footer_id(&settings.organization)).unwrap()
  }

  #[test]
  fn renders_links_with_encoded_subjects() {
    let block = render_footer(&settings());
    assert!(block.starts_with(r#"<div id="contacts-acme-co""#));
    assert!(block.contains("<strong>Contact Acme Co:</strong>"));
    assert!(block.contains(
      r#"<a href="mailto:hello@acme.org?subject=General%20Inquiry%20-%20Acme%20Co">hello@acme.org</a> &middot;"#
    ));
    assert!(block.ends_with("</div>"));
  }

  #[test]
  fn inserts_before_footer_close() {
    let html = "<body><footer><p>c</p>\n</footer></body>";
    let placed = placer().place(html);
    assert!(placed.contains("</div>\n</footer>"));
    assert!(placed.starts_with("<body><footer><p>c</p>\n<div id=\"contacts-acme-co\""));
  }

  #[test]
  fn falls_back_to_body_then_end() {
    let placer = placer();
    let in_body = placer.place("<body><p>x</p></BODY>");
    assert!(in_body.ends_with("</div>\n</BODY>"));

    let appended = placer.place("<p>x</p>\n\n");
    assert!(appended.starts_with("<p>x</p>\n<div"));
    assert!(appended.ends_with("</div>\n"));
  }

  #[test]
  fn replaces_stale_blocks_and_is_idempotent() {
    let placer = placer();
    let html = "<footer><div id=\"auto-contacts\">old</div>\n</footer>";
    let once = placer.place(html);
    assert!(!once.contains("auto-contacts"));
    assert_eq!(placer.place(&once), once);

    let appended = placer.place("<p>no anchors</p>");
    assert_eq!(placer.place(&appended), appended);
  }
}
