//! Organization JSON-LD injected into page heads.

use serde_json::json;

use crate::config::ContactSettings;

/// Build the `<script type="application/ld+json">` tag describing the organization.
pub fn organization_script(settings: &ContactSettings) -> String {
  let domain = &settings.domain;
  let document = json!({
    "@context": "https://schema.org",
    "@type": "Organization",
    "name": settings.organization,
    "url": format!("https://{domain}/"),
    "contactPoint": [
      {
        "@type": "ContactPoint",
        "contactType": "customer support",
        "email": format!("support@{domain}"),
      },
      {
        "@type": "ContactPoint",
        "contactType": "security",
        "email": format!("security@{domain}"),
      },
    ],
  });

  format!(r#"<script type="application/ld+json">{document}</script>"#)
}

/// Insert `script` before `</head>` unless the page already carries JSON-LD naming the organization.
///
/// Returns `None` when the page is left as it is, including pages without a `</head>` tag.
pub fn insert_structured_data(html: &str, script: &str, organization: &str) -> Option<String> {
  let lowered = html.to_ascii_lowercase();
  if lowered.contains("application/ld+json") && html.contains(organization) {
    return None;
  }

  let index = lowered.find("</head>")?;
  Some(format!("{}{}\n{}", &html[..index], script, &html[index..]))
}
