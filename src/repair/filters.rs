use regex::Regex;

fn skipped_reference_prefix() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:https?:|data:|mailto:|#)").expect("invalid skipped-prefix regex")
    })
}

/// Determine whether a reference must never be rewritten.
///
/// Remote URLs, data URIs, mail links and in-page anchors point at something other than a
/// local image file, so no catalog entry can ever be a correct replacement for them.
pub fn should_ignore_reference(value: &str) -> bool {
    skipped_reference_prefix().is_match(value.trim_start())
}

/// Drop a trailing query string and/or fragment from a reference.
pub fn strip_query_and_fragment(value: &str) -> &str {
    match value.find(['?', '#']) {
        Some(index) => &value[..index],
        None => value,
    }
}

/// Whether an `href` or CSS `url()` value looks like an image reference worth repairing.
///
/// A value qualifies when it already passes through the images directory or already ends in
/// one of the recognised image extensions.
pub fn looks_like_image_reference(value: &str, web_root: &str, extensions: &[String]) -> bool {
    let path = strip_query_and_fragment(value.trim()).to_ascii_lowercase();
    let web_root = web_root.trim_matches('/').to_ascii_lowercase();

    if !web_root.is_empty() {
        let segment = format!("{web_root}/");
        if path.starts_with(&segment) || path.contains(&format!("/{segment}")) {
            return true;
        }
    }

    extensions
        .iter()
        .any(|ext| path.ends_with(&format!(".{}", ext.to_ascii_lowercase())))
}

/// Whether a file name carries an extension but no image extension anywhere in it.
///
/// `app.js` and `clip.mp4` are foreign; `photo.jpg~1` and extensionless `logo` are not.
pub fn has_foreign_extension(name: &str, extensions: &[String]) -> bool {
    let name = name.to_ascii_lowercase();
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => !extensions
            .iter()
            .any(|allowed| name.contains(&format!(".{}", allowed.to_ascii_lowercase()))),
        _ => false,
    }
}
