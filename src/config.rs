//! Site configuration loader describing image layout, contact roles and backup naming.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// File name searched for in the scan root when no explicit config is given.
pub const DEFAULT_CONFIG_FILE: &str = "sitefix.json";

/// Discoverable configuration shared by every command.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Settings for the image reference repair.
    pub images: ImageSettings,
    /// Settings for the contact normaliser.
    pub contacts: ContactSettings,
    /// Suffix appended to a page's file name to form its backup path.
    pub backup_suffix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            images: ImageSettings::default(),
            contacts: ContactSettings::default(),
            backup_suffix: ".bak".into(),
        }
    }
}

/// Image catalog and matching parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Directory name used as the canonical web prefix for rewritten references.
    pub web_root: String,
    /// Directories, relative to the scan root, probed when no images directory is given.
    pub candidate_dirs: Vec<String>,
    /// File extensions (without the dot) recognised as images.
    pub extensions: Vec<String>,
    /// Minimum similarity ratio accepted by fuzzy name matching.
    pub fuzzy_threshold: f32,
    /// Tokens stripped from slugs before fuzzy matching.
    pub noise_tokens: Vec<String>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            web_root: "images".into(),
            candidate_dirs: vec![
                "images".into(),
                "assets/images".into(),
                "img".into(),
                "static/images".into(),
            ],
            extensions: ["jpg", "jpeg", "png", "webp", "gif", "svg", "avif"]
                .into_iter()
                .map(String::from)
                .collect(),
            fuzzy_threshold: 0.6,
            noise_tokens: vec!["xresdefault".into()],
        }
    }
}

/// A footer link pointing at one canonical mailbox.
#[derive(Debug, Clone, Deserialize)]
pub struct FooterLink {
    /// Canonical local part, e.g. `support`.
    pub local: String,
    /// Subject line; `{name}` is replaced with the organization name.
    pub subject: String,
}

/// Contact normalisation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    /// Domain every known role address is rewritten to.
    pub domain: String,
    /// Organization name shown in the footer and structured data.
    pub organization: String,
    /// Lower-case local part alias mapped to its canonical local part.
    pub role_map: BTreeMap<String, String>,
    /// Links rendered in the injected footer block, in order.
    pub footer_links: Vec<FooterLink>,
    /// Whether to inject an Organization JSON-LD block into `<head>`.
    pub structured_data: bool,
}

impl Default for ContactSettings {
    fn default() -> Self {
        let role_map = [
            ("hello", "hello"),
            ("contact", "hello"),
            ("info", "hello"),
            ("support", "support"),
            ("help", "support"),
            ("security", "security"),
            ("press", "press"),
            ("media", "press"),
            ("billing", "billing"),
            ("sales", "billing"),
            ("abuse", "abuse"),
            ("postmaster", "postmaster"),
        ]
        .into_iter()
        .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
        .collect();

        let footer_links = [
            ("hello", "General Inquiry - {name}"),
            ("support", "Support Request - {name}"),
            ("security", "Vulnerability Disclosure - {name}"),
            ("press", "Media Inquiry - {name}"),
            ("billing", "Billing Question - {name}"),
        ]
        .into_iter()
        .map(|(local, subject)| FooterLink {
            local: local.into(),
            subject: subject.into(),
        })
        .collect();

        Self {
            domain: "ethicops.org".into(),
            organization: "EthicOps".into(),
            role_map,
            footer_links,
            structured_data: true,
        }
    }
}

impl SiteConfig {
    /// Load `sitefix.json` from the scan root, falling back to defaults when it is absent.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        if !candidate.is_file() {
            return Ok(Self::default());
        }
        Self::from_path(&candidate)
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ImageSettings {
    /// Pick the images directory: the explicit one if given, else the first existing candidate.
    pub fn resolve_images_dir(
        &self,
        root: &Path,
        explicit: Option<&Path>,
    ) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            if path.is_dir() {
                return Ok(path.to_path_buf());
            }
            return Err(ConfigError::ImagesDirNotFound {
                path: path.to_path_buf(),
            });
        }

        self.candidate_dirs
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.is_dir())
            .ok_or_else(|| ConfigError::NoImagesDir {
                root: root.to_path_buf(),
                candidates: self.candidate_dirs.clone(),
            })
    }

    /// Web prefix for rewritten references, root-relative or absolute-from-site-root.
    pub fn web_prefix(&self, relative: bool) -> String {
        let root = self.web_root.trim_matches('/');
        if relative {
            format!("{root}/")
        } else {
            format!("/{root}/")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = SiteConfig::discover(dir.path()).unwrap();
        assert_eq!(config.images.web_root, "images");
        assert_eq!(config.backup_suffix, ".bak");
        assert!((config.images.fuzzy_threshold - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.contacts.domain, "ethicops.org");
        assert_eq!(config.contacts.organization, "EthicOps");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            r#"{ "images": { "fuzzy_threshold": 0.8 }, "contacts": { "domain": "acme.test" } }"#,
        )
        .unwrap();

        let config = SiteConfig::discover(dir.path()).unwrap();
        assert!((config.images.fuzzy_threshold - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.images.noise_tokens, vec!["xresdefault".to_string()]);
        assert_eq!(config.contacts.domain, "acme.test");
        assert_eq!(config.contacts.role_map.get("info").unwrap(), "hello");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
        let err = SiteConfig::discover(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_images_dir_must_exist() {
        let dir = tempdir().unwrap();
        let settings = ImageSettings::default();
        let missing = dir.path().join("nope");
        let err = settings
            .resolve_images_dir(dir.path(), Some(&missing))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ImagesDirNotFound { .. }));
    }

    #[test]
    fn detects_first_existing_candidate() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("img")).unwrap();
        fs::create_dir_all(dir.path().join("static/images")).unwrap();

        let settings = ImageSettings::default();
        let found = settings.resolve_images_dir(dir.path(), None).unwrap();
        assert_eq!(found, dir.path().join("img"));
    }

    #[test]
    fn fails_when_no_candidate_exists() {
        let dir = tempdir().unwrap();
        let err = ImageSettings::default()
            .resolve_images_dir(dir.path(), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoImagesDir { .. }));
    }

    #[test]
    fn web_prefix_respects_relative_flag() {
        let settings = ImageSettings::default();
        assert_eq!(settings.web_prefix(true), "images/");
        assert_eq!(settings.web_prefix(false), "/images/");
    }
}
