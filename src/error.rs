//! Typed configuration errors surfaced before any page is scanned or written.

use std::path::PathBuf;

use thiserror::Error;

/// Errors caused by an unusable configuration rather than by page content.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly supplied images directory does not exist or is not a directory.
    #[error("images directory not found: {}", path.display())]
    ImagesDirNotFound {
        /// Path that was supplied.
        path: PathBuf,
    },
    /// No images directory was supplied and none of the conventional candidates exist.
    #[error(
        "no images directory found under {} (tried: {}); pass --images-dir",
        root.display(),
        candidates.join(", ")
    )]
    NoImagesDir {
        /// Scan root the candidates were resolved against.
        root: PathBuf,
        /// Candidate directories that were tried, in order.
        candidates: Vec<String>,
    },
    /// An explicitly named configuration file could not be read.
    #[error("failed to read config file {}", path.display())]
    Read {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A configuration file was found but is not valid JSON for [`crate::config::SiteConfig`].
    #[error("failed to parse config file {}", path.display())]
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        #[source]
        source: serde_json::Error,
    },
}
