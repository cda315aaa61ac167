//! Locate image references in HTML/CSS text and repair the broken ones against a [`Catalog`].
//!
//! References are found with text patterns rather than a markup parser, so hand-edited or
//! malformed pages are handled the same way as well-formed ones. Each candidate value goes
//! through [`LinkRepairer::resolve`], which tries an exact file name match, then truncation
//! after the first image extension, then fuzzy slug matching.

mod filters;
mod fuzzy;
mod resolve;
mod scan;

use anyhow::Result;

use crate::catalog::Catalog;
use crate::config::ImageSettings;

pub use filters::{
    has_foreign_extension, looks_like_image_reference, should_ignore_reference,
    strip_query_and_fragment,
};
pub use fuzzy::{FuzzyMatch, NoiseFilter, best_match, similarity};
pub use resolve::{MatchKind, Resolution, truncate_after_extension};
pub use scan::RepairOutcome;

/// Repairs image references in page text using a read-only catalog.
#[derive(Debug, Clone)]
pub struct LinkRepairer<'c> {
    catalog: &'c Catalog,
    prefix: String,
    web_root: String,
    relative: bool,
    extensions: Vec<String>,
    threshold: f32,
    noise: NoiseFilter,
}

impl<'c> LinkRepairer<'c> {
    /// Create a repairer. `relative` selects `images/...` over `/images/...` output.
    pub fn new(catalog: &'c Catalog, settings: &ImageSettings, relative: bool) -> Result<Self> {
        Ok(Self {
            catalog,
            prefix: settings.web_prefix(relative),
            web_root: settings.web_root.clone(),
            relative,
            extensions: settings
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            threshold: settings.fuzzy_threshold,
            noise: NoiseFilter::new(&settings.noise_tokens)?,
        })
    }

    /// Canonical prefix every rewritten reference starts with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
