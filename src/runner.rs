//! Command orchestration shared by the binary and integration tests.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::contacts::ContactNormalizer;
use crate::pages::{Page, discover_pages};
use crate::repair::LinkRepairer;
use crate::rewriter::{FileRewriter, RewriteOutcome};

/// Options for one image repair run.
#[derive(Debug, Clone)]
pub struct ImageFixOptions {
    /// Directory scanned (recursively) for HTML pages.
    pub root: PathBuf,
    /// Images directory; auto-detected under `root` when `None`.
    pub images_dir: Option<PathBuf>,
    /// Emit `images/...` rather than `/images/...`.
    pub relative: bool,
    /// Report without writing anything.
    pub dry_run: bool,
}

/// Options for one contact normalisation run.
#[derive(Debug, Clone)]
pub struct ContactOptions {
    /// Directory scanned for HTML pages.
    pub root: PathBuf,
    /// Scan subdirectories too; otherwise only top-level pages.
    pub recursive: bool,
    /// Report without writing anything.
    pub dry_run: bool,
}

/// Per-page result of a run.
#[derive(Debug, Clone)]
pub struct PageReport {
    /// Page location.
    pub path: PathBuf,
    /// Number of edits made (or that would be made) to the page.
    pub changes: usize,
    /// What the rewriter did with the page.
    pub outcome: RewriteOutcome,
}

/// Aggregate result of a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of pages read.
    pub pages_scanned: usize,
    /// Pages with at least one change, in processing order.
    pub changed: Vec<PageReport>,
}

impl RunSummary {
    /// Total edits across all pages.
    pub fn total_changes(&self) -> usize {
        self.changed.iter().map(|report| report.changes).sum()
    }
}

/// Build the image catalog, then repair and rewrite every page under `options.root`.
///
/// Configuration problems (no usable images directory) fail before any page is read.
pub fn fix_images(config: &SiteConfig, options: &ImageFixOptions) -> Result<RunSummary> {
    let images_dir = config
        .images
        .resolve_images_dir(&options.root, options.images_dir.as_deref())?;
    let catalog = Catalog::build(&images_dir, &config.images.extensions)?;
    crate::log!("images"; "{} images catalogued in {}", catalog.len(), images_dir.display());

    let repairer = LinkRepairer::new(&catalog, &config.images, options.relative)?;
    let rewriter = FileRewriter::new(&config.backup_suffix, options.dry_run);
    let pages = discover_pages(&options.root, true)?;

    process_pages(&options.root, &pages, &rewriter, "images", |text| {
        let outcome = repairer.repair(text);
        (outcome.text, outcome.changes)
    })
}

/// Normalise contact links, footer and structured data on every page under `options.root`.
pub fn fix_contacts(config: &SiteConfig, options: &ContactOptions) -> Result<RunSummary> {
    let normalizer = ContactNormalizer::new(&config.contacts)?;
    let rewriter = FileRewriter::new(&config.backup_suffix, options.dry_run);
    let pages = discover_pages(&options.root, options.recursive)?;

    process_pages(&options.root, &pages, &rewriter, "contacts", |text| {
        let outcome = normalizer.normalize(text);
        let changes = outcome.changes();
        (outcome.text, changes)
    })
}

fn process_pages<F>(
    root: &Path,
    pages: &[PathBuf],
    rewriter: &FileRewriter,
    module: &str,
    transform: F,
) -> Result<RunSummary>
where
    F: Fn(&str) -> (String, usize),
{
    let mut summary = RunSummary::default();
    let tag = if rewriter.is_dry_run() { "dry-run" } else { module };

    for path in pages {
        let page = Page::read(path)?;
        summary.pages_scanned += 1;

        let (text, changes) = transform(&page.text);
        let outcome = rewriter.apply(&page.path, &page.original, &text, changes)?;
        if changes == 0 {
            continue;
        }

        let shown = path.strip_prefix(root).unwrap_or(path);
        crate::log!(tag; "{}: {} change(s)", shown.display(), changes);
        if let RewriteOutcome::Written { backup: Some(backup) } = &outcome {
            crate::debug!(module; "backup written to {}", backup.display());
        }

        summary.changed.push(PageReport {
            path: path.clone(),
            changes,
            outcome,
        });
    }

    Ok(summary)
}
