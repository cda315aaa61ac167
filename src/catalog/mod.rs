//! Read-only catalog of the image files available to a site.
//!
//! The catalog is built once per run from an images directory and then passed by reference
//! into the repair engine. Nothing downstream mutates it.

mod scanning;
mod slug;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::Result;

pub use scanning::{collect_image_files, has_allowed_extension};
pub use slug::{file_stem, slugify};

/// A single image discovered under the images directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Full path of the file on disk.
    pub path: PathBuf,
    /// File name including its extension.
    pub name: String,
    /// Normalised key derived from the extension-less name.
    pub slug: String,
}

/// Every known image, indexed by file name and by slug.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    files: Vec<ImageFile>,
    names: BTreeSet<String>,
    slugs: BTreeMap<String, String>,
}

impl Catalog {
    /// Scan `images_dir` for files with one of the allowed extensions.
    pub fn build(images_dir: &Path, extensions: &[String]) -> Result<Self> {
        let files = collect_image_files(images_dir, extensions)?;
        Ok(Self::from_files(files))
    }

    /// Index an already collected list of files. The first file wins a slug collision.
    pub fn from_files(files: Vec<ImageFile>) -> Self {
        let mut names = BTreeSet::new();
        let mut slugs = BTreeMap::new();

        for file in &files {
            names.insert(file.name.clone());
            if !file.slug.is_empty() {
                slugs
                    .entry(file.slug.clone())
                    .or_insert_with(|| file.name.clone());
            }
        }

        Self {
            files,
            names,
            slugs,
        }
    }

    /// Convenience constructor used by tests and callers that only know file names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let files = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                ImageFile {
                    path: PathBuf::from(&name),
                    slug: slugify(file_stem(&name)),
                    name,
                }
            })
            .collect();
        Self::from_files(files)
    }

    /// All catalogued files in discovery order.
    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    /// Whether a file with exactly this name is known.
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// File name mapped to a slug, if any.
    pub fn name_for_slug(&self, slug: &str) -> Option<&str> {
        self.slugs.get(slug).map(String::as_str)
    }

    /// Slug keys paired with their representative file name, in slug order.
    pub fn slugs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slugs
            .iter()
            .map(|(slug, name)| (slug.as_str(), name.as_str()))
    }

    /// Number of catalogued files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the catalog holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
