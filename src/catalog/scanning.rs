//! Directory walking for harvesting image files.

use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use super::ImageFile;
use super::slug::{file_stem, slugify};

/// Walk `root` recursively, returning every regular file whose extension is allowed.
///
/// Entries are visited in file-name order so the resulting list, and therefore the slug
/// tie-break, is the same on every platform.
pub fn collect_image_files(root: &Path, extensions: &[String]) -> Result<Vec<ImageFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("failed to walk images directory {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if !has_allowed_extension(&name, extensions) {
            continue;
        }

        let slug = slugify(file_stem(&name));
        files.push(ImageFile {
            path: entry.path().to_path_buf(),
            name,
            slug,
        });
    }

    Ok(files)
}

/// Case-insensitive check of a file name's final extension against the allow-list.
pub fn has_allowed_extension(name: &str, extensions: &[String]) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(ext))
}
