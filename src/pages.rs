//! Discovery and tolerant decoding of HTML pages.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

const PAGE_EXTENSIONS: [&str; 2] = ["html", "htm"];

/// A page read from disk, keeping the raw bytes for backups.
#[derive(Debug, Clone)]
pub struct Page {
    /// Location of the page.
    pub path: PathBuf,
    /// Bytes exactly as read.
    pub original: Vec<u8>,
    /// Decoded text with malformed UTF-8 sequences dropped.
    pub text: String,
}

impl Page {
    /// Read and decode a page.
    pub fn read(path: &Path) -> Result<Self> {
        let original =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let text = decode_lossy(&original);
        Ok(Self {
            path: path.to_path_buf(),
            original,
            text,
        })
    }
}

/// Find HTML pages under `root`, in file-name order.
///
/// Hidden directories are skipped. With `recursive` unset only the top level is searched.
pub fn discover_pages(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut pages = Vec::new();
    for entry in walker.into_iter().filter_entry(|entry| !is_hidden(entry)) {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file() && is_page(entry.path()) {
            pages.push(entry.into_path());
        }
    }

    Ok(pages)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_page(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            PAGE_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

/// Decode UTF-8, silently dropping any malformed byte sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    let mut rest = bytes;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                return text;
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match err.error_len() {
                    Some(len) => rest = &after[len..],
                    None => return text,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn drops_invalid_sequences() {
        let bytes = b"caf\xc3\xa9 \xff\xfeok \xe2\x82";
        assert_eq!(decode_lossy(bytes), "café ok ");
    }

    #[test]
    fn valid_text_is_unchanged() {
        assert_eq!(decode_lossy("<p>héllo</p>".as_bytes()), "<p>héllo</p>");
    }

    #[test]
    fn discovers_pages_and_skips_hidden_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("blog")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("index.html"), "").unwrap();
        fs::write(root.join("about.HTM"), "").unwrap();
        fs::write(root.join("index.html.bak"), "").unwrap();
        fs::write(root.join("blog/post.html"), "").unwrap();
        fs::write(root.join(".git/hook.html"), "").unwrap();

        let all = discover_pages(root, true).unwrap();
        let names: Vec<String> = all
            .iter()
            .map(|path| path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["about.HTM", "blog/post.html", "index.html"]);

        let top = discover_pages(root, false).unwrap();
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn reads_original_bytes_and_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, b"<p>\xffhi</p>").unwrap();

        let page = Page::read(&path).unwrap();
        assert_eq!(page.original, b"<p>\xffhi</p>");
        assert_eq!(page.text, "<p>hi</p>");
    }
}
