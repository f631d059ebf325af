// Discovery of static HTML pages already on disk

use std::path::{Component, Path};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Pages named like this are served at their directory URL and are skipped
pub const INDEX_FILE: &str = "index.html";

/// Which directories to walk and which names to leave out
pub struct ScanOptions<'a> {
    /// Directories relative to the root, walked in order
    pub include_dirs: &'a [std::path::PathBuf],
    /// File and directory names excluded wherever they appear
    pub exclude: &'a [String],
}

/// Find HTML pages under `root` and return their root-relative URL paths.
///
/// Hidden directories and excluded names are pruned, `index.html` files are
/// skipped, and missing include directories are ignored. Paths come back in
/// walk order (file-name order within each directory) and may repeat when
/// include directories overlap.
///
/// ```text
/// root/about.html           → "/about.html"
/// root/category/world.html  → "/category/world.html"
/// root/index.html           → skipped
/// root/.git/x.html          → pruned
/// ```
pub fn discover_pages(root: &Path, options: &ScanOptions<'_>) -> Vec<String> {
    let mut pages = Vec::new();

    for dir in options.include_dirs {
        let start = root.join(dir);
        if !start.is_dir() {
            debug!(dir = %start.display(), "Include directory missing, skipping");
            continue;
        }

        let walker = WalkDir::new(&start)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_pruned_dir(e, options.exclude));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable path");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if options.exclude.iter().any(|x| x.as_str() == name) || name == INDEX_FILE {
                continue;
            }
            if !is_html_file(entry.path()) {
                continue;
            }

            if let Some(url_path) = to_url_path(root, entry.path()) {
                pages.push(url_path);
            }
        }
    }

    debug!(count = pages.len(), "Discovered static pages");
    pages
}

fn is_pruned_dir(entry: &DirEntry, exclude: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || exclude.iter().any(|x| x.as_str() == name)
}

fn is_html_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| HTML_EXTENSIONS.contains(&ext.as_str()))
}

/// Root-relative URL path with `/` separators.
///
/// Returns `None` for anything that would not be a clean path below the
/// root: hidden leading segments or parent directory references.
fn to_url_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::CurDir => continue,
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            _ => return None,
        }
    }

    let url_path = segments.join("/");
    if url_path.is_empty() || url_path.starts_with('.') {
        return None;
    }
    Some(format!("/{}", url_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Create files (and parent directories) under a fresh temp dir
    fn site_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"<html></html>").unwrap();
        }
        dir
    }

    fn scan(root: &Path, include: &[&str], exclude: &[&str]) -> Vec<String> {
        let include_dirs: Vec<PathBuf> = include.iter().map(PathBuf::from).collect();
        let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
        discover_pages(
            root,
            &ScanOptions {
                include_dirs: &include_dirs,
                exclude: &exclude,
            },
        )
    }

    #[test]
    fn test_discovers_html_recursively() {
        let site = site_with(&["about.html", "category/world.html", "category/deep/old.htm"]);
        let pages = scan(site.path(), &["."], &[]);
        assert_eq!(
            pages,
            vec!["/about.html", "/category/deep/old.htm", "/category/world.html"]
        );
    }

    #[test]
    fn test_skips_index_and_non_html() {
        let site = site_with(&["index.html", "news/index.html", "style.css", "CNAME", "a.HTML"]);
        let pages = scan(site.path(), &["."], &["CNAME"]);
        assert_eq!(pages, vec!["/a.HTML"]);
    }

    #[test]
    fn test_prunes_hidden_and_excluded_dirs() {
        let site = site_with(&[
            ".git/hooks/x.html",
            ".venv/lib/page.html",
            "venv-ok/page.html",
            "node_modules/pkg/readme.html",
        ]);
        let pages = scan(site.path(), &["."], &[".venv", "node_modules"]);
        assert_eq!(pages, vec!["/venv-ok/page.html"]);
    }

    #[test]
    fn test_excluded_file_names() {
        let site = site_with(&["keep.html", "drafts.html"]);
        let pages = scan(site.path(), &["."], &["drafts.html"]);
        assert_eq!(pages, vec!["/keep.html"]);
    }

    #[test]
    fn test_hidden_file_at_root_is_skipped() {
        let site = site_with(&[".secret.html", "public.html"]);
        let pages = scan(site.path(), &["."], &[]);
        assert_eq!(pages, vec!["/public.html"]);
    }

    #[test]
    fn test_overlapping_include_dirs_repeat() {
        let site = site_with(&["category/world.html"]);
        let pages = scan(site.path(), &[".", "category"], &[]);
        assert_eq!(pages, vec!["/category/world.html", "/category/world.html"]);
    }

    #[test]
    fn test_missing_include_dir_is_ignored() {
        let site = site_with(&["about.html"]);
        let pages = scan(site.path(), &["category", "."], &[]);
        assert_eq!(pages, vec!["/about.html"]);
    }

    #[test]
    fn test_to_url_path_rejects_escape() {
        let root = Path::new("/srv/site");
        assert_eq!(
            to_url_path(root, Path::new("/srv/site/./a/b.html")),
            Some("/a/b.html".to_string())
        );
        assert_eq!(to_url_path(root, Path::new("/srv/site/../x.html")), None);
        assert_eq!(to_url_path(root, Path::new("/elsewhere/x.html")), None);
    }

    #[test]
    fn test_is_html_file() {
        assert!(is_html_file(Path::new("a.html")));
        assert!(is_html_file(Path::new("a.HTM")));
        assert!(!is_html_file(Path::new("a.xml")));
        assert!(!is_html_file(Path::new("html")));
    }
}
