//! Link Resolution
//!
//! Decides whether a file-relative reference points at something inside the
//! source tree (and therefore becomes an import or a router target) or is an
//! external reference that passes through untouched.
//!
//! A reference is internal iff `<root>/<current dir>/<ref>` or
//! `<root>/<current dir>/<ref>/index.html` exists as a file.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

use crate::config::DOCUMENT_EXTENSION;

lazy_static! {
    /// `https:`, `mailto:`, `data:`, ... (RFC 3986 scheme)
    static ref SCHEME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap();
}

const INDEX_DOCUMENT: &str = "index.html";

/// Outcome of resolving a reference from the current file.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Not under the source root; use the reference as-is.
    External,
    Internal(InternalTarget),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InternalTarget {
    /// Existing file the reference lands on, relative to the source root.
    pub target: PathBuf,
    /// Specifier to import the reference with from the current file.
    pub import_path: String,
    /// True when the reference is an HTML document (directly or via its index).
    pub is_document: bool,
}

/// Resolves references relative to one file inside the source tree.
#[derive(Debug, Clone)]
pub struct LinkResolver<'a> {
    src_root: &'a Path,
    /// Directory of the current file, relative to `src_root`.
    current_dir: PathBuf,
}

impl<'a> LinkResolver<'a> {
    pub fn new(src_root: &'a Path, current_dir: impl Into<PathBuf>) -> Self {
        Self {
            src_root,
            current_dir: current_dir.into(),
        }
    }

    pub fn resolve(&self, reference: &str) -> Resolution {
        let reference = reference.trim();
        if is_external_reference(reference) {
            return Resolution::External;
        }

        let (base, rel) = match reference.strip_prefix('/') {
            Some(rooted) => (PathBuf::new(), rooted),
            None => (self.current_dir.clone(), reference),
        };

        let Some(target) = normalize(&base.join(rel)) else {
            // Escapes the source root
            return Resolution::External;
        };

        let direct = self.src_root.join(&target);
        let (target, is_document) = if direct.is_file() {
            let is_doc = target
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
                .unwrap_or(false);
            (target, is_doc)
        } else if self.src_root.join(&target).join(INDEX_DOCUMENT).is_file() {
            (target.join(INDEX_DOCUMENT), true)
        } else {
            return Resolution::External;
        };

        Resolution::Internal(InternalTarget {
            target,
            import_path: self.import_path(reference),
            is_document,
        })
    }

    /// Import specifier for `reference`, always starting with `./` or `../`.
    fn import_path(&self, reference: &str) -> String {
        if let Some(rooted) = reference.strip_prefix('/') {
            let depth = self
                .current_dir
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .count();
            if depth == 0 {
                return format!("./{}", rooted);
            }
            return format!("{}{}", "../".repeat(depth), rooted);
        }

        if reference.starts_with("./") || reference.starts_with("../") {
            reference.to_string()
        } else {
            format!("./{}", reference)
        }
    }
}

/// References that never touch the filesystem: URLs with a scheme,
/// protocol-relative URLs, pure fragments and empty strings.
pub fn is_external_reference(reference: &str) -> bool {
    reference.is_empty()
        || reference.starts_with('#')
        || reference.starts_with("//")
        || SCHEME_RE.is_match(reference)
}

/// Lexically resolve `.` and `..`. Returns `None` if the path climbs above its start.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.iter().collect())
}

/// Replace every non-alphanumeric character with `_`.
///
/// Lossy: `a/b.png` and `a_b.png` both become `a_b_png`. Identifiers that
/// would start with a digit get a leading `_` so they stay valid JS.
pub fn sanitize_identifier(reference: &str) -> String {
    let mut name: String = reference
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if name.chars().next().map(|c| c.is_numeric()).unwrap_or(true) {
        name.insert(0, '_');
    }
    name
}

/// Router path for a document relative to the source root: forward slashes,
/// no `.html` suffix (any case), and a trailing `index` segment collapsed
/// into its directory.
pub fn route_path_for(target: &Path) -> String {
    let mut segments: Vec<String> = target
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = segments.last_mut() {
        let suffix = format!(".{}", DOCUMENT_EXTENSION);
        if let Some(cut) = last.len().checked_sub(suffix.len()) {
            if last.get(cut..).map(|s| s.eq_ignore_ascii_case(&suffix)).unwrap_or(false) {
                last.truncate(cut);
            }
        }
    }
    if segments.last().map(|s| s == "index").unwrap_or(false) {
        segments.pop();
    }

    format!("/{}", segments.join("/"))
}

/// Split `page.html#section` into `("page.html", "#section")`.
pub fn split_fragment(reference: &str) -> (&str, &str) {
    match reference.find('#') {
        Some(idx) => reference.split_at(idx),
        None => (reference, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_identifier("logo.png"), "logo_png");
        assert_eq!(sanitize_identifier("./static/main.js"), "__static_main_js");
        assert_eq!(sanitize_identifier("a/b.png"), sanitize_identifier("a_b.png"));
        assert_eq!(sanitize_identifier("1.png"), "_1_png");
    }

    #[test]
    fn test_external_references() {
        assert!(is_external_reference("https://example.com/a.png"));
        assert!(is_external_reference("mailto:me@example.com"));
        assert!(is_external_reference("//cdn.example.com/x.js"));
        assert!(is_external_reference("#top"));
        assert!(is_external_reference(""));
        assert!(!is_external_reference("logo.png"));
        assert!(!is_external_reference("../a.html"));
    }

    #[test]
    fn test_existing_file_resolves() {
        let dir = tree(&["logo.png"]);
        let resolver = LinkResolver::new(dir.path(), "");
        match resolver.resolve("logo.png") {
            Resolution::Internal(target) => {
                assert_eq!(target.target, PathBuf::from("logo.png"));
                assert_eq!(target.import_path, "./logo.png");
                assert!(!target.is_document);
            }
            other => panic!("expected internal, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_external() {
        let dir = tree(&[]);
        let resolver = LinkResolver::new(dir.path(), "");
        assert_eq!(resolver.resolve("missing.png"), Resolution::External);
    }

    #[test]
    fn test_directory_index_resolves_as_document() {
        let dir = tree(&["blog/index.html"]);
        let resolver = LinkResolver::new(dir.path(), "");
        match resolver.resolve("blog") {
            Resolution::Internal(target) => {
                assert_eq!(target.target, PathBuf::from("blog/index.html"));
                assert!(target.is_document);
            }
            other => panic!("expected internal, got {:?}", other),
        }
    }

    #[test]
    fn test_relative_to_current_dir() {
        let dir = tree(&["docs/img/a.png", "shared.css"]);
        let resolver = LinkResolver::new(dir.path(), "docs");
        assert!(matches!(resolver.resolve("img/a.png"), Resolution::Internal(_)));
        match resolver.resolve("../shared.css") {
            Resolution::Internal(target) => {
                assert_eq!(target.target, PathBuf::from("shared.css"));
                assert_eq!(target.import_path, "../shared.css");
            }
            other => panic!("expected internal, got {:?}", other),
        }
    }

    #[test]
    fn test_root_relative_reference() {
        let dir = tree(&["static/logo.png"]);
        let resolver = LinkResolver::new(dir.path(), "a/b");
        match resolver.resolve("/static/logo.png") {
            Resolution::Internal(target) => {
                assert_eq!(target.import_path, "../../static/logo.png");
            }
            other => panic!("expected internal, got {:?}", other),
        }
    }

    #[test]
    fn test_escaping_root_is_external() {
        let dir = tree(&["a.png"]);
        let resolver = LinkResolver::new(dir.path(), "");
        assert_eq!(resolver.resolve("../a.png"), Resolution::External);
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(route_path_for(Path::new("index.html")), "/");
        assert_eq!(route_path_for(Path::new("about.html")), "/about");
        assert_eq!(route_path_for(Path::new("b/index.html")), "/b");
        assert_eq!(route_path_for(Path::new("b/c.html")), "/b/c");
        assert_eq!(route_path_for(Path::new("About.HTML")), "/About");
        assert_eq!(route_path_for(Path::new("b/c.Html")), "/b/c");
    }

    #[test]
    fn test_split_fragment() {
        assert_eq!(split_fragment("a.html#top"), ("a.html", "#top"));
        assert_eq!(split_fragment("a.html"), ("a.html", ""));
    }
}
