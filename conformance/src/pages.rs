//! Loading decorated pages from an artifacts directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bokuteki_decorator::dom;
use markup5ever_rcdom::{Handle, RcDom};
use walkdir::WalkDir;

/// A decorated page parsed for inspection.
pub struct DecoratedPage {
    /// Path relative to the artifacts directory.
    pub path: String,
    /// Parsed document.
    pub dom: RcDom,
}

impl DecoratedPage {
    /// Parses `html` as the page at `path`.
    pub fn parse(path: &str, html: &str) -> Self {
        Self {
            path: path.to_string(),
            dom: dom::parse_html(html),
        }
    }

    /// The document node.
    pub fn root(&self) -> &Handle {
        &self.dom.document
    }
}

/// Loads every `.html` file under `artifacts`, in sorted path order.
///
/// # Errors
///
/// Returns an error if a page cannot be read.
pub fn load_pages(artifacts: &Path) -> Result<Vec<DecoratedPage>> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(artifacts)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|x| x == "html").unwrap_or(false))
    {
        let path = entry.path();
        let html = fs::read_to_string(path)
            .with_context(|| format!("Cannot read page: {}", path.display()))?;
        let rel_path = path
            .strip_prefix(artifacts)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        pages.push(DecoratedPage::parse(&rel_path, &html));
    }
    Ok(pages)
}

/// Element children of `node`, in order.
pub(crate) fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| dom::is_element(child))
        .cloned()
        .collect()
}
