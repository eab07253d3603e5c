//! Shared types passed between pipeline stages.
//!
//! A [`SourceFile`] comes out of discovery, the renderer turns it into a
//! [`Page`], navigation fills in the link lists, and the writer consumes it.

use serde::Serialize;
use std::path::PathBuf;

/// A Markdown source file and the URL path it publishes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub filesystem_path: PathBuf,
    /// Always normalized, see [`normalize_url_path`].
    pub url_path: String,
}

/// All metadata and content of one HTML page on the website.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Page {
    /// URL path, e.g. `/std/core/1.0`
    pub path: String,
    /// Never empty once rendered (falls back to the URL path)
    pub title: String,
    pub description: String,
    pub is_draft: bool,
    pub content_html: String,
    pub toc_html: String,
    pub upward_links: Vec<NavigationLink>,
    pub downward_links: Vec<NavigationLink>,
    /// Page-local files written next to the page's `index.html`.
    #[serde(skip)]
    pub assets: Vec<Asset>,
}

/// An entry in a page's navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationLink {
    pub url_path: String,
    pub caption: String,
}

impl NavigationLink {
    pub fn new(url_path: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            url_path: url_path.into(),
            caption: caption.into(),
        }
    }
}

/// One heading of a rendered page, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Plain text of the heading.
    pub caption: String,
    pub anchor_id: String,
    /// Set on the first entry when it is the document's leading `h1`.
    pub is_page_title: bool,
}

/// A page-local output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Output path relative to the output root, using `/` separators.
    pub path: String,
    pub content: Vec<u8>,
}

/// Normalize a URL path: leading `/`, no empty or `.` segments, no trailing
/// `/` except for the root.
///
/// ```
/// use specsite::types::normalize_url_path;
///
/// assert_eq!(normalize_url_path("std//core/./1.0/"), "/std/core/1.0");
/// assert_eq!(normalize_url_path(""), "/");
/// ```
pub fn normalize_url_path(path: &str) -> String {
    let segments: Vec<&str> = url_segments(path).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Iterate the non-empty segments of a URL path.
pub fn url_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".")
}
