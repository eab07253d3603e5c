//! CLI output formatting.
//!
//! Output leads with the URL of each page, the identity a reader of the site
//! knows it by, and shows the written file as secondary context:
//!
//! ```text
//! Sources
//!     4 specification pages
//!     2 website pages
//!
//! Pages
//!     /std/core/1.0 → std/core/1.0/index.html
//!     /std/core/1.1 → std/core/1.1/index.html (draft)
//!     / → index.html
//!
//! Wrote 3 pages (1 draft), 2 diagrams, 5 static files
//! ```
//!
//! Non-fatal problems go to stderr as `WARNING: <message>` lines.
//!
//! # Architecture
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that does the writing. Format functions
//! are pure: no I/O, no side effects.

use crate::site::{BuildSummary, WrittenPage};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `2 pages`.
fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

// ============================================================================
// Warnings
// ============================================================================

pub fn format_warning(message: &str) -> String {
    format!("WARNING: {message}")
}

/// Print a warning to stderr.
pub fn print_warning(message: &str) {
    eprintln!("{}", format_warning(message));
}

// ============================================================================
// Usage
// ============================================================================

/// One-line command line error: the usage plus what was wrong.
pub fn format_usage_error(program: &str, problem: &str) -> String {
    let usage = format!("usage: {program} <input> <output>");
    if problem.is_empty() {
        usage
    } else {
        format!("{usage}: {problem}")
    }
}

// ============================================================================
// Build output
// ============================================================================

/// One line per written page: URL, output file, draft marker.
pub fn format_page_line(page: &WrittenPage) -> String {
    let draft = if page.is_draft { " (draft)" } else { "" };
    format!(
        "{}{} \u{2192} {}{}",
        indent(1),
        page.url_path,
        page.output_path.display(),
        draft
    )
}

/// Format the complete build report: sources, pages and totals.
pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = vec![
        "Sources".to_string(),
        format!(
            "{}{}",
            indent(1),
            count(summary.spec_pages, "specification page", "specification pages")
        ),
        format!(
            "{}{}",
            indent(1),
            count(summary.site_pages, "website page", "website pages")
        ),
    ];

    if !summary.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        lines.extend(summary.pages.iter().map(format_page_line));
    }

    lines.push(String::new());
    lines.push(format_summary_line(summary));
    lines
}

/// `Wrote 3 pages (1 draft), 2 diagrams, 5 static files`
pub fn format_summary_line(summary: &BuildSummary) -> String {
    let drafts = summary.drafts();
    let draft_note = if drafts > 0 {
        format!(" ({})", count(drafts, "draft", "drafts"))
    } else {
        String::new()
    };
    format!(
        "Wrote {}{}, {}, {}",
        count(summary.pages.len(), "page", "pages"),
        draft_note,
        count(summary.diagrams, "diagram", "diagrams"),
        count(summary.static_files, "static file", "static files"),
    )
}

/// Print the build report to stdout.
pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
