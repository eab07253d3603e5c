//! Shared test utilities.
//!
//! Tests build sites from a copy of `fixtures/repo/`, a small input
//! repository with two specification pages (one a draft), a front-matter
//! home page, a page template and one static file:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let repo = minimal_repo();
//! write_file(repo.path(), "spec/extra.md", "# Extra\n");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/repo/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn minimal_repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/repo");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

// =========================================================================
// Output inspection
// =========================================================================

/// Read a generated file. Panics with the available files on a miss.
pub fn read_output(output: &Path, relative: &str) -> String {
    let path = output.join(relative);
    fs::read_to_string(&path).unwrap_or_else(|e| {
        let available: Vec<String> = walkdir::WalkDir::new(output)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().strip_prefix(output).unwrap().display().to_string())
            .collect();
        panic!("cannot read {relative}: {e}. Available: {available:?}")
    })
}

/// Undo HTML escaping of `/`, which the template engine applies to
/// interpolated URLs.
pub fn unescape_slashes(html: &str) -> String {
    html.replace("&#x2f;", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_repo_is_complete() {
        let repo = minimal_repo();
        for file in [
            "spec/core/1.0.md",
            "spec/core/1.1.md",
            "website/pages/index.md",
            "website/templates/page.html.tpl",
            "website/static/css/site.css",
        ] {
            assert!(repo.path().join(file).is_file(), "missing {file}");
        }
    }

    #[test]
    fn write_file_creates_parents() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a/b/c.md", "x");
        assert_eq!(read_output(tmp.path(), "a/b/c.md"), "x");
    }
}
