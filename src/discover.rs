//! Source discovery.
//!
//! Walks the two source subtrees of the input repository and maps every
//! Markdown file to the URL path it is published under:
//!
//! ```text
//! spec/core/1.0.md            →  /std/core/1.0
//! spec/core/index.md          →  /std/core
//! website/pages/index.md      →  /
//! website/pages/about.md      →  /about
//! ```
//!
//! Files named `index.md` stand in for their directory, since the root page
//! cannot be spelled as a file name otherwise. Non-Markdown files and
//! symlinks are ignored.

use crate::config::LayoutConfig;
use crate::types::{SourceFile, normalize_url_path};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("stat {0}: {1}")]
    Stat(PathBuf, std::io::Error),
    #[error("{0}: {1}")]
    Walk(PathBuf, walkdir::Error),
    #[error("{0}: not a directory")]
    NotADirectory(PathBuf),
}

/// Check that the specification subtree exists before anything else runs.
pub fn check_spec_dir(input_root: &Path, layout: &LayoutConfig) -> Result<(), DiscoverError> {
    let spec_dir = input_root.join(&layout.spec_dir);
    let metadata =
        std::fs::metadata(&spec_dir).map_err(|e| DiscoverError::Stat(spec_dir.clone(), e))?;
    if !metadata.is_dir() {
        return Err(DiscoverError::NotADirectory(spec_dir));
    }
    Ok(())
}

/// Find all source files, specification pages first.
pub fn find_source_files(
    input_root: &Path,
    layout: &LayoutConfig,
) -> Result<Vec<SourceFile>, DiscoverError> {
    let mut result = walk_markdown(&input_root.join(&layout.spec_dir), &layout.spec_url_prefix)?;
    result.extend(walk_markdown(&input_root.join(&layout.pages_dir), "")?);
    Ok(result)
}

fn walk_markdown(base_dir: &Path, url_prefix: &str) -> Result<Vec<SourceFile>, DiscoverError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(base_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| DiscoverError::Walk(base_dir.to_path_buf(), e))?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        // walkdir only yields paths below its root
        let Ok(relative) = entry.path().strip_prefix(base_dir) else {
            continue;
        };
        files.push(SourceFile {
            filesystem_path: entry.path().to_path_buf(),
            url_path: url_path_for(relative, url_prefix),
        });
    }
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "md")
}

/// Map a path relative to a source subtree to its URL path.
fn url_path_for(relative: &Path, url_prefix: &str) -> String {
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if let Some(last) = segments.last_mut()
        && let Some(stem) = last.strip_suffix(".md")
    {
        *last = stem.to_string();
    }
    if segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }

    normalize_url_path(&format!("{}/{}", url_prefix, segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# Title\n").unwrap();
    }

    fn urls(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.url_path.as_str()).collect()
    }

    #[test]
    fn spec_file_maps_below_prefix() {
        assert_eq!(
            url_path_for(Path::new("core/1.0.md"), "std"),
            "/std/core/1.0"
        );
    }

    #[test]
    fn root_index_maps_to_slash() {
        assert_eq!(url_path_for(Path::new("index.md"), ""), "/");
    }

    #[test]
    fn nested_index_collapses_to_directory() {
        assert_eq!(
            url_path_for(Path::new("core/index.md"), "std"),
            "/std/core"
        );
        assert_eq!(url_path_for(Path::new("index.md"), "std"), "/std");
    }

    #[test]
    fn only_the_final_index_segment_collapses() {
        assert_eq!(
            url_path_for(Path::new("index/intro.md"), ""),
            "/index/intro"
        );
    }

    #[test]
    fn finds_both_subtrees_in_order() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "spec/core/1.0.md");
        touch(tmp.path(), "spec/core/1.1.md");
        touch(tmp.path(), "spec/notes.txt");
        touch(tmp.path(), "website/pages/index.md");
        touch(tmp.path(), "website/pages/community/chat.md");

        let files = find_source_files(tmp.path(), &LayoutConfig::default()).unwrap();
        assert_eq!(
            urls(&files),
            vec![
                "/std/core/1.0",
                "/std/core/1.1",
                "/community/chat",
                "/",
            ]
        );
        assert!(files[0].filesystem_path.ends_with("spec/core/1.0.md"));
    }

    #[test]
    fn every_url_is_normalized() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "spec/a/b/c.md");
        touch(tmp.path(), "spec/a/index.md");
        touch(tmp.path(), "website/pages/x/index.md");

        let files = find_source_files(tmp.path(), &LayoutConfig::default()).unwrap();
        for file in &files {
            assert!(file.url_path.starts_with('/'));
            assert!(file.url_path == "/" || !file.url_path.ends_with('/'));
            assert!(!file.url_path.contains('\\'));
        }
    }

    #[test]
    fn missing_pages_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "spec/core/1.0.md");
        let result = find_source_files(tmp.path(), &LayoutConfig::default());
        assert!(matches!(result, Err(DiscoverError::Walk(_, _))));
    }

    #[test]
    fn spec_dir_precondition() {
        let tmp = TempDir::new().unwrap();
        let layout = LayoutConfig::default();
        assert!(matches!(
            check_spec_dir(tmp.path(), &layout),
            Err(DiscoverError::Stat(..))
        ));

        fs::write(tmp.path().join("spec"), "not a dir").unwrap();
        assert!(matches!(
            check_spec_dir(tmp.path(), &layout),
            Err(DiscoverError::NotADirectory(_))
        ));
    }
}
