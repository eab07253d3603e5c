//! Page output.
//!
//! Each page becomes `<output>/<path>/index.html`, so `/std/core/1.0` is
//! served as `/std/core/1.0/`. Page-local assets are written next to it at the
//! paths they declare.

use crate::template::{PageTemplate, TemplateError};
use crate::types::{Page, normalize_url_path};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("write {0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Output file for a page path, relative to the output root.
pub fn page_output_path(url_path: &str) -> PathBuf {
    let normalized = normalize_url_path(url_path);
    let mut path = PathBuf::new();
    for segment in normalized.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.join("index.html")
}

/// Render the page through the template and write it with its assets.
///
/// Returns the path of the written `index.html`.
pub fn write_page(
    page: &Page,
    template: &PageTemplate,
    output_dir: &Path,
) -> Result<PathBuf, WriteError> {
    let document = template.render(page)?;
    let mut bytes = document.trim().as_bytes().to_vec();
    bytes.push(b'\n');

    let target = output_dir.join(page_output_path(&page.path));
    write_file(&target, &bytes)?;

    for asset in &page.assets {
        let asset_path = asset
            .path
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(output_dir.to_path_buf(), |acc, segment| acc.join(segment));
        write_file(&asset_path, &asset.content)?;
    }
    Ok(target)
}

fn write_file(path: &Path, content: &[u8]) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| WriteError::Io(parent.to_path_buf(), e))?;
    }
    fs::write(path, content).map_err(|e| WriteError::Io(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Asset;
    use tempfile::TempDir;

    fn template() -> PageTemplate {
        PageTemplate::from_source("\n\n  <h1>{{ title }}</h1>{{ content_html }}  \n\n".to_string())
            .unwrap()
    }

    fn page(path: &str) -> Page {
        Page {
            path: path.to_string(),
            title: "Title".to_string(),
            content_html: "<p>x</p>".to_string(),
            ..Page::default()
        }
    }

    #[test]
    fn output_paths() {
        assert_eq!(page_output_path("/"), PathBuf::from("index.html"));
        assert_eq!(
            page_output_path("/std/core/1.0"),
            Path::new("std").join("core").join("1.0").join("index.html")
        );
        assert_eq!(
            page_output_path("/a//b/"),
            Path::new("a").join("b").join("index.html")
        );
    }

    #[test]
    fn writes_trimmed_document_with_single_newline() {
        let tmp = TempDir::new().unwrap();
        let target = write_page(&page("/std/core/1.0"), &template(), tmp.path()).unwrap();
        assert_eq!(target, tmp.path().join("std/core/1.0/index.html"));
        let content = fs::read_to_string(target).unwrap();
        assert_eq!(content, "<h1>Title</h1><p>x</p>\n");
    }

    #[test]
    fn root_page_goes_to_output_root() {
        let tmp = TempDir::new().unwrap();
        write_page(&page("/"), &template(), tmp.path()).unwrap();
        assert!(tmp.path().join("index.html").is_file());
    }

    #[test]
    fn overwrites_existing_page() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("a/index.html");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "old").unwrap();
        write_page(&page("/a"), &template(), tmp.path()).unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "<h1>Title</h1><p>x</p>\n");
    }

    #[test]
    fn writes_assets_verbatim() {
        let tmp = TempDir::new().unwrap();
        let mut page = page("/std/core");
        page.assets.push(Asset {
            path: "std/core/diagram-1.svg".to_string(),
            content: b"<svg></svg>".to_vec(),
        });
        write_page(&page, &template(), tmp.path()).unwrap();
        assert_eq!(
            fs::read(tmp.path().join("std/core/diagram-1.svg")).unwrap(),
            b"<svg></svg>"
        );
    }

    #[test]
    fn unwritable_output_is_error() {
        let tmp = TempDir::new().unwrap();
        // a file where a directory is needed
        fs::write(tmp.path().join("std"), "").unwrap();
        let err = write_page(&page("/std/core"), &template(), tmp.path()).unwrap_err();
        assert!(matches!(err, WriteError::Io(..)));
    }
}
