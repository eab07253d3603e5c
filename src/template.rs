//! The page template.
//!
//! The HTML document around each page comes from a template in the input
//! repository (`website/templates/page.html.tpl`), written in Jinja syntax.
//! It is loaded once at startup into an immutable [`PageTemplate`] that the
//! writer borrows. Variables available to the template:
//!
//! | Variable | Content |
//! |----------|---------|
//! | `path` | URL path of the page, e.g. `/std/core/1.0` |
//! | `title`, `description` | page metadata |
//! | `is_draft` | whether the page starts with `<!-- draft -->` |
//! | `content_html` | rendered body (not escaped) |
//! | `toc_html` | rendered table of contents (not escaped) |
//! | `upward_links`, `downward_links` | lists of `{url_path, caption}` |
//!
//! Everything else is HTML-escaped on output.

use crate::types::Page;
use minijinja::{Environment, Value, context};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name under which the template is registered. The `.html` suffix turns on
/// HTML auto-escaping.
const TEMPLATE_NAME: &str = "page.html";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("parse {0}: {1}")]
    Parse(PathBuf, minijinja::Error),
    #[error("render template for {0}: {1}")]
    Render(String, minijinja::Error),
}

/// A loaded page template.
#[derive(Debug)]
pub struct PageTemplate {
    env: Environment<'static>,
}

impl PageTemplate {
    /// Load and parse the template file.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source =
            fs::read_to_string(path).map_err(|e| TemplateError::Read(path.to_path_buf(), e))?;
        Self::from_source(source).map_err(|e| TemplateError::Parse(path.to_path_buf(), e))
    }

    pub fn from_source(source: String) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source)?;
        Ok(Self { env })
    }

    /// Render the complete HTML document for a page.
    pub fn render(&self, page: &Page) -> Result<String, TemplateError> {
        let ctx = context! {
            path => &page.path,
            title => &page.title,
            description => &page.description,
            is_draft => page.is_draft,
            content_html => Value::from_safe_string(page.content_html.clone()),
            toc_html => Value::from_safe_string(page.toc_html.clone()),
            upward_links => &page.upward_links,
            downward_links => &page.downward_links,
        };
        self.env
            .get_template(TEMPLATE_NAME)
            .and_then(|tmpl| tmpl.render(ctx))
            .map_err(|e| TemplateError::Render(page.path.clone(), e))
    }
}
