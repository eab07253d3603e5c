//! # specsite
//!
//! Builds the static website for a repository of Markdown specifications.
//! Specification pages and ordinary website pages are rendered through one
//! HTML template, linked into a navigation hierarchy derived from their URL
//! paths, and written as `index.html` files; TikZ diagrams embedded in the
//! Markdown are compiled to SVG on the way.
//!
//! # Input Layout
//!
//! ```text
//! repo/
//! ├── spec/                          # Specification pages → /std/...
//! │   └── core/
//! │       ├── 1.0.md                 # → /std/core/1.0
//! │       └── index.md               # → /std/core
//! └── website/
//!     ├── config.toml                # Optional build configuration
//!     ├── pages/                     # Website pages → /...
//!     │   └── index.md               # → /
//!     ├── static/                    # Mirrored to /static/...
//!     └── templates/page.html.tpl    # Document around every page
//! ```
//!
//! # Pipeline
//!
//! ```text
//! 1. Discover   spec/, website/pages/  →  source files + URL paths
//! 2. Render     Markdown               →  pages (HTML body, TOC, metadata)
//! 3. Navigate   all page paths         →  breadcrumbs + child links
//! 4. Write      pages + template       →  <output>/<path>/index.html
//! 5. Copy       website/static/        →  <output>/static/
//! ```
//!
//! Navigation needs the complete set of pages, so rendering finishes before
//! anything is written.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`site`] | Runs the pipeline and reports what it produced |
//! | [`discover`] | Finds Markdown sources and assigns their URL paths |
//! | [`render`] | Markdown → [`types::Page`]: anchors, rationale, draft flag, front matter, title |
//! | [`toc`] | Heading anchors and the nested table of contents |
//! | [`diagram`] | TikZ block → standalone LaTeX → PDF → SVG, behind the [`diagram::Toolchain`] trait |
//! | [`navigation`] | Prefix tree over URL paths; upward and downward links |
//! | [`template`] | The page template, loaded once |
//! | [`write`] | Writes pages and their assets into the output tree |
//! | [`assets`] | Mirrors the static directory |
//! | [`config`] | Optional `website/config.toml` over stock defaults |
//! | [`types`] | Shared data types and URL path normalisation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## External Template, Generated Fragments
//!
//! The surrounding document belongs to the website and lives in the input
//! repository, so it is a runtime template (minijinja, auto-escaping). The
//! fragments this crate generates itself, the table of contents and diagram
//! image tags, are built with Maud and reach the template pre-escaped.
//!
//! ## Diagrams Through a Trait
//!
//! `pdflatex` and `pdf2svg` are external programs. The compiler only talks to
//! them through [`diagram::Toolchain`], so every stage above it is tested with
//! a recording mock and no TeX installation.

pub mod assets;
pub mod config;
pub mod diagram;
pub mod discover;
pub mod navigation;
pub mod output;
pub mod render;
pub mod site;
pub mod template;
pub mod toc;
pub mod types;
pub mod write;

#[cfg(test)]
pub(crate) mod test_helpers;
