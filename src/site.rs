//! The build pipeline.
//!
//! ```text
//! config → spec/ check → template → discover → render → navigate → write → static
//! ```
//!
//! Every stage runs to completion before the next starts. Rendering needs all
//! pages before navigation can link them, and writing needs navigation. The
//! first error aborts the build; whatever was written until then stays.

use crate::assets::{AssetError, copy_assets};
use crate::config::{BuildConfig, ConfigError, load_config};
use crate::diagram::{DiagramCompiler, LatexToolchain, Toolchain};
use crate::discover::{DiscoverError, check_spec_dir, find_source_files};
use crate::navigation::{NavigationError, NavigationTree};
use crate::output;
use crate::render::{RenderError, Renderer};
use crate::template::{PageTemplate, TemplateError};
use crate::types::Page;
use crate::write::{WriteError, page_output_path, write_page};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Discover(#[from] DiscoverError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("create {0}: {1}")]
    CreateOutput(PathBuf, std::io::Error),
}

/// A page as it was written.
#[derive(Debug, Clone)]
pub struct WrittenPage {
    pub url_path: String,
    /// Written file, relative to the output root.
    pub output_path: PathBuf,
    pub is_draft: bool,
}

/// What a build produced.
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub spec_pages: usize,
    pub site_pages: usize,
    /// In write order.
    pub pages: Vec<WrittenPage>,
    pub diagrams: usize,
    pub static_files: usize,
    pub warnings: Vec<String>,
}

impl BuildSummary {
    pub fn drafts(&self) -> usize {
        self.pages.iter().filter(|p| p.is_draft).count()
    }
}

/// Build the website for the repository at `input_dir` into `output_dir`,
/// compiling diagrams with the configured TeX tools.
pub fn build_site(input_dir: &Path, output_dir: &Path) -> Result<BuildSummary, BuildError> {
    let config = load_config(input_dir)?;
    let compiler = DiagramCompiler::new(LatexToolchain::from_config(&config.diagrams));
    build_with(input_dir, output_dir, &config, &compiler)
}

/// Run the pipeline with an explicit config and diagram compiler.
pub fn build_with<T: Toolchain>(
    input_dir: &Path,
    output_dir: &Path,
    config: &BuildConfig,
    compiler: &DiagramCompiler<T>,
) -> Result<BuildSummary, BuildError> {
    let layout = &config.layout;
    check_spec_dir(input_dir, layout)?;
    let template = PageTemplate::load(&input_dir.join(&layout.template))?;
    fs::create_dir_all(output_dir)
        .map_err(|e| BuildError::CreateOutput(output_dir.to_path_buf(), e))?;

    let sources = find_source_files(input_dir, layout)?;
    let spec_root = input_dir.join(&layout.spec_dir);
    let spec_pages = sources
        .iter()
        .filter(|s| s.filesystem_path.starts_with(&spec_root))
        .count();
    let mut summary = BuildSummary {
        spec_pages,
        site_pages: sources.len() - spec_pages,
        ..BuildSummary::default()
    };

    let renderer = Renderer::new(compiler, config);
    let mut pages: Vec<Page> = Vec::with_capacity(sources.len());
    for source in &sources {
        let rendered = renderer.render(source)?;
        for warning in rendered.warnings {
            output::print_warning(&warning);
            summary.warnings.push(warning);
        }
        summary.diagrams += rendered.diagram_count;
        pages.push(rendered.page);
    }

    let tree = NavigationTree::build(pages.iter().map(|p| p.path.as_str()));
    for page in &mut pages {
        tree.attach(page)?;
    }

    for page in &pages {
        write_page(page, &template, output_dir)?;
        summary.pages.push(WrittenPage {
            url_path: page.path.clone(),
            output_path: page_output_path(&page.path),
            is_draft: page.is_draft,
        });
    }

    summary.static_files = copy_assets(
        &input_dir.join(&layout.static_dir),
        &output_dir.join(&layout.static_url_prefix),
    )?;
    Ok(summary)
}
