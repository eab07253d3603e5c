//! Build configuration.
//!
//! The configuration lives inside the input repository so that the command
//! line stays at exactly two arguments. It is optional: stock defaults describe
//! the standard layout, and a `website/config.toml` overrides only the keys it
//! names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layout]
//! spec_dir = "spec"                      # Specification subtree
//! spec_url_prefix = "std"                # URL prefix for specification pages
//! pages_dir = "website/pages"            # Website pages subtree
//! static_dir = "website/static"          # Mirrored verbatim to the output
//! static_url_prefix = "static"           # Where static files land in the output
//! template = "website/templates/page.html.tpl"
//!
//! [diagrams]
//! language = "tikz"        # Fenced code block tag for diagram sources
//! typesetter = "pdflatex"  # Produces picture.pdf from picture.tex
//! vectorizer = "pdf2svg"   # Converts the first PDF page to SVG on stdout
//! output = "inline"        # "inline" splices <svg>, "file" writes diagram-N.svg
//!
//! [content]
//! rationale_class = "rationale"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Location of the optional config file, relative to the input root.
pub const CONFIG_FILE: &str = "website/config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub layout: LayoutConfig,
    pub diagrams: DiagramConfig,
    pub content: ContentConfig,
}

impl BuildConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.spec_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "layout.spec_dir must not be empty".into(),
            ));
        }
        for (key, value) in [
            ("layout.spec_url_prefix", &self.layout.spec_url_prefix),
            ("layout.static_url_prefix", &self.layout.static_url_prefix),
        ] {
            if value.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a single path segment, got {value:?}"
                )));
            }
        }
        for (key, value) in [
            ("diagrams.language", &self.diagrams.language),
            ("diagrams.typesetter", &self.diagrams.typesetter),
            ("diagrams.vectorizer", &self.diagrams.vectorizer),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Where sources, template and static files live inside the input tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub spec_dir: String,
    /// Specification pages are published below `/<spec_url_prefix>/`.
    pub spec_url_prefix: String,
    pub pages_dir: String,
    pub static_dir: String,
    pub static_url_prefix: String,
    pub template: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spec_dir: "spec".to_string(),
            spec_url_prefix: "std".to_string(),
            pages_dir: "website/pages".to_string(),
            static_dir: "website/static".to_string(),
            static_url_prefix: "static".to_string(),
            template: "website/templates/page.html.tpl".to_string(),
        }
    }
}

/// How compiled diagrams end up in the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramOutput {
    /// Splice the `<svg>` markup into the page body.
    #[default]
    Inline,
    /// Save each diagram as a page-local `diagram-N.svg` and reference it.
    File,
}

/// External toolchain used by the diagram compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramConfig {
    pub language: String,
    pub typesetter: String,
    pub vectorizer: String,
    pub output: DiagramOutput,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            language: "tikz".to_string(),
            typesetter: "pdflatex".to_string(),
            vectorizer: "pdf2svg".to_string(),
            output: DiagramOutput::Inline,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Class added to paragraphs starting with `*Rationale:*`.
    pub rationale_class: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            rationale_class: "rationale".to_string(),
        }
    }
}

// =============================================================================
// Loading and merging
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BuildConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load the config for the repository at `input_root`.
///
/// A missing `website/config.toml` yields the stock defaults. A present but
/// invalid file is an error.
pub fn load_config(input_root: &Path) -> Result<BuildConfig, ConfigError> {
    let config_path = input_root.join(CONFIG_FILE);
    let base = stock_defaults_value()?;
    let merged = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        let overlay: toml::Value = toml::from_str(&content)?;
        merge_toml(base, overlay)
    } else {
        base
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}
