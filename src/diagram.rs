//! Diagram compilation: TikZ source to inline SVG.
//!
//! A diagram block holds a LaTeX preamble and a drawing body separated by a
//! line of three hyphens:
//!
//! ````markdown
//! ```tikz
//! \usetikzlibrary{arrows}
//! ---
//! \draw[->] (0,0) -- (1,0);
//! ```
//! ````
//!
//! The compiler wraps both parts in a `standalone` document, typesets it to
//! PDF and converts the first page to SVG. Every compilation runs in its own
//! scratch directory with a random name, which is removed afterwards whether
//! or not compilation succeeded.
//!
//! The two external steps sit behind the [`Toolchain`] trait. Production uses
//! [`LatexToolchain`] (`pdflatex` + `pdf2svg`); tests substitute a recording
//! mock.

use crate::config::DiagramConfig;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use thiserror::Error;

const TEX_FILE: &str = "picture.tex";
const JOB_NAME: &str = "picture";
const PDF_FILE: &str = "picture.pdf";
const SCRATCH_PREFIX: &str = "specsite-diagram-";

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^---[ \t]*\r?$\n?").expect("separator regex is valid"));

#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("cannot find preamble separator (a line containing only ---)")]
    MissingSeparator,
    #[error("create scratch directory: {0}")]
    Scratch(std::io::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("exec {program} failed: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}{detail}")]
    ToolFailed {
        program: String,
        status: String,
        detail: String,
    },
    #[error("{0} produced no <svg> element")]
    NoSvg(String),
}

/// A diagram block split into its two parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSource {
    pub preamble: String,
    pub drawing: String,
}

impl DiagramSource {
    /// Split at the first line containing only `---`.
    pub fn parse(code: &str) -> Result<Self, DiagramError> {
        let mut parts = SEPARATOR.splitn(code, 2);
        match (parts.next(), parts.next()) {
            (Some(preamble), Some(drawing)) => Ok(Self {
                preamble: preamble.trim().to_string(),
                drawing: drawing.trim().to_string(),
            }),
            _ => Err(DiagramError::MissingSeparator),
        }
    }

    /// The complete LaTeX document for this diagram.
    pub fn to_latex(&self) -> String {
        format!(
            "\\documentclass[tikz]{{standalone}}\n{}\n\\begin{{document}}\\begin{{tikzpicture}}\n{}\n\\end{{tikzpicture}}\\end{{document}}\n",
            self.preamble, self.drawing
        )
    }
}

/// The external programs that turn a LaTeX file into SVG markup.
pub trait Toolchain {
    /// Typeset `tex_file` inside `workdir`, leaving `picture.pdf` next to it.
    fn typeset(&self, workdir: &Path, tex_file: &str) -> Result<(), DiagramError>;

    /// Convert the first page of `pdf_file` inside `workdir` to SVG markup.
    fn vectorize(&self, workdir: &Path, pdf_file: &str) -> Result<String, DiagramError>;
}

/// `pdflatex` followed by `pdf2svg`, or whatever the config names instead.
#[derive(Debug, Clone)]
pub struct LatexToolchain {
    pub typesetter: String,
    pub vectorizer: String,
}

impl LatexToolchain {
    pub fn from_config(config: &DiagramConfig) -> Self {
        Self {
            typesetter: config.typesetter.clone(),
            vectorizer: config.vectorizer.clone(),
        }
    }
}

impl Toolchain for LatexToolchain {
    fn typeset(&self, workdir: &Path, tex_file: &str) -> Result<(), DiagramError> {
        let output = Command::new(&self.typesetter)
            .args(["-interaction", "nonstopmode", "-jobname", JOB_NAME, tex_file])
            .current_dir(workdir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| DiagramError::Spawn {
                program: self.typesetter.clone(),
                source,
            })?;
        if !output.status.success() {
            // pdflatex reports errors on stdout as "! <message>"
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = stdout
                .lines()
                .find(|line| line.starts_with("! "))
                .map(|line| format!(": {}", line.trim_start_matches("! ")))
                .unwrap_or_default();
            return Err(DiagramError::ToolFailed {
                program: self.typesetter.clone(),
                status: output.status.to_string(),
                detail,
            });
        }
        Ok(())
    }

    fn vectorize(&self, workdir: &Path, pdf_file: &str) -> Result<String, DiagramError> {
        let output = Command::new(&self.vectorizer)
            .args([pdf_file, "/dev/stdout", "1"])
            .current_dir(workdir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| DiagramError::Spawn {
                program: self.vectorizer.clone(),
                source,
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .next()
                .map(|line| format!(": {}", line.trim()))
                .unwrap_or_default();
            return Err(DiagramError::ToolFailed {
                program: self.vectorizer.clone(),
                status: output.status.to_string(),
                detail,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Compiles diagram blocks with a [`Toolchain`], one scratch directory each.
pub struct DiagramCompiler<T: Toolchain> {
    toolchain: T,
    scratch_root: PathBuf,
}

impl<T: Toolchain> DiagramCompiler<T> {
    /// Scratch directories go below the system temp directory.
    pub fn new(toolchain: T) -> Self {
        Self::with_scratch_root(toolchain, std::env::temp_dir())
    }

    pub fn with_scratch_root(toolchain: T, scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            toolchain,
            scratch_root: scratch_root.into(),
        }
    }

    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// Compile one diagram block to SVG markup starting at the `<svg` tag.
    pub fn compile(&self, code: &str) -> Result<String, DiagramError> {
        let source = DiagramSource::parse(code)?;

        // Removed on drop, so every early return below cleans up too.
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&self.scratch_root)
            .map_err(DiagramError::Scratch)?;

        fs::write(scratch.path().join(TEX_FILE), source.to_latex())?;
        self.toolchain.typeset(scratch.path(), TEX_FILE)?;
        let svg = self.toolchain.vectorize(scratch.path(), PDF_FILE)?;

        scratch.close()?;
        strip_to_svg_root(&svg)
            .map(str::to_string)
            .ok_or_else(|| DiagramError::NoSvg("vectorizer".to_string()))
    }
}

/// Drop anything (XML prolog, comments) before the `<svg` root tag.
fn strip_to_svg_root(markup: &str) -> Option<&str> {
    let start = markup.find("<svg")?;
    Some(markup[start..].trim_end())
}
