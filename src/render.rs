//! Content rendering: one Markdown file to one [`Page`].
//!
//! Rendering is a fixed sequence of steps:
//!
//! 1. Parse the Markdown and collect the headings into a table of contents,
//!    giving each an anchor derived from its text.
//! 2. Mark paragraphs starting with `*Rationale:*` with a CSS class.
//! 3. Put the anchors on the heading tags and render the table of contents.
//! 4. Replace each diagram block (```` ```tikz ````) with the compiled SVG.
//! 5. Strip a leading `<!-- draft -->` marker and flag the page as draft.
//! 6. Strip a leading `<!-- {"title": ..., "description": ...} -->` line and
//!    take the metadata from it.
//! 7. Without an explicit title, use the leading `# Title - Description`
//!    heading, or the URL path as a last resort (with a warning).
//!
//! Steps 3 and 4 operate on the parser's event stream before it is
//! serialized; steps 2, 5 and 6 are line-based edits of the serialized HTML.
//! They touch disjoint parts of the document, so the result is the same as
//! applying them strictly in order.

use crate::config::{BuildConfig, DiagramOutput};
use crate::diagram::{DiagramCompiler, DiagramError, Toolchain};
use crate::toc::{AnchorIds, render_table_of_contents};
use crate::types::{Asset, Page, SourceFile, TocEntry};
use maud::html;
use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html as md_html,
};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

const DRAFT_MARKER: &str = "<!-- draft -->";
const TITLE_DELIMITER: &str = " - ";

static FRONT_MATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!--\s*(\{.*\})\s*-->$").expect("front matter regex is valid"));
static RATIONALE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^<p><em>Rationale:</em>").expect("rationale regex is valid")
});

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("read {path}: unmarshal front matter failed: {source}")]
    FrontMatter {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("render {path}: diagram {index}: {source}")]
    Diagram {
        path: PathBuf,
        index: usize,
        source: DiagramError,
    },
}

/// A rendered page plus what the pipeline reports about it.
#[derive(Debug)]
pub struct Rendered {
    pub page: Page,
    /// Headings in document order, with their anchors.
    pub toc: Vec<TocEntry>,
    /// Non-fatal problems, e.g. a page without a usable title.
    pub warnings: Vec<String>,
    pub diagram_count: usize,
}

#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    title: Option<String>,
    description: Option<String>,
}

/// Renders Markdown files, compiling their diagrams with `compiler`.
pub struct Renderer<'a, T: Toolchain> {
    compiler: &'a DiagramCompiler<T>,
    diagram_language: &'a str,
    diagram_output: DiagramOutput,
    rationale_class: &'a str,
}

impl<'a, T: Toolchain> Renderer<'a, T> {
    pub fn new(compiler: &'a DiagramCompiler<T>, config: &'a BuildConfig) -> Self {
        Self {
            compiler,
            diagram_language: &config.diagrams.language,
            diagram_output: config.diagrams.output,
            rationale_class: &config.content.rationale_class,
        }
    }

    /// Read and render a discovered source file.
    pub fn render(&self, source: &SourceFile) -> Result<Rendered, RenderError> {
        let markdown =
            fs::read_to_string(&source.filesystem_path).map_err(|e| RenderError::Read {
                path: source.filesystem_path.clone(),
                source: e,
            })?;
        self.render_markdown(&source.url_path, &source.filesystem_path, &markdown)
    }

    /// Render Markdown text published at `url_path`. `file` is only used in
    /// error messages.
    pub fn render_markdown(
        &self,
        url_path: &str,
        file: &Path,
        markdown: &str,
    ) -> Result<Rendered, RenderError> {
        let (events, toc) = parse_with_toc(markdown);
        let (events, assets, diagram_count) = self.splice_diagrams(events, url_path, file)?;

        let mut content = String::with_capacity(markdown.len() * 3 / 2);
        md_html::push_html(&mut content, events.into_iter());

        let replacement = format!(
            "<p class=\"{}\"><em>Rationale:</em>",
            self.rationale_class
        );
        let mut content = RATIONALE
            .replace_all(&content, replacement.as_str())
            .into_owned();

        let is_draft = first_line(&content).trim() == DRAFT_MARKER;
        if is_draft {
            content = strip_first_line(&content);
        }

        let mut front_matter = FrontMatter::default();
        if let Some(captures) = FRONT_MATTER.captures(first_line(&content).trim_end()) {
            front_matter =
                serde_json::from_str(&captures[1]).map_err(|e| RenderError::FrontMatter {
                    path: file.to_path_buf(),
                    source: e,
                })?;
            content = strip_first_line(&content);
        }

        let mut warnings = Vec::new();
        let mut title = front_matter.title.unwrap_or_default();
        let mut description = front_matter.description.unwrap_or_default();
        if title.is_empty() {
            match toc.first().filter(|entry| entry.is_page_title) {
                Some(heading) => match heading.caption.split_once(TITLE_DELIMITER) {
                    Some((head, tail)) => {
                        title = head.to_string();
                        description = tail.to_string();
                    }
                    None => title = heading.caption.clone(),
                },
                None => {
                    warnings.push(format!("cannot determine page title for {url_path}"));
                    title = fallback_title(url_path);
                }
            }
        }

        Ok(Rendered {
            page: Page {
                path: url_path.to_string(),
                title,
                description,
                is_draft,
                content_html: content,
                toc_html: render_table_of_contents(&toc),
                assets,
                ..Page::default()
            },
            toc,
            warnings,
            diagram_count,
        })
    }

    fn is_diagram(&self, info: &str) -> bool {
        info.split_whitespace().next() == Some(self.diagram_language)
    }

    /// Replace every diagram code block with its compiled output. Also
    /// returns the page-local assets and the number of diagrams compiled.
    fn splice_diagrams<'e>(
        &self,
        events: Vec<Event<'e>>,
        url_path: &str,
        file: &Path,
    ) -> Result<(Vec<Event<'e>>, Vec<Asset>, usize), RenderError> {
        let mut out = Vec::with_capacity(events.len());
        let mut assets = Vec::new();
        let mut index = 0;
        let mut block: Option<String> = None;

        for event in events {
            if let Some(code) = block.as_mut() {
                match event {
                    Event::Text(text) => code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let source = std::mem::take(code);
                        block = None;
                        index += 1;
                        let svg =
                            self.compiler
                                .compile(&source)
                                .map_err(|e| RenderError::Diagram {
                                    path: file.to_path_buf(),
                                    index,
                                    source: e,
                                })?;
                        out.push(Event::Html(
                            self.place_diagram(svg, index, url_path, &mut assets).into(),
                        ));
                    }
                    _ => {}
                }
                continue;
            }
            if let Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) = &event
                && self.is_diagram(info)
            {
                block = Some(String::new());
                continue;
            }
            out.push(event);
        }
        Ok((out, assets, index))
    }

    /// Markup that takes the diagram block's place in the page body.
    fn place_diagram(
        &self,
        svg: String,
        index: usize,
        url_path: &str,
        assets: &mut Vec<Asset>,
    ) -> String {
        match self.diagram_output {
            DiagramOutput::Inline => format!("{svg}\n"),
            DiagramOutput::File => {
                let dir = url_path.trim_matches('/');
                let asset_path = if dir.is_empty() {
                    format!("diagram-{index}.svg")
                } else {
                    format!("{dir}/diagram-{index}.svg")
                };
                let src = format!("/{asset_path}");
                assets.push(Asset {
                    path: asset_path,
                    content: svg.into_bytes(),
                });
                let tag = html! { img.diagram src=(src) alt=""; };
                format!("{}\n", tag.into_string())
            }
        }
    }
}

/// Parse Markdown into events, collecting headings and anchoring them.
fn parse_with_toc(markdown: &str) -> (Vec<Event<'_>>, Vec<TocEntry>) {
    let mut events = Vec::new();
    let mut toc: Vec<TocEntry> = Vec::new();
    let mut ids = AnchorIds::default();
    // (index of the heading's Start event, level, caption so far)
    let mut open: Option<(usize, u8, String)> = None;

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    for event in Parser::new_ext(markdown, options) {
        match &event {
            Event::Start(Tag::Heading { level, .. }) => {
                open = Some((events.len(), heading_level_to_num(*level), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, caption)) = open.as_mut() {
                    caption.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, level, caption)) = open.take() {
                    let caption = caption.trim().to_string();
                    let anchor_id = ids.next_for(&caption);
                    if let Some(Event::Start(Tag::Heading { id, .. })) = events.get_mut(start) {
                        *id = Some(anchor_id.clone().into());
                    }
                    let is_page_title = toc.is_empty() && level == 1;
                    toc.push(TocEntry {
                        level,
                        caption,
                        anchor_id,
                        is_page_title,
                    });
                }
            }
            _ => {}
        }
        events.push(event);
    }
    (events, toc)
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn first_line(content: &str) -> &str {
    content.split_once('\n').map_or(content, |(first, _)| first)
}

fn strip_first_line(content: &str) -> String {
    content
        .split_once('\n')
        .map_or_else(String::new, |(_, rest)| rest.to_string())
}

/// Title for pages without any usable heading.
fn fallback_title(url_path: &str) -> String {
    match url_path.trim_start_matches('/') {
        "" => "/".to_string(),
        path => path.to_string(),
    }
}
