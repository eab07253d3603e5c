//! Table of contents: heading anchors and the nested link list.

use crate::types::TocEntry;
use maud::{Markup, html};
use std::collections::{HashMap, HashSet};

/// Hands out unique anchor ids for the headings of one document.
#[derive(Debug, Default)]
pub struct AnchorIds {
    counts: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl AnchorIds {
    /// Anchor for a heading with the given text. Repeated texts get `-1`,
    /// `-2`, ... suffixes, skipping any id an earlier heading already took.
    pub fn next_for(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = "section".to_string();
        }
        let count = self.counts.entry(base.clone()).or_default();
        let mut id = match *count {
            0 => base.clone(),
            n => format!("{base}-{n}"),
        };
        while self.issued.contains(&id) {
            *count += 1;
            id = format!("{base}-{count}");
        }
        *count += 1;
        self.issued.insert(id.clone());
        id
    }
}

/// Convert heading text to a URL fragment.
///
/// Lowercases ASCII alphanumerics, turns runs of whitespace, `-` and `_` into
/// a single `-`, and drops everything else.
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_' || c == '.') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    result
}

struct TocNode<'a> {
    entry: &'a TocEntry,
    children: Vec<TocNode<'a>>,
}

/// Arrange flat entries into a forest: each entry becomes a child of the
/// closest preceding entry with a lower level.
fn nest<'a>(entries: &[&'a TocEntry]) -> Vec<TocNode<'a>> {
    fn build<'a>(entries: &[&'a TocEntry], pos: &mut usize, min_level: u8) -> Vec<TocNode<'a>> {
        let mut nodes = Vec::new();
        while let Some(entry) = entries.get(*pos) {
            if entry.level < min_level {
                break;
            }
            *pos += 1;
            let children = build(entries, pos, entry.level + 1);
            nodes.push(TocNode { entry, children });
        }
        nodes
    }

    // Starting at the shallowest level guarantees every entry is consumed.
    let min_level = entries.iter().map(|e| e.level).min().unwrap_or(1);
    build(entries, &mut 0, min_level)
}

fn render_nodes(nodes: &[TocNode<'_>]) -> Markup {
    html! {
        ul {
            @for node in nodes {
                li {
                    a href={ "#" (node.entry.anchor_id) } { (node.entry.caption) }
                    @if !node.children.is_empty() {
                        (render_nodes(&node.children))
                    }
                }
            }
        }
    }
}

/// Render the table of contents as nested `<ul>` lists of in-page links.
///
/// The page-title heading is left out since it heads the page itself. Returns
/// an empty string when nothing remains.
pub fn render_table_of_contents(toc: &[TocEntry]) -> String {
    let entries: Vec<&TocEntry> = toc.iter().filter(|e| !e.is_page_title).collect();
    if entries.is_empty() {
        return String::new();
    }
    render_nodes(&nest(&entries)).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: u8, caption: &str) -> TocEntry {
        TocEntry {
            level,
            caption: caption.to_string(),
            anchor_id: slugify(caption),
            is_page_title: false,
        }
    }

    #[test]
    fn slugify_basics() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("snake_case"), "snake-case");
        assert_eq!(slugify("Section 2.1 - Framing"), "section-2-1-framing");
    }

    #[test]
    fn anchors_are_unique() {
        let mut ids = AnchorIds::default();
        assert_eq!(ids.next_for("Examples"), "examples");
        assert_eq!(ids.next_for("Examples"), "examples-1");
        assert_eq!(ids.next_for("Examples"), "examples-2");
        assert_eq!(ids.next_for("Other"), "other");
    }

    #[test]
    fn suffixed_anchor_does_not_collide_with_heading_text() {
        let mut ids = AnchorIds::default();
        assert_eq!(ids.next_for("Examples"), "examples");
        assert_eq!(ids.next_for("Examples"), "examples-1");
        assert_eq!(ids.next_for("Examples 1"), "examples-1-1");
    }

    #[test]
    fn heading_text_taken_before_suffix_is_skipped() {
        let mut ids = AnchorIds::default();
        assert_eq!(ids.next_for("Examples 1"), "examples-1");
        assert_eq!(ids.next_for("Examples"), "examples");
        assert_eq!(ids.next_for("Examples"), "examples-2");
    }

    #[test]
    fn anchor_for_symbol_only_heading() {
        let mut ids = AnchorIds::default();
        assert_eq!(ids.next_for("???"), "section");
        assert_eq!(ids.next_for("!!!"), "section-1");
    }

    #[test]
    fn empty_toc_renders_nothing() {
        assert_eq!(render_table_of_contents(&[]), "");
    }

    #[test]
    fn page_title_is_left_out() {
        let mut title = entry(1, "Title");
        title.is_page_title = true;
        assert_eq!(render_table_of_contents(&[title]), "");
    }

    #[test]
    fn nested_by_level() {
        let toc = vec![
            entry(2, "Alpha"),
            entry(3, "Alpha One"),
            entry(3, "Alpha Two"),
            entry(2, "Beta"),
        ];
        let html = render_table_of_contents(&toc);
        assert_eq!(
            html,
            "<ul><li><a href=\"#alpha\">Alpha</a>\
             <ul><li><a href=\"#alpha-one\">Alpha One</a></li>\
             <li><a href=\"#alpha-two\">Alpha Two</a></li></ul></li>\
             <li><a href=\"#beta\">Beta</a></li></ul>"
        );
    }

    #[test]
    fn shallower_entry_after_deep_start_stays_listed() {
        let toc = vec![entry(3, "Deep"), entry(2, "Shallow")];
        let html = render_table_of_contents(&toc);
        assert!(html.contains("#deep"));
        assert!(html.contains("#shallow"));
    }

    #[test]
    fn captions_are_escaped() {
        let html = render_table_of_contents(&[entry(2, "a < b")]);
        assert!(html.contains("a &lt; b"));
    }
}
