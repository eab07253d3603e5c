//! Navigation between pages.
//!
//! The [`NavigationTree`] is a prefix tree over the URL paths of all pages.
//! Every proper prefix of a page path is a node too, so the hierarchy stays
//! connected; nodes without a page of their own have `exists == false`.
//!
//! ```text
//! /                 exists
//! └── std           (no page)
//!     └── core      (no page)
//!         ├── 1.0   exists
//!         └── 1.1   exists
//! ```
//!
//! From the tree each page gets two link lists:
//!
//! - **Upward**: a breadcrumb for every ancestor below the root, ending at
//!   the page itself. The root is reachable through the site logo instead.
//! - **Downward**: the nearest pages below this one. A child without a page is
//!   skipped over, so the root above links to `std/core/1.0` and
//!   `std/core/1.1` directly.
//!
//! Nodes live in an arena owned by the tree. Parents refer to children and
//! children to their parent by [`NodeId`], which keeps ownership acyclic.

use crate::types::{NavigationLink, Page, normalize_url_path, url_segments};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("page {0} is not in the navigation tree")]
    UnknownPage(String),
}

/// Index of a node in its [`NavigationTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct Node {
    /// Path part of the URL represented by this node, e.g. `/std/core`.
    pub url_path: String,
    pub parent: Option<NodeId>,
    /// Children keyed by path segment, in segment order.
    pub children: BTreeMap<String, NodeId>,
    /// Whether a page exists at this path.
    pub exists: bool,
}

#[derive(Debug)]
pub struct NavigationTree {
    nodes: Vec<Node>,
}

impl Default for NavigationTree {
    fn default() -> Self {
        Self {
            nodes: vec![Node {
                url_path: "/".to_string(),
                parent: None,
                children: BTreeMap::new(),
                exists: false,
            }],
        }
    }
}

impl NavigationTree {
    pub const ROOT: NodeId = NodeId(0);

    /// Build the tree for a set of page paths.
    pub fn build<I, S>(url_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::default();
        for path in url_paths {
            let id = tree.insert(path.as_ref());
            tree.nodes[id.0].exists = true;
        }
        tree
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Find the node for `url_path`, creating it and any missing ancestors.
    pub fn insert(&mut self, url_path: &str) -> NodeId {
        let mut current = Self::ROOT;
        for segment in url_segments(url_path) {
            current = match self.nodes[current.0].children.get(segment) {
                Some(&child) => child,
                None => {
                    let child = NodeId(self.nodes.len());
                    let parent_path = &self.nodes[current.0].url_path;
                    let child_path = normalize_url_path(&format!("{parent_path}/{segment}"));
                    self.nodes.push(Node {
                        url_path: child_path,
                        parent: Some(current),
                        children: BTreeMap::new(),
                        exists: false,
                    });
                    self.nodes[current.0]
                        .children
                        .insert(segment.to_string(), child);
                    child
                }
            };
        }
        current
    }

    /// Find the node for `url_path` without creating anything.
    pub fn locate(&self, url_path: &str) -> Option<NodeId> {
        url_segments(url_path).try_fold(Self::ROOT, |current, segment| {
            self.nodes[current.0].children.get(segment).copied()
        })
    }

    /// Breadcrumb links from the first path segment down to `id` itself.
    /// Empty for the root.
    pub fn upward_links(&self, id: NodeId) -> Vec<NavigationLink> {
        let mut links = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            let Some(parent) = node.parent else {
                break;
            };
            let caption = node.url_path.rsplit('/').next().unwrap_or_default();
            links.push(NavigationLink::new(node.url_path.clone(), caption));
            current = Some(parent);
        }
        links.reverse();
        links
    }

    /// Links to the nearest existing pages below `id`, skipping over nodes
    /// without a page. Captions are paths relative to `id`.
    pub fn downward_links(&self, id: NodeId) -> Vec<NavigationLink> {
        let base = self.node(id);
        let mut links = Vec::new();
        // Reversed so that popping visits children in segment order.
        let mut worklist: Vec<NodeId> = base.children.values().rev().copied().collect();
        while let Some(child_id) = worklist.pop() {
            let child = self.node(child_id);
            if child.exists {
                links.push(NavigationLink::new(
                    child.url_path.clone(),
                    relative_path(&base.url_path, &child.url_path),
                ));
            } else {
                worklist.extend(child.children.values().rev().copied());
            }
        }
        links
    }

    /// Fill in the page's upward and downward navigation.
    pub fn attach(&self, page: &mut Page) -> Result<(), NavigationError> {
        let id = self
            .locate(&page.path)
            .filter(|&id| self.node(id).exists)
            .ok_or_else(|| NavigationError::UnknownPage(page.path.clone()))?;
        page.upward_links = self.upward_links(id);
        page.downward_links = self.downward_links(id);
        Ok(())
    }
}

/// `descendant` relative to `ancestor`, e.g. `b/c` for `/a` and `/a/b/c`.
fn relative_path(ancestor: &str, descendant: &str) -> String {
    descendant
        .strip_prefix(ancestor)
        .unwrap_or(descendant)
        .trim_start_matches('/')
        .to_string()
}
