//! Prefix trie over path segments.
//!
//! One tree exists per HTTP method. Each node stores a single segment
//! (`part`); terminal nodes additionally carry the full pattern they
//! complete. Children are kept in insertion order and matching walks them
//! front to back with backtracking, so a static child registered before a
//! dynamic sibling is preferred.
//!
//! Nodes are created during registration and never mutated afterwards;
//! lookups are read-only and safe to share across request coroutines.

/// A single trie node covering one path segment.
#[derive(Debug, Default)]
pub(crate) struct Node {
    /// Path segment this node matches (`users`, `:id`, `*filepath`).
    part: String,
    /// Full registered pattern, present only on terminal nodes.
    pattern: Option<String>,
    /// Child nodes in insertion order.
    children: Vec<Node>,
    /// Whether `part` is a parameter or wildcard slot.
    is_wild: bool,
}

fn is_dynamic(part: &str) -> bool {
    part.starts_with(':') || part.starts_with('*')
}

impl Node {
    /// Root node of a per-method tree. Matches no segment itself.
    pub(crate) fn root() -> Self {
        Node::default()
    }

    fn new(part: &str) -> Self {
        Node {
            part: part.to_string(),
            pattern: None,
            children: Vec::new(),
            is_wild: is_dynamic(part),
        }
    }

    /// The full pattern registered at this node, if it terminates a route.
    pub(crate) fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Ensure a child chain exists for `parts[depth..]` and mark the terminal
    /// node with `pattern`.
    ///
    /// A dynamic slot is shared by all dynamic segments at the same position:
    /// inserting `/x/:b` after `/x/:a` reuses the `:a` child, so the
    /// first-registered parameter name drives later extraction. Re-inserting
    /// an existing pattern simply overwrites the terminal marker.
    pub(crate) fn insert(&mut self, pattern: &str, parts: &[&str], depth: usize) {
        if depth == parts.len() {
            self.pattern = Some(pattern.to_string());
            return;
        }
        let part = parts[depth];
        let idx = self
            .children
            .iter()
            .position(|c| c.part == part || (c.is_wild && is_dynamic(part)));
        let idx = match idx {
            Some(i) => i,
            None => {
                self.children.push(Node::new(part));
                self.children.len() - 1
            }
        };
        self.children[idx].insert(pattern, parts, depth + 1);
    }

    /// Find the terminal node matching `parts[depth..]`.
    ///
    /// A node terminates the walk when all segments are consumed or when the
    /// node itself is a wildcard; either way it only matches if a pattern was
    /// registered there. Otherwise every child that matches the current
    /// segment exactly or is a dynamic slot is tried in insertion order and
    /// the first hit wins.
    pub(crate) fn search(&self, parts: &[&str], depth: usize) -> Option<&Node> {
        if depth == parts.len() || self.part.starts_with('*') {
            return self.pattern.is_some().then_some(self);
        }
        let part = parts[depth];
        self.children
            .iter()
            .filter(|c| c.part == part || c.is_wild)
            .find_map(|c| c.search(parts, depth + 1))
    }
}
