//! Editing of Newick trees.
//!
//! A [`Tree`] owns the tree text exactly as read, together with an index of where each node's
//! name, branch length, and metadata block are found in the text. Edits are spliced into the
//! text, so everything not pertaining to the edited node is preserved byte for byte, including
//! formatting, comments, and any NEXUS container surrounding the tree.

use std::{borrow::Cow, fmt, ops::Range, str::FromStr};

use crate::Error;

mod annotate;
pub use annotate::{AnnotationSummary, Annotated, MetadataRow};

mod name;
pub use name::NODE_PREFIX;

pub mod nexus;

mod parse;
pub use parse::ParseError;

/// Identifier of a node in a tree.
///
/// Nodes are numbered in pre-order, so that the root is node zero.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root of any tree.
    pub const ROOT: Self = Self(0);

    /// Returns the pre-order index of the node.
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    // Empty if the node is unnamed
    name: Range<usize>,
    length: Option<Range<usize>>,
    // Only a block starting exactly where the branch length ends
    metadata: Option<Range<usize>>,
}

/// A tree in Newick format, possibly wrapped in NEXUS.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tree {
    text: String,
    newick: Range<usize>,
    nodes: Vec<Node>,
}

impl Tree {
    /// Parses a tree from text.
    ///
    /// The text may either be a bare Newick tree or a NEXUS file, in which case the first tree of
    /// the trees block is used.
    pub fn parse<S>(text: S) -> Result<Self, ParseError>
    where
        S: Into<String>,
    {
        let text = text.into();
        let start = nexus::locate(&text)?;
        let (nodes, end) = parse::parse(&text, start)?;

        Ok(Self {
            text,
            newick: start..end,
            nodes,
        })
    }

    /// Returns the full text, including anything surrounding the Newick tree.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the Newick tree, from the opening parenthesis to the terminating semicolon.
    pub fn newick(&self) -> &str {
        &self.text[self.newick.clone()]
    }

    /// Returns the Newick tree with all metadata blocks removed.
    pub fn plain(&self) -> String {
        strip_metadata(self.newick())
    }

    /// Consumes the tree, returning the full text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    ///
    /// A parsed tree always has at least a root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over all nodes, in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Returns the name of a node, with any quoting removed.
    ///
    /// The name is empty if the node is unnamed.
    pub fn name(&self, id: NodeId) -> Cow<'_, str> {
        unquote(&self.text[self.node(id).name.clone()])
    }

    /// Returns the branch length of a node, if any.
    pub fn branch_length(&self, id: NodeId) -> Option<f64> {
        self.node(id)
            .length
            .clone()
            .and_then(|range| self.text[range].parse().ok())
    }

    /// Returns the content of the metadata block following the branch length of a node, if any.
    pub fn metadata(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .metadata
            .clone()
            .map(|range| &self.text[range.start + 1..range.end - 1])
    }

    /// Returns the parent of a node, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).children.is_empty()
    }

    /// Finds the node with the provided name.
    ///
    /// Names are compared literally and in full.
    ///
    /// # Errors
    ///
    /// If more than one node has the provided name.
    pub fn find(&self, name: &str) -> Result<Option<NodeId>, Error> {
        let mut found = None;

        for id in self.nodes() {
            if self.name(id) == name {
                if found.is_some() {
                    return Err(Error::DuplicateNodeName {
                        name: String::from(name),
                    });
                }

                found = Some(id);
            }
        }

        Ok(found)
    }

    /// Renames a node.
    ///
    /// The name is written verbatim, so it must be a valid unquoted Newick label or include its
    /// own quotes.
    pub fn rename(&mut self, id: NodeId, name: &str) {
        let range = self.node(id).name.clone();
        let start = range.start;

        self.splice(range, name);
        self.nodes[id.0].name = start..start + name.len();
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Replaces a range of the text, moving the spans of all nodes accordingly.
    ///
    /// Spans starting at or after the end of the replaced range are shifted, and spans enclosing
    /// its start are stretched. The caller must set the span of the edited token itself.
    fn splice(&mut self, range: Range<usize>, replacement: &str) {
        let delta = replacement.len() as isize - range.len() as isize;
        let Range { start, end } = range.clone();

        let shift = |span: &mut Range<usize>| {
            if span.start >= end {
                span.start = span.start.saturating_add_signed(delta);
            }
            if span.end > start {
                span.end = span.end.saturating_add_signed(delta);
            }
        };

        for node in self.nodes.iter_mut() {
            shift(&mut node.name);
            node.length.iter_mut().chain(node.metadata.iter_mut()).for_each(shift);
        }
        shift(&mut self.newick);

        self.text.replace_range(range, replacement);
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Tree {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Extracts the Newick tree from tree text.
///
/// The text may be bare Newick or NEXUS. If `strip` is set, metadata blocks are removed.
pub fn extract(text: &str, strip: bool) -> Result<String, ParseError> {
    let tree = Tree::parse(text)?;

    Ok(if strip {
        tree.plain()
    } else {
        String::from(tree.newick())
    })
}

/// Removes all `[...]` blocks from text.
///
/// Blocks do not nest: a block ends at the first closing bracket.
pub fn strip_metadata(s: &str) -> String {
    let mut inside = false;

    s.chars()
        .filter(|&c| match c {
            '[' => {
                inside = true;
                false
            }
            ']' => {
                inside = false;
                false
            }
            _ => !inside,
        })
        .collect()
}

fn unquote(label: &str) -> Cow<'_, str> {
    match label
        .strip_prefix('\'')
        .and_then(|label| label.strip_suffix('\''))
    {
        Some(inner) => Cow::Owned(inner.replace("''", "'")),
        None => Cow::Borrowed(label),
    }
}
