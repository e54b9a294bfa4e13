//! Read-only taxonomy tree and node handles.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use super::{TaxonomyError, TypeCode, PATH_SEPARATOR};

/// Index of the root node.
const ROOT: u32 = 0;

#[derive(Debug, Clone)]
pub(super) struct NodeData {
    pub(super) name: String,
    pub(super) parent: Option<u32>,
    /// Child indices, sorted by child name.
    pub(super) children: Vec<u32>,
    pub(super) min_level: u8,
    pub(super) depth: u8,
}

/// The complete type tree.
///
/// Nodes live in one arena indexed by their global index (root = 0, the rest
/// in depth-first pre-order of the sorted tree). Construct with
/// [`TaxonomyBuilder`](super::TaxonomyBuilder), [`Taxonomy::load`] or
/// [`str::parse`].
#[derive(Debug, Clone)]
pub struct Taxonomy {
    nodes: Vec<NodeData>,
}

impl Taxonomy {
    pub(super) fn from_nodes(nodes: Vec<NodeData>) -> Self {
        debug_assert!(!nodes.is_empty(), "taxonomy arena must contain the root");
        Self { nodes }
    }

    /// Load a taxonomy from an outline file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TaxonomyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let taxonomy = Self::parse(&text)?;
        info!(
            path = %path.display(),
            nodes = taxonomy.len(),
            "Loaded taxonomy"
        );
        Ok(taxonomy)
    }

    /// Parse outline text (see the crate docs for the format).
    pub fn parse(text: &str) -> Result<Self, TaxonomyError> {
        super::parser::parse_outline(text)?.build()
    }

    /// The unnamed root node.
    #[inline]
    pub fn root(&self) -> Node<'_> {
        Node {
            taxonomy: self,
            index: ROOT,
        }
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a taxonomy has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Look a node up by its global index.
    pub fn node(&self, index: u32) -> Option<Node<'_>> {
        ((index as usize) < self.nodes.len()).then_some(Node {
            taxonomy: self,
            index,
        })
    }

    /// Resolve a dotted path such as `natural.coastline`.
    pub fn find_path(&self, path: &str) -> Option<Node<'_>> {
        path.split(PATH_SEPARATOR)
            .try_fold(self.root(), |node, name| node.binary_find(name))
            .filter(|node| !node.is_root())
    }

    /// Type code for a dotted path, or `None` if any segment is unknown.
    pub fn type_code_for_path(&self, path: &str) -> Option<TypeCode> {
        self.find_path(path).map(|node| node.type_code())
    }

    /// The node a type code points to.
    ///
    /// Returns `None` for the empty code and for codes whose levels do not
    /// form a parent → child chain in this tree.
    pub fn node_for_code(&self, code: TypeCode) -> Option<Node<'_>> {
        if code.is_empty() {
            return None;
        }
        code.levels().try_fold(self.root(), |parent, index| {
            self.node(index)
                .filter(|node| node.data().parent == Some(parent.index))
        })
    }

    /// Dotted path of a type code, e.g. `natural.coastline`.
    pub fn path_of(&self, code: TypeCode) -> Option<String> {
        self.node_for_code(code).map(|node| node.path())
    }

    /// Minimum level at which a feature of this type is drawn.
    ///
    /// A node is never visible before its ancestors, so this is the largest
    /// `@level` along the path.
    pub fn min_visible_level(&self, code: TypeCode) -> Option<u8> {
        let node = self.node_for_code(code)?;
        Some(node.ancestors().map(|n| n.min_level()).max().unwrap_or(0))
    }

    /// Visit every node except the root in index order.
    pub fn for_each_node(&self, mut f: impl FnMut(Node<'_>)) {
        for index in 1..self.nodes.len() as u32 {
            f(Node {
                taxonomy: self,
                index,
            });
        }
    }
}

impl FromStr for Taxonomy {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A borrowed handle to one node of a [`Taxonomy`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    taxonomy: &'a Taxonomy,
    index: u32,
}

impl<'a> Node<'a> {
    #[inline]
    fn data(&self) -> &'a NodeData {
        &self.taxonomy.nodes[self.index as usize]
    }

    #[inline]
    fn at(&self, index: u32) -> Node<'a> {
        Node {
            taxonomy: self.taxonomy,
            index,
        }
    }

    /// Stable global index, used as the slot value in type codes.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Node name; empty for the root.
    #[inline]
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.index == ROOT
    }

    /// Distance from the root (root = 0).
    #[inline]
    pub fn depth(&self) -> usize {
        self.data().depth as usize
    }

    /// Minimum visible level declared for this node alone.
    #[inline]
    pub fn min_level(&self) -> u8 {
        self.data().min_level
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|index| self.at(index))
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Children in name order.
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let taxonomy = self.taxonomy;
        self.data()
            .children
            .iter()
            .map(move |&index| Node { taxonomy, index })
    }

    /// Binary search among direct children by name.
    pub fn binary_find(&self, name: &str) -> Option<Node<'a>> {
        let nodes = &self.taxonomy.nodes;
        let children = &self.data().children;
        children
            .binary_search_by(|&child| nodes[child as usize].name.as_str().cmp(name))
            .ok()
            .map(|pos| self.at(children[pos]))
    }

    /// This node and its ancestors up to (excluding) the root, leaf first.
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'a>> {
        std::iter::successors(Some(*self), |node| node.parent()).filter(|node| !node.is_root())
    }

    /// Type code of the path from the root to this node.
    pub fn type_code(&self) -> TypeCode {
        let mut indices: Vec<u32> = self.ancestors().map(|n| n.index).collect();
        indices.reverse();
        // Depth and index limits are enforced when the tree is built.
        indices.into_iter().fold(TypeCode::EMPTY, TypeCode::push)
    }

    /// Dotted path from the root, e.g. `natural.coastline`.
    pub fn path(&self) -> String {
        let mut names: Vec<&str> = self.ancestors().map(|n| n.name()).collect();
        names.reverse();
        names.join(&PATH_SEPARATOR.to_string())
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index)
            .field("name", &self.name())
            .field("children", &self.child_count())
            .finish()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.taxonomy, other.taxonomy) && self.index == other.index
    }
}

impl Eq for Node<'_> {}
