//! Vertex of a rooted phylogenetic tree.

use crate::model::tree::VertexIndex;
use std::fmt;
use std::ops::Deref;

// =#========================================================================#=
// VERTEX
// =#========================================================================$=
/// A vertex (node) in a [PhyloTree](crate::model::PhyloTree).
///
/// A vertex owns the edge leading into it: the incoming edge is described by
/// [`branch_length`](Self::branch_length), and any annotation stored for a
/// non-root vertex doubles as annotation of that edge.
///
/// # Invariants
/// - `index` is the position of the vertex in the tree arena
/// - The root is the only vertex without a parent (once the tree is built)
/// - `children` keeps the order of the input; traversals rely on it
/// - `branch_length` is non-negative and finite if set
#[derive(PartialEq, Debug, Clone)]
pub struct Vertex {
    index: VertexIndex,
    parent: Option<VertexIndex>,
    children: Vec<VertexIndex>,
    branch_length: Option<BranchLength>,
    label: Option<String>,
}

impl Vertex {
    /// Creates a vertex without parent.
    ///
    /// # Arguments
    /// * `index` - Position of this vertex in the arena
    /// * `children` - Ordered child indices (empty for a leaf)
    /// * `branch_length` - Length of the incoming edge, if any
    /// * `label` - Taxon or internal node label, if any
    pub fn new(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
        label: Option<String>,
    ) -> Self {
        Vertex {
            index,
            parent: None,
            children,
            branch_length,
            label,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        self.index
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<VertexIndex> {
        self.parent
    }

    /// Returns `true` if a parent is set.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn set_parent(&mut self, parent: VertexIndex) {
        self.parent = Some(parent);
    }

    /// Returns the ordered child indices.
    pub fn children(&self) -> &[VertexIndex] {
        &self.children
    }

    /// Returns the length of the incoming edge, if set.
    pub fn branch_length(&self) -> Option<BranchLength> {
        self.branch_length
    }

    /// Returns `true` if the incoming edge has a length.
    pub fn has_branch_length(&self) -> bool {
        self.branch_length.is_some()
    }

    /// Returns the label of this vertex, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns `true` if this vertex has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this vertex has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns `true` if this vertex has both a parent and children.
    pub fn is_internal(&self) -> bool {
        !self.is_root() && !self.is_leaf()
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================$=
/// Branch length in a phylogenetic tree, enforced non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(length >= 0.0, "Branch length must be non-negative, got {length}");
        assert!(length.is_finite(), "Branch length must be finite, got {length}");
        BranchLength(length)
    }

    /// Creates a new branch length, or `None` if `length` is negative or not finite.
    pub fn try_new(length: f64) -> Option<Self> {
        (length >= 0.0 && length.is_finite()).then_some(BranchLength(length))
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for BranchLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
