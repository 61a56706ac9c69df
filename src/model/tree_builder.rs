//! Trait for constructing phylogenetic trees during parsing.
//!
//! The [`TreeBuilder`] trait decouples parsers from concrete tree representations.
//! Parsers call builder methods as they read Newick or Nexus syntax, and the
//! builder assembles whatever tree structure it wants. Leaf labels arrive
//! already resolved (see [LabelResolver](crate::model::LabelResolver)).
//!
//! # Built-in implementation
//! * [`PhyloTreeBuilder`] - Builds a [`PhyloTree`] including its annotations
//!
//! # Builder lifecycle
//! ```text
//! Empty ──→ init_next() ──→ Building ──→ add_*/set_name ──→ finish_tree() ──→ Empty
//! ```

use crate::model::annotation::AnnotationValue;
use crate::model::tree::{PhyloTree, VertexIndex};
use crate::model::vertex::BranchLength;

// =#========================================================================#=
// TREE BUILDER (trait)
// =#========================================================================T=
/// Abstraction for constructing trees during parsing.
///
/// The parser drives the lifecycle:
///
/// 1. [`init_next`](Self::init_next) -> prepare for a new tree
/// 2. [`add_leaf`](Self::add_leaf), [`add_internal`](Self::add_internal),
///    [`add_root`](Self::add_root), [`add_annotation`](Self::add_annotation)
///    -> build structure bottom-up
/// 3. [`set_name`](Self::set_name) -> optionally assign a name
/// 4. [`finish_tree`](Self::finish_tree) -> finalize and return the tree
pub trait TreeBuilder {
    /// The type used to identify vertices during construction.
    type VertexIdx: Copy;

    /// The tree type produced by this builder.
    type Tree;

    /// Prepares the builder for constructing a new tree.
    ///
    /// # Arguments
    /// * `num_vertices`: Expected number of vertices (hint for allocation)
    fn init_next(&mut self, num_vertices: usize);

    /// Adds a leaf vertex to the tree under construction.
    fn add_leaf(&mut self, branch_len: Option<BranchLength>, label: Option<String>) -> Self::VertexIdx;

    /// Adds an internal (non-root) vertex above the given children.
    ///
    /// The children are vertex indices returned by previous `add_*` calls,
    /// in input order.
    fn add_internal(
        &mut self,
        children: Vec<Self::VertexIdx>,
        branch_len: Option<BranchLength>,
        label: Option<String>,
    ) -> Self::VertexIdx;

    /// Adds the root vertex, completing the tree structure.
    ///
    /// `children` is empty for a tree consisting of a single vertex.
    fn add_root(
        &mut self,
        children: Vec<Self::VertexIdx>,
        branch_len: Option<BranchLength>,
        label: Option<String>,
    ) -> Self::VertexIdx;

    /// Attaches an annotation value to a vertex added before.
    fn add_annotation(&mut self, key: String, vertex: Self::VertexIdx, value: AnnotationValue);

    /// Sets the name of the currently constructed tree.
    fn set_name(&mut self, tree_name: String);

    /// Finalizes the building process and returns the resulting tree.
    ///
    /// Returns `None` if no tree is under construction.
    fn finish_tree(&mut self) -> Option<Self::Tree>;
}

// =#========================================================================#=
// PHYLO TREE BUILDER
// =#========================================================================$=
/// [TreeBuilder] producing [PhyloTree].
#[derive(Debug, Default)]
pub struct PhyloTreeBuilder {
    tree: Option<PhyloTree>,
}

impl PhyloTreeBuilder {
    /// Creates a builder with no tree under construction.
    pub fn new() -> Self {
        Self::default()
    }

    fn tree_mut(&mut self) -> &mut PhyloTree {
        self.tree.get_or_insert_with(PhyloTree::default)
    }
}

impl TreeBuilder for PhyloTreeBuilder {
    type VertexIdx = VertexIndex;
    type Tree = PhyloTree;

    fn init_next(&mut self, num_vertices: usize) {
        self.tree = Some(PhyloTree::new(num_vertices));
    }

    fn add_leaf(&mut self, branch_len: Option<BranchLength>, label: Option<String>) -> VertexIndex {
        self.tree_mut().add_leaf(branch_len, label)
    }

    fn add_internal(
        &mut self,
        children: Vec<VertexIndex>,
        branch_len: Option<BranchLength>,
        label: Option<String>,
    ) -> VertexIndex {
        self.tree_mut().add_internal(children, branch_len, label)
    }

    fn add_root(
        &mut self,
        children: Vec<VertexIndex>,
        branch_len: Option<BranchLength>,
        label: Option<String>,
    ) -> VertexIndex {
        self.tree_mut().add_root(children, branch_len, label)
    }

    fn add_annotation(&mut self, key: String, vertex: VertexIndex, value: AnnotationValue) {
        self.tree_mut().annotations_mut().add(key, vertex, value);
    }

    fn set_name(&mut self, tree_name: String) {
        self.tree_mut().set_name(tree_name);
    }

    fn finish_tree(&mut self) -> Option<PhyloTree> {
        self.tree.take()
    }
}
