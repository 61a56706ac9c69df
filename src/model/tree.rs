//! Rooted phylogenetic tree stored as an arena of vertices.
//!
//! Provides:
//! * [PhyloTree] - the tree, with an [Annotations] side table
//! * [VertexIndex] - type used to index vertices in the tree
//! * Level-, pre- and post-order iterators

use crate::error::AnalysisError;
use crate::model::annotation::Annotations;
use crate::model::vertex::{BranchLength, Vertex};
use std::collections::VecDeque;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree represented using the arena pattern
/// on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Vertices may have any number of children; a tree made of
/// a single vertex (root that is also a leaf) is allowed.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained.
/// - No assumption on order of indices is maintained.
/// - Child order is kept as added and is the tie-break of every traversal.
/// - Per-vertex annotations live in a separate [Annotations] table.
///
/// # Construction
/// Add vertices bottom-up: leaves first, then internal vertices referencing
/// their children, finally the root. Check with [`PhyloTree::validate()`].
///
/// ```
/// use phylotrunk::model::{BranchLength, PhyloTree};
///
/// let mut tree = PhyloTree::new(3);
/// let a = tree.add_leaf(Some(BranchLength::new(1.0)), Some("A".to_string()));
/// let b = tree.add_leaf(Some(BranchLength::new(1.0)), Some("B".to_string()));
/// tree.add_root(vec![a, b], None, None);
///
/// assert!(tree.validate().is_ok());
/// assert_eq!(tree.num_edges(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PhyloTree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,

    /// Name of tree; optional, e.g. when parsed from Nexus file
    name: Option<String>,

    annotations: Annotations,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl PhyloTree {
    /// Creates a new, empty tree with capacity for `num_vertices` vertices.
    pub fn new(num_vertices: usize) -> Self {
        PhyloTree {
            vertices: Vec::with_capacity(num_vertices),
            root_index: NO_ROOT_SET_INDEX,
            name: None,
            annotations: Annotations::new(num_vertices),
        }
    }

    /// Attaches a name to this tree.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Adds a leaf to the tree and returns its index.
    pub fn add_leaf(&mut self, branch_length: Option<BranchLength>, label: Option<String>) -> VertexIndex {
        self.push_vertex(Vec::new(), branch_length, label)
    }

    /// Adds an internal vertex above the given children and returns its index.
    ///
    /// # Panics
    /// Panics if a child index is out of bounds.
    pub fn add_internal(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
        label: Option<String>,
    ) -> VertexIndex {
        self.push_vertex(children, branch_length, label)
    }

    /// Adds the root above the given children and returns its index.
    ///
    /// With no children, the root is also the only leaf of the tree.
    ///
    /// # Panics
    /// Panics if a child index is out of bounds.
    pub fn add_root(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
        label: Option<String>,
    ) -> VertexIndex {
        let index = self.push_vertex(children, branch_length, label);
        self.root_index = index;
        index
    }

    fn push_vertex(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
        label: Option<String>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self.vertices[child].set_parent(index);
        }
        self.vertices
            .push(Vertex::new(index, children, branch_length, label));
        index
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set a name for this tree.
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns an iterator over all vertices in arena order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Returns the annotation side table.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Returns the annotation side table for writing.
    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices (neither root nor leaf).
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges, i.e. of non-root vertices.
    pub fn num_edges(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Returns the sum of all branch lengths in the tree.
    ///
    /// Vertices without branch length contribute nothing.
    pub fn total_branch_length(&self) -> f64 {
        self.vertices
            .iter()
            .filter_map(|v| v.branch_length())
            .map(|bl| *bl)
            .sum::<f64>()
    }

    /// Checks if all non-root vertices have branch lengths set.
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.index() == self.root_index || v.has_branch_length())
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is set and in bounds, and the root has no parent
    /// - All vertex indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - All non-root vertices have a parent listing them as child
    /// - Every vertex is reachable from the root exactly once (no cycles)
    ///
    /// # Errors
    /// [AnalysisError::MalformedTree] describing the first violation found.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let n = self.vertices.len();
        if self.root_index == NO_ROOT_SET_INDEX {
            return Err(AnalysisError::malformed("no root set"));
        }
        if self.root_index >= n {
            return Err(AnalysisError::malformed(format!(
                "root index {} out of bounds ({n} vertices)",
                self.root_index
            )));
        }
        if let Some(parent) = self.root().parent() {
            return Err(AnalysisError::malformed(format!(
                "root {} has parent {parent}",
                self.root_index
            )));
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return Err(AnalysisError::malformed(format!(
                    "vertex at position {index} claims index {}",
                    vertex.index()
                )));
            }

            for &child in vertex.children() {
                if child >= n {
                    return Err(AnalysisError::malformed(format!(
                        "vertex {index} references child {child} out of bounds"
                    )));
                }
                if self.vertices[child].parent() != Some(index) {
                    return Err(AnalysisError::malformed(format!(
                        "child {child} of vertex {index} does not point back to it"
                    )));
                }
            }

            if index != self.root_index {
                match vertex.parent() {
                    None => {
                        return Err(AnalysisError::malformed(format!(
                            "vertex {index} has no parent"
                        )));
                    }
                    Some(parent) if parent >= n || !self.vertices[parent].children().contains(&index) => {
                        return Err(AnalysisError::malformed(format!(
                            "parent {parent} of vertex {index} does not list it as child"
                        )));
                    }
                    Some(_) => {}
                }
            }
        }

        // Reachability; a vertex seen twice means a cycle or shared child
        let mut seen = vec![false; n];
        let mut queue = VecDeque::from([self.root_index]);
        let mut reached = 0;
        while let Some(index) = queue.pop_front() {
            if seen[index] {
                return Err(AnalysisError::malformed(format!(
                    "vertex {index} is reached twice from the root"
                )));
            }
            seen[index] = true;
            reached += 1;
            queue.extend(self.vertices[index].children().iter().copied());
        }
        if reached != n {
            return Err(AnalysisError::malformed(format!(
                "{} of {n} vertices are not reachable from the root",
                n - reached
            )));
        }

        Ok(())
    }

    /// Returns `true` if [`validate`](Self::validate) succeeds.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Default for PhyloTree {
    fn default() -> Self {
        Self::new(0)
    }
}

impl std::ops::Index<VertexIndex> for PhyloTree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl PhyloTree {
    /// Returns an iterator over the tree in level order (breadth-first),
    /// children visited in stored order.
    ///
    /// # Example
    /// ```
    /// use phylotrunk::newick;
    ///
    /// let tree = newick::parse_str("((A,B)X,C)R;").unwrap();
    /// let labels: Vec<_> = tree.level_order_iter().map(|v| v.label().unwrap()).collect();
    /// assert_eq!(labels, vec!["R", "X", "C", "A", "B"]);
    /// ```
    pub fn level_order_iter(&self) -> LevelOrderIter<'_> {
        LevelOrderIter::new(self)
    }

    /// Returns an iterator over all edges in level order.
    ///
    /// An edge is represented by the vertex it leads into, so this is the
    /// level order without the root.
    pub fn edges_level_order(&self) -> impl Iterator<Item = &Vertex> {
        self.level_order_iter().filter(|v| !v.is_root())
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// # Example
    /// ```
    /// use phylotrunk::newick;
    ///
    /// let tree = newick::parse_str("((A,B)X,C)R;").unwrap();
    /// let labels: Vec<_> = tree.pre_order_iter().map(|v| v.label().unwrap()).collect();
    /// assert_eq!(labels, vec!["R", "X", "A", "B", "C"]);
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Returns an iterator over the tree in post-order (children before parents).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the leaves in pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = &Vertex> {
        self.pre_order_iter().filter(|v| v.is_leaf())
    }
}

/// Iterator for level-order traversal (breadth-first from the root).
pub struct LevelOrderIter<'a> {
    tree: &'a PhyloTree,
    queue: VecDeque<VertexIndex>,
}

impl<'a> LevelOrderIter<'a> {
    fn new(tree: &'a PhyloTree) -> Self {
        let mut queue = VecDeque::new();
        if tree.is_root_set() {
            queue.push_back(tree.root_index);
        }
        LevelOrderIter { tree, queue }
    }
}

impl<'a> Iterator for LevelOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.queue.pop_front()?;
        let vertex = &self.tree[index];
        self.queue.extend(vertex.children().iter().copied());
        Some(vertex)
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// Stack-based, without recursion.
pub struct PreOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a PhyloTree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        // Push children in reverse, so the first child is processed first
        self.stack.extend(vertex.children().iter().rev().copied());

        Some(vertex)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// Stack-based, without recursion.
pub struct PostOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a PhyloTree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }
            self.stack.push((index, true));
            self.stack
                .extend(vertex.children().iter().rev().map(|&c| (c, false)));
        }
        None
    }
}
