//! Root distances and the reverse traversal that yields trunk counts.

use crate::error::AnalysisError;
use crate::model::{AnnotationValue, PhyloTree, VertexIndex};
use crate::trunk::TRUNK_KEY;
use crate::trunk::labeling::Labeling;

// =#========================================================================#=
// ROOT DISTANCES
// =#========================================================================#=
/// Edge-count depth of every vertex, indexed by [VertexIndex].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDistances(Vec<usize>);

impl RootDistances {
    /// Number of edges between `vertex` and the root.
    pub fn get(&self, vertex: VertexIndex) -> usize {
        self.0[vertex]
    }

    /// Depth of the deepest vertex, 0 for a single-vertex tree.
    pub fn max_depth(&self) -> usize {
        self.0.iter().copied().max().unwrap_or(0)
    }
}

/// Computes the edge-count depth of every vertex.
///
/// Depth rather than summed branch length decides when a walk reaches the
/// root, so zero-length branches never end it early.
///
/// # Errors
/// Returns [AnalysisError::MalformedTree] if the tree has no root, a cycle
/// or vertices not reachable from the root.
pub fn compute_root_distances(tree: &PhyloTree) -> Result<RootDistances, AnalysisError> {
    tree.validate()?;
    let mut depth = vec![0; tree.num_vertices()];
    // Level order reaches every parent before its children
    for vertex in tree.level_order_iter() {
        if let Some(parent) = vertex.parent() {
            depth[vertex.index()] = depth[parent] + 1;
        }
    }
    Ok(RootDistances(depth))
}

// =#========================================================================#=
// TRUNK COUNTS
// =#========================================================================#=
/// Trunk count of every edge, indexed by edge id.
///
/// Edges never crossed by a leaf walk are present with count 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrunkCounts {
    counts: Vec<u64>,
}

impl TrunkCounts {
    /// All-zero counts for `num_edges` edges.
    pub fn zeroed(num_edges: usize) -> Self {
        TrunkCounts {
            counts: vec![0; num_edges],
        }
    }

    /// Count of the edge with the given id, `None` if there is no such edge.
    pub fn get(&self, edge_id: usize) -> Option<u64> {
        self.counts.get(edge_id).copied()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(edge_id, count)` in edge id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().copied().enumerate()
    }

    /// Sum of all counts (the total trunk mass).
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Largest count, 0 for a tree without edges.
    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Adds the counts of `other` edge-wise.
    ///
    /// Lets counts be accumulated for subsets of leaves and combined
    /// afterwards; both sides must stem from the same [Labeling].
    ///
    /// # Panics
    /// Panics if the two have a different number of edges.
    pub fn merge(&mut self, other: &TrunkCounts) {
        assert_eq!(self.len(), other.len(), "Trunk counts of different trees");
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine += theirs;
        }
    }

    fn increment(&mut self, edge_id: usize) {
        self.counts[edge_id] += 1;
    }
}

/// Counts for each edge how many leaf-to-root walks cross it.
///
/// Every walk starts at the parent of its leaf and climbs while the current
/// vertex is below the root, so the edge directly above a leaf is never
/// counted. A single-vertex tree yields empty counts.
pub fn compute_trunk_counts(
    tree: &PhyloTree,
    labeling: &Labeling,
    distances: &RootDistances,
) -> TrunkCounts {
    let mut counts = TrunkCounts::zeroed(labeling.num_edges());
    for leaf in tree.leaves() {
        accumulate_leaf(tree, labeling, distances, leaf.index(), &mut counts);
    }
    counts
}

/// Adds the contribution of one leaf walk to `counts`.
pub(crate) fn accumulate_leaf(
    tree: &PhyloTree,
    labeling: &Labeling,
    distances: &RootDistances,
    leaf: VertexIndex,
    counts: &mut TrunkCounts,
) {
    let Some(mut current) = tree[leaf].parent() else {
        return;
    };
    while distances.get(current) > 0 {
        if let Some(edge_id) = labeling.edge_id(current) {
            counts.increment(edge_id);
        }
        match tree[current].parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
}

/// Writes each count as an `Int` `trunk` annotation on the child vertex of
/// its edge.
pub fn apply_trunk_annotation(tree: &mut PhyloTree, labeling: &Labeling, counts: &TrunkCounts) {
    let annotations = tree.annotations_mut();
    for (edge_id, count) in counts.iter() {
        annotations.add(TRUNK_KEY, labeling.edge_child(edge_id), AnnotationValue::from(count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newick;

    fn counts_by_label(tree: &PhyloTree) -> Vec<(String, u64)> {
        let labeling = Labeling::assign(tree).unwrap();
        let distances = compute_root_distances(tree).unwrap();
        let counts = compute_trunk_counts(tree, &labeling, &distances);
        tree.edges_level_order()
            .map(|v| {
                let edge = labeling.edge_id(v.index()).unwrap();
                (v.label().unwrap_or("").to_string(), counts.get(edge).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_root_distances_are_edge_counts() {
        let tree = newick::parse_str("((A:0,B:0)X:0,C:5)R;").unwrap();
        let distances = compute_root_distances(&tree).unwrap();
        let depth: Vec<(&str, usize)> = tree
            .level_order_iter()
            .map(|v| (v.label().unwrap(), distances.get(v.index())))
            .collect();
        assert_eq!(depth, vec![("R", 0), ("X", 1), ("C", 1), ("A", 2), ("B", 2)]);
        assert_eq!(distances.max_depth(), 2);
    }

    #[test]
    fn test_balanced_tree_counts() {
        let tree = newick::parse_str("((A:1,B:1)P:1,(C:1,D:1)Q:1);").unwrap();
        let counts = counts_by_label(&tree);
        for (label, count) in counts {
            match label.as_str() {
                "P" | "Q" => assert_eq!(count, 2, "internal edge {label}"),
                _ => assert_eq!(count, 0, "leaf edge {label}"),
            }
        }
    }

    #[test]
    fn test_caterpillar_counts() {
        let tree = newick::parse_str("(((A,B)P2,C)P1,D);").unwrap();
        let counts = counts_by_label(&tree);
        let get = |name: &str| counts.iter().find(|(l, _)| l == name).unwrap().1;
        assert_eq!(get("P1"), 3);
        assert_eq!(get("P2"), 2);
        assert_eq!(get("A"), 0);
        assert_eq!(get("D"), 0);
    }

    #[test]
    fn test_two_leaf_tree_is_all_zero() {
        let tree = newick::parse_str("(A:1,B:1);").unwrap();
        assert!(counts_by_label(&tree).iter().all(|(_, c)| *c == 0));
    }

    #[test]
    fn test_single_vertex_tree_yields_empty_counts() {
        let tree = newick::parse_str("A;").unwrap();
        let labeling = Labeling::assign(&tree).unwrap();
        let distances = compute_root_distances(&tree).unwrap();
        let counts = compute_trunk_counts(&tree, &labeling, &distances);
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.max(), 0);
    }

    #[test]
    fn test_merge_of_per_leaf_counts_matches_sequential() {
        let tree = newick::parse_str("((A,(B,C)),(D,E),F);").unwrap();
        let labeling = Labeling::assign(&tree).unwrap();
        let distances = compute_root_distances(&tree).unwrap();
        let sequential = compute_trunk_counts(&tree, &labeling, &distances);

        let mut merged = TrunkCounts::zeroed(labeling.num_edges());
        for leaf in tree.leaves() {
            let mut single = TrunkCounts::zeroed(labeling.num_edges());
            accumulate_leaf(&tree, &labeling, &distances, leaf.index(), &mut single);
            merged.merge(&single);
        }
        assert_eq!(merged, sequential);
    }

    #[test]
    fn test_apply_trunk_annotation_on_child_vertex() {
        let mut tree = newick::parse_str("((A,B)X,C);").unwrap();
        let labeling = Labeling::assign(&tree).unwrap();
        let distances = compute_root_distances(&tree).unwrap();
        let counts = compute_trunk_counts(&tree, &labeling, &distances);
        apply_trunk_annotation(&mut tree, &labeling, &counts);

        let x = tree.vertices().find(|v| v.label() == Some("X")).unwrap().index();
        assert_eq!(tree.annotations().get(TRUNK_KEY, x), Some(&AnnotationValue::Int(2)));
        assert_eq!(tree.annotations().get(TRUNK_KEY, tree.root_index()), None);
    }
}
