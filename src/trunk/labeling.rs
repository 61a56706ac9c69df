//! Level-order identifiers for nodes and edges.

use crate::error::AnalysisError;
use crate::model::{AnnotationValue, PhyloTree, VertexIndex};
use crate::trunk::ID_KEY;
use log::debug;

// =#========================================================================#=
// LABELING
// =#========================================================================#=
/// Dense identifiers assigned to every node and every edge of a tree.
///
/// Node ids run `0..N` in level order, edge ids run `0..N-1` in a second
/// level-order pass over the non-root vertices. An edge is identified by
/// the vertex it leads into, so both tables are indexed by [VertexIndex].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labeling {
    node_ids: Vec<usize>,
    edge_ids: Vec<Option<usize>>,
    // edge id -> vertex the edge leads into
    edge_children: Vec<VertexIndex>,
}

impl Labeling {
    /// Assigns node and edge identifiers to a well-formed tree.
    ///
    /// Deterministic: the same tree always gets the same ids.
    ///
    /// # Errors
    /// Returns [AnalysisError::MalformedTree] if the tree has no root, a
    /// cycle or vertices not reachable from the root.
    pub fn assign(tree: &PhyloTree) -> Result<Self, AnalysisError> {
        tree.validate()?;
        let n = tree.num_vertices();

        debug!("Adding ids to {n} nodes");
        let mut node_ids = vec![0; n];
        for (id, vertex) in tree.level_order_iter().enumerate() {
            node_ids[vertex.index()] = id;
        }

        debug!("Adding ids to {} edges", tree.num_edges());
        let mut edge_ids = vec![None; n];
        let mut edge_children = Vec::with_capacity(tree.num_edges());
        for (id, vertex) in tree.edges_level_order().enumerate() {
            edge_ids[vertex.index()] = Some(id);
            edge_children.push(vertex.index());
        }

        Ok(Labeling {
            node_ids,
            edge_ids,
            edge_children,
        })
    }

    /// Node id of `vertex`.
    pub fn node_id(&self, vertex: VertexIndex) -> usize {
        self.node_ids[vertex]
    }

    /// Id of the edge leading into `vertex`, `None` for the root.
    pub fn edge_id(&self, vertex: VertexIndex) -> Option<usize> {
        self.edge_ids[vertex]
    }

    /// Vertex that the edge with the given id leads into.
    ///
    /// # Panics
    /// Panics if `edge_id` is not below [Self::num_edges].
    pub fn edge_child(&self, edge_id: usize) -> VertexIndex {
        self.edge_children[edge_id]
    }

    pub fn num_nodes(&self) -> usize {
        self.node_ids.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edge_children.len()
    }
}

/// Writes every node id as an `id` annotation, replacing earlier values.
pub fn apply_node_ids(tree: &mut PhyloTree, labeling: &Labeling) {
    let annotations = tree.annotations_mut();
    for (vertex, &id) in labeling.node_ids.iter().enumerate() {
        annotations.add(ID_KEY, vertex, AnnotationValue::from(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newick;

    #[test]
    fn test_ids_follow_level_order() {
        let tree = newick::parse_str("((A,B)X,C)R;").unwrap();
        let labeling = Labeling::assign(&tree).unwrap();

        let ids: Vec<(&str, usize)> = tree
            .level_order_iter()
            .map(|v| (v.label().unwrap(), labeling.node_id(v.index())))
            .collect();
        assert_eq!(ids, vec![("R", 0), ("X", 1), ("C", 2), ("A", 3), ("B", 4)]);

        assert_eq!(labeling.edge_id(tree.root_index()), None);
        let edges: Vec<usize> = tree
            .edges_level_order()
            .map(|v| labeling.edge_id(v.index()).unwrap())
            .collect();
        assert_eq!(edges, vec![0, 1, 2, 3]);
        assert_eq!(labeling.num_nodes(), 5);
        assert_eq!(labeling.num_edges(), 4);
    }

    #[test]
    fn test_edge_child_inverts_edge_id() {
        let tree = newick::parse_str("((A,B),(C,(D,E)));").unwrap();
        let labeling = Labeling::assign(&tree).unwrap();
        for e in 0..labeling.num_edges() {
            assert_eq!(labeling.edge_id(labeling.edge_child(e)), Some(e));
        }
    }

    #[test]
    fn test_assign_is_idempotent() {
        let tree = newick::parse_str("((A,B),C,(D,E,F));").unwrap();
        assert_eq!(Labeling::assign(&tree).unwrap(), Labeling::assign(&tree).unwrap());
    }

    #[test]
    fn test_single_vertex_tree_has_no_edges() {
        let tree = newick::parse_str("A;").unwrap();
        let labeling = Labeling::assign(&tree).unwrap();
        assert_eq!(labeling.num_nodes(), 1);
        assert_eq!(labeling.num_edges(), 0);
        assert_eq!(labeling.node_id(tree.root_index()), 0);
    }

    #[test]
    fn test_apply_node_ids_writes_int_annotation() {
        let mut tree = newick::parse_str("(A,B);").unwrap();
        let labeling = Labeling::assign(&tree).unwrap();
        apply_node_ids(&mut tree, &labeling);
        let root = tree.root_index();
        assert_eq!(tree.annotations().get(ID_KEY, root), Some(&AnnotationValue::Int(0)));
    }

    #[test]
    fn test_unrooted_tree_is_rejected() {
        let tree = PhyloTree::new(0);
        assert!(matches!(
            Labeling::assign(&tree),
            Err(AnalysisError::MalformedTree(_))
        ));
    }
}
