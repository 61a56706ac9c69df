//! Trunk identification by reverse traversal.
//!
//! Every leaf walks towards the root and each edge counts how many walks
//! cross it. Edges with high counts form the trunk of the tree, the
//! lineage that persisted through time. The pipeline is:
//! 1. [Labeling::assign] gives every node and edge a level-order id
//! 2. [compute_root_distances] gives the edge-count depth of each vertex
//! 3. [compute_trunk_counts] runs the leaf walks
//! 4. [apply_trunk_annotation] (and [apply_node_ids]) store the results as
//!    annotations, so that writing the tree persists them
//!
//! [find_trunk] runs all of the above on one tree.
//!
//! # Example
//! ```
//! use phylotrunk::newick;
//! use phylotrunk::trunk::{find_trunk, TRUNK_KEY};
//!
//! let mut tree = newick::parse_str("((A:1,B:1):1,(C:1,D:1):1);").unwrap();
//! let report = find_trunk(&mut tree).unwrap();
//! assert_eq!(report.num_edges(), 6);
//! assert_eq!(report.counts().total(), 4);
//! assert!(tree.annotations().contains_key(TRUNK_KEY));
//! ```

mod counts;
mod labeling;

pub use self::counts::{
    RootDistances, TrunkCounts, apply_trunk_annotation, compute_root_distances,
    compute_trunk_counts,
};
pub use self::labeling::{Labeling, apply_node_ids};

use crate::error::AnalysisError;
use crate::model::PhyloTree;
use log::debug;

/// Annotation key of the per-edge trunk count.
pub const TRUNK_KEY: &str = "trunk";

/// Annotation key of the level-order node id.
pub const ID_KEY: &str = "id";

// =#========================================================================#=
// FULL PIPELINE
// =#========================================================================#=
/// Everything computed while finding the trunk of one tree.
#[derive(Debug, Clone)]
pub struct TrunkReport {
    labeling: Labeling,
    distances: RootDistances,
    counts: TrunkCounts,
}

impl TrunkReport {
    pub fn labeling(&self) -> &Labeling {
        &self.labeling
    }

    pub fn distances(&self) -> &RootDistances {
        &self.distances
    }

    pub fn counts(&self) -> &TrunkCounts {
        &self.counts
    }

    /// Total number of labeled edges.
    pub fn num_edges(&self) -> usize {
        self.labeling.num_edges()
    }
}

/// Labels `tree`, counts its trunk and writes `id` and `trunk` annotations.
///
/// The tree is only modified once all counts are known.
///
/// # Errors
/// Returns [AnalysisError::MalformedTree] if the tree has no root, a cycle
/// or vertices not reachable from the root.
pub fn find_trunk(tree: &mut PhyloTree) -> Result<TrunkReport, AnalysisError> {
    let labeling = Labeling::assign(tree)?;
    let distances = compute_root_distances(tree)?;

    debug!("Walking back from {} leaves", tree.num_leaves());
    let counts = compute_trunk_counts(tree, &labeling, &distances);
    debug!(
        "Trunk mass {} over {} edges, largest count {}",
        counts.total(),
        counts.len(),
        counts.max()
    );

    apply_node_ids(tree, &labeling);
    apply_trunk_annotation(tree, &labeling, &counts);

    Ok(TrunkReport {
        labeling,
        distances,
        counts,
    })
}
