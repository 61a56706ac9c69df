//! Typed per-vertex input of the walk and the records it produces.

use crate::error::AnalysisError;
use crate::model::{PhyloTree, VertexIndex};
use crate::trunk::{Labeling, TRUNK_KEY};
use crate::walker::HEIGHT_KEY;
use std::collections::BTreeMap;

// =#========================================================================#=
// WALK NODE
// =#========================================================================#=
/// Annotations of one vertex, checked and converted before the walk.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkNode {
    /// Level-order node id
    pub id: usize,
    /// Textual rendering of the monitored trait
    pub trait_value: String,
    pub height: f64,
    /// Trunk count of the incoming edge, `None` for the root
    pub trunk: Option<u64>,
}

impl WalkNode {
    /// Reads the walk node of `vertex` from the annotations of `tree`.
    ///
    /// # Errors
    /// - [AnalysisError::MissingAnnotation] if the trait or `height` is
    ///   absent, or `trunk` on a non-root vertex
    /// - [AnalysisError::InvalidAnnotation] if `height` is not numeric or
    ///   `trunk` is not a non-negative integer
    pub fn from_annotations(
        tree: &PhyloTree,
        labeling: &Labeling,
        vertex: VertexIndex,
        trait_name: &str,
    ) -> Result<Self, AnalysisError> {
        let annotations = tree.annotations();
        let lookup = |key: &str| {
            annotations
                .get(key, vertex)
                .ok_or_else(|| AnalysisError::missing_annotation(key, vertex))
        };

        let trait_value = lookup(trait_name)?.to_string();

        let raw_height = lookup(HEIGHT_KEY)?;
        let height = raw_height
            .as_f64()
            .ok_or_else(|| AnalysisError::invalid_annotation(HEIGHT_KEY, vertex, raw_height))?;

        let trunk = if tree[vertex].is_root() {
            None
        } else {
            let raw_trunk = lookup(TRUNK_KEY)?;
            let count = raw_trunk
                .as_count()
                .ok_or_else(|| AnalysisError::invalid_annotation(TRUNK_KEY, vertex, raw_trunk))?;
            Some(count)
        };

        Ok(WalkNode {
            id: labeling.node_id(vertex),
            trait_value,
            height,
            trunk,
        })
    }
}

// =#========================================================================#=
// TRANSITION RECORD
// =#========================================================================#=
/// One walked trunk edge, from the current context to a child.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRecord {
    pub from_id: usize,
    pub to_id: usize,
    /// Height of the context node
    pub from_age: f64,
    /// Height of the child node
    pub to_age: f64,
    /// Branch length of the child
    pub duration: f64,
    pub from_value: String,
    pub to_value: String,
    /// 1 if the trait value changed along this edge, 0 otherwise
    pub switch_flag: u8,
}

impl TransitionRecord {
    pub fn is_switch(&self) -> bool {
        self.switch_flag == 1
    }
}

// =#========================================================================#=
// TRAIT DURATIONS
// =#========================================================================#=
/// Summed walked duration for every observed (from, to) trait value pair.
///
/// Both levels are ordered by trait value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraitDurations {
    matrix: BTreeMap<String, BTreeMap<String, f64>>,
}

impl TraitDurations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `duration` to the (from, to) pair.
    pub fn add(&mut self, from: &str, to: &str, duration: f64) {
        *self
            .matrix
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_insert(0.0) += duration;
    }

    /// Summed duration of the (from, to) pair, if it was observed.
    pub fn get(&self, from: &str, to: &str) -> Option<f64> {
        self.matrix.get(from).and_then(|row| row.get(to)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Iterates all observed `(from, to, duration)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.matrix.iter().flat_map(|(from, row)| {
            row.iter()
                .map(move |(to, duration)| (from.as_str(), to.as_str(), *duration))
        })
    }

    /// Permanence: time spent on the trunk without leaving each trait value.
    ///
    /// This is the diagonal of the matrix, ordered by trait value.
    pub fn permanence(&self) -> impl Iterator<Item = (&str, f64)> {
        self.iter()
            .filter(|(from, to, _)| from == to)
            .map(|(value, _, duration)| (value, duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations_accumulate_and_order() {
        let mut durations = TraitDurations::new();
        durations.add("b", "b", 1.0);
        durations.add("a", "b", 0.5);
        durations.add("b", "b", 2.0);
        durations.add("a", "a", 4.0);

        assert_eq!(durations.get("b", "b"), Some(3.0));
        assert_eq!(durations.get("b", "a"), None);
        let all: Vec<_> = durations.iter().collect();
        assert_eq!(all, vec![("a", "a", 4.0), ("a", "b", 0.5), ("b", "b", 3.0)]);
        let permanence: Vec<_> = durations.permanence().collect();
        assert_eq!(permanence, vec![("a", 4.0), ("b", 3.0)]);
    }
}
