//! Walk of a discrete trait along the tree trunk.
//!
//! Given a tree carrying `trunk` counts (see [crate::trunk]), a `height`
//! and a discrete trait on every vertex, the walk follows the edges whose
//! trunk count exceeds a threshold and records how the trait changes:
//! - a transition log with one [TransitionRecord] per walked edge
//! - the walked duration per (from, to) trait pair, see [TraitDurations]
//! - the number of switches, i.e. walked edges where the value changes
//!
//! # Walk order
//! Vertices are taken in pre-order. A vertex not yet visited becomes the
//! context, then its children are processed in stored order. Each passing
//! child is compared against the current context and then becomes the
//! context itself, so siblings are chained. Processed children are marked
//! visited and never serve as an outer context later; their own children
//! are reached only as outer pre-order vertices.

mod config;
mod records;

pub use self::config::{TrunkThreshold, WalkConfig};
pub use self::records::{TraitDurations, TransitionRecord, WalkNode};

use crate::error::AnalysisError;
use crate::model::PhyloTree;
use crate::trunk::Labeling;
use log::{debug, info};

/// Annotation key of the node height (age).
pub const HEIGHT_KEY: &str = "height";

/// Everything produced by one walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkResult {
    transitions: Vec<TransitionRecord>,
    durations: TraitDurations,
    switch_count: usize,
}

impl WalkResult {
    /// Walked edges in traversal order.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn durations(&self) -> &TraitDurations {
        &self.durations
    }

    pub fn switch_count(&self) -> usize {
        self.switch_count
    }
}

/// Context the next walked child is compared against.
struct Context<'a> {
    id: usize,
    trait_value: &'a str,
    height: f64,
}

impl<'a> Context<'a> {
    fn of(node: &'a WalkNode) -> Self {
        Context {
            id: node.id,
            trait_value: &node.trait_value,
            height: node.height,
        }
    }
}

/// Walks the trunk of `tree` and records the evolution of
/// `config.trait_name` on it.
///
/// Node ids are the level-order ids of [Labeling::assign], the same ones
/// `findtrunk` writes as `id` annotation.
///
/// # Errors
/// - [AnalysisError::MalformedTree] if the tree is not well formed
/// - [AnalysisError::MissingAnnotation] / [AnalysisError::InvalidAnnotation]
///   if any vertex lacks a usable trait or `height`, or a non-root vertex a
///   usable `trunk`; checked for all vertices before walking
/// - [AnalysisError::MissingBranchLength] if a walked edge has no length
pub fn walk_trunk(tree: &PhyloTree, config: &WalkConfig) -> Result<WalkResult, AnalysisError> {
    let labeling = Labeling::assign(tree)?;
    let nodes = (0..tree.num_vertices())
        .map(|v| WalkNode::from_annotations(tree, &labeling, v, &config.trait_name))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "Walking trait [{}] with trunk threshold {}",
        config.trait_name, config.threshold
    );

    let mut visited = vec![false; tree.num_vertices()];
    let mut result = WalkResult::default();

    for vertex in tree.pre_order_iter() {
        if visited[vertex.index()] {
            continue;
        }
        let mut context = Context::of(&nodes[vertex.index()]);

        for &child in vertex.children() {
            let child_node = &nodes[child];
            let on_trunk = child_node
                .trunk
                .is_some_and(|count| config.threshold.is_exceeded_by(count));
            if !on_trunk || visited[child] {
                continue;
            }

            let duration = tree[child]
                .branch_length()
                .map(|bl| *bl)
                .ok_or(AnalysisError::MissingBranchLength { vertex: child })?;

            result
                .durations
                .add(context.trait_value, &child_node.trait_value, duration);
            let is_switch = context.trait_value != child_node.trait_value;
            if is_switch {
                result.switch_count += 1;
            }

            result.transitions.push(TransitionRecord {
                from_id: context.id,
                to_id: child_node.id,
                from_age: context.height,
                to_age: child_node.height,
                duration,
                from_value: context.trait_value.to_string(),
                to_value: child_node.trait_value.clone(),
                switch_flag: u8::from(is_switch),
            });

            context = Context::of(child_node);
            visited[child] = true;
        }
    }

    info!(
        "The discrete trait [{}] shows {} switches on the trunk",
        config.trait_name, result.switch_count
    );
    Ok(result)
}
