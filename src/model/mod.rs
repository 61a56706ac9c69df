//! Data model for rooted phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [PhyloTree], which uses the arena pattern to store
//! [Vertex] nodes referenced by [VertexIndex]. Vertices may have any number
//! of children. Per-vertex key/value data such as BEAST `[&height=...]`
//! comments, node ids or trunk counts is kept in the [Annotations] side table.
//!
//! # Building trees
//! Trees are constructed during parsing via the [TreeBuilder] trait, which
//! decouples parsers from the concrete tree type; [PhyloTreeBuilder] builds
//! [PhyloTree]. Leaf labels pass through a [LabelResolver] first.

pub mod annotation;
pub mod label_resolver;
pub mod tree;
pub mod tree_builder;
pub mod vertex;

pub use annotation::{AnnotationValue, Annotations};
pub use label_resolver::LabelResolver;
pub use tree::{PhyloTree, VertexIndex};
pub use tree_builder::{PhyloTreeBuilder, TreeBuilder};
pub use vertex::{BranchLength, Vertex};
