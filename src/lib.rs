//! Phylotrunk identifies the trunk of a rooted phylogenetic tree and follows
//! the evolution of a discrete trait along it.
//!
//! The trunk of a tree is the set of lineages that persisted through time.
//! Counting for each edge how many leaf-to-root walks cross it gives a
//! `trunk` value per edge; edges with high values form the trunk.
//! Core functionality provided:
//! - Reading: the first tree of a Nexus file (as written by BEAST) or a
//!   Newick string, including `[&key=value,...]` vertex annotations.
//!   See [crate::newick], [crate::nexus] and [crate::io].
//! - Trunk identification: level-order node/edge ids and trunk counts,
//!   stored as `id` and `trunk` annotations. See [crate::trunk].
//! - Trunk trait walk: switches and permanence of a discrete trait along the
//!   edges whose trunk count exceeds a threshold. See [crate::walker].
//! - Reporting: annotated trees in Newick or Nexus and CSV tables of the
//!   walk. See [crate::report].
//! - Tree model: multifurcating trees stored in an arena, vertices addressed
//!   by index, annotations kept in a side table. See [crate::model].
//!
//! Two binaries, `findtrunk` and `trunktraitevolution`, wrap the pipeline
//! (default cargo feature `cli`).
//!
//! Limitations:
//! - Only the first tree of an input file is analyzed
//! - Trees must be rooted
//!
//! # Example
//! ```
//! use phylotrunk::newick;
//! use phylotrunk::trunk::find_trunk;
//! use phylotrunk::walker::{walk_trunk, WalkConfig};
//!
//! let mut tree = newick::parse_str(
//!     "((A[&loc=ch,height=0]:1,B[&loc=de,height=0]:1)[&loc=ch,height=1]:1,\
//!       C[&loc=ch,height=0]:2)[&loc=ch,height=2];",
//! )?;
//! let report = find_trunk(&mut tree)?;
//! assert_eq!(report.num_edges(), 4);
//!
//! let result = walk_trunk(&tree, &WalkConfig::new("loc"))?;
//! assert_eq!(result.transitions().len(), 1);
//! assert_eq!(result.switch_count(), 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod io;
pub mod model;
pub mod newick;
pub mod nexus;
pub mod parser;
pub mod report;
pub mod trunk;
pub mod walker;

#[cfg(feature = "cli")]
pub mod cli;

pub use crate::error::AnalysisError;
pub use crate::io::{TreeFormat, read_tree, write_tree};
pub use crate::model::PhyloTree;
pub use crate::parser::ParsingError;
