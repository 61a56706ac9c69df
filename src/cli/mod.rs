//! Shared command line plumbing of the `findtrunk` and
//! `trunktraitevolution` binaries: argument structs, output path defaults
//! and logger setup.

mod args;
mod logging;

pub use self::args::{FindTrunkArgs, LogArgs, ReportPaths, TraitEvolutionArgs};
pub use self::logging::{init_logging, parse_level};
