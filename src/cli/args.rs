//! Command line arguments of `findtrunk` and `trunktraitevolution`.

use crate::io::TreeFormat;
use crate::walker::{TrunkThreshold, WalkConfig};
use clap::{Args, Parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Logging flags shared by both tools.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Log level (OFF, ERROR, WARN, INFO, DEBUG or TRACE; case-insensitive)
    #[arg(long = "log", value_name = "LEVEL", default_value = "INFO")]
    pub level: String,

    /// Write the log to this file instead of the terminal
    #[arg(long = "log-to-file", value_name = "FILE")]
    pub file: Option<PathBuf>,
}

// =#========================================================================#=
// FINDTRUNK
// =#========================================================================#=
/// Retrieve the phylogenetic trunk from the tree topology using a
/// reverse-tree-traversal approach.
///
/// Every edge gets a `trunk` annotation counting how many leaf-to-root walks
/// cross it, every node an `id` annotation with its level-order id.
#[derive(Debug, Clone, Parser)]
#[command(name = "findtrunk", version)]
pub struct FindTrunkArgs {
    /// Input tree file
    #[arg(short = 'i', long = "in", value_name = "FILE")]
    pub input: PathBuf,

    /// Input tree file format
    #[arg(long, value_enum)]
    pub input_format: TreeFormat,

    /// Output tree file [default: <input dir>/<label>_out.tree]
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output tree file format
    #[arg(long, value_enum, default_value_t = TreeFormat::Nexus)]
    pub output_format: TreeFormat,

    /// Label for the data contained in the tree
    #[arg(short = 'l', long, default_value = "")]
    pub label: String,

    #[command(flatten)]
    pub logging: LogArgs,
}

impl FindTrunkArgs {
    /// The given output file or the default next to the input.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| input_dir(&self.input).join(format!("{}_out.tree", self.label)))
    }
}

// =#========================================================================#=
// TRUNKTRAITEVOLUTION
// =#========================================================================#=
/// Compute the permanence and the number of switches of a discrete trait on
/// the tree trunk.
///
/// Expects a tree annotated by `findtrunk` that also carries `height` and the
/// monitored trait on every node.
#[derive(Debug, Clone, Parser)]
#[command(name = "trunktraitevolution", version)]
pub struct TraitEvolutionArgs {
    /// Input tree file
    #[arg(short = 'i', long = "in", value_name = "FILE")]
    pub input: PathBuf,

    /// Input tree file format
    #[arg(long, value_enum)]
    pub input_format: TreeFormat,

    /// Prefix of the two CSV output files [default: <input dir>/<label>_<feature>]
    #[arg(short = 'o', long = "out", value_name = "PREFIX")]
    pub output: Option<PathBuf>,

    /// Discrete trait to monitor for trunk switches
    #[arg(long, value_name = "NAME")]
    pub feature: String,

    /// Edges with a trunk count above this value are walked
    #[arg(
        long,
        value_name = "INT",
        default_value_t = TrunkThreshold::default(),
        allow_hyphen_values = true
    )]
    pub trunk_threshold: TrunkThreshold,

    /// Label for the data contained in the tree
    #[arg(short = 'l', long, default_value = "")]
    pub label: String,

    #[command(flatten)]
    pub logging: LogArgs,
}

impl TraitEvolutionArgs {
    pub fn walk_config(&self) -> WalkConfig {
        WalkConfig::new(self.feature.as_str()).with_threshold(self.trunk_threshold)
    }

    /// Paths of the switch log and the summary table.
    pub fn report_paths(&self) -> ReportPaths {
        let prefix = self.output.clone().unwrap_or_else(|| {
            input_dir(&self.input).join(format!("{}_{}", self.label, self.feature))
        });
        ReportPaths::from_prefix(&prefix)
    }
}

/// Output files of one trunk trait walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub switches: PathBuf,
    pub summary: PathBuf,
}

impl ReportPaths {
    /// `<prefix>_switches.csv` and `<prefix>_summary.csv`.
    pub fn from_prefix(prefix: &Path) -> Self {
        ReportPaths {
            switches: with_suffix(prefix, "_switches.csv"),
            summary: with_suffix(prefix, "_summary.csv"),
        }
    }
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(prefix.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

/// Directory holding `input`; empty (the working directory) for a bare file name.
fn input_dir(input: &Path) -> &Path {
    input.parent().unwrap_or_else(|| Path::new(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_findtrunk_default_output() {
        let args =
            FindTrunkArgs::parse_from(["findtrunk", "-i", "data/run1.trees", "--input-format", "nexus", "-l", "rsv"]);
        assert_eq!(args.output_path(), PathBuf::from("data/rsv_out.tree"));
        assert_eq!(args.output_format, TreeFormat::Nexus);
        assert_eq!(args.logging.level, "INFO");
    }

    #[test]
    fn test_findtrunk_explicit_output() {
        let args = FindTrunkArgs::parse_from([
            "findtrunk",
            "--in",
            "t.nwk",
            "--input-format",
            "newick",
            "--out",
            "x/annotated.nwk",
            "--output-format",
            "newick",
            "--log",
            "debug",
            "--log-to-file",
            "run.log",
        ]);
        assert_eq!(args.output_path(), PathBuf::from("x/annotated.nwk"));
        assert_eq!(args.output_format, TreeFormat::Newick);
        assert_eq!(args.logging.file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn test_trait_evolution_default_prefix() {
        let args = TraitEvolutionArgs::parse_from([
            "trunktraitevolution",
            "-i",
            "data/rsv_out.tree",
            "--input-format",
            "nexus",
            "--feature",
            "location",
            "-l",
            "rsv",
        ]);
        let paths = args.report_paths();
        assert_eq!(paths.switches, PathBuf::from("data/rsv_location_switches.csv"));
        assert_eq!(paths.summary, PathBuf::from("data/rsv_location_summary.csv"));
        assert_eq!(args.walk_config().threshold.value(), 0);
    }

    #[test]
    fn test_negative_threshold_is_rejected() {
        let parsed = TraitEvolutionArgs::try_parse_from([
            "trunktraitevolution",
            "-i",
            "t.tree",
            "--input-format",
            "nexus",
            "--feature",
            "location",
            "--trunk-threshold",
            "-2",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_threshold_is_parsed() {
        let args = TraitEvolutionArgs::try_parse_from([
            "trunktraitevolution",
            "-i",
            "t.tree",
            "--input-format",
            "nexus",
            "--feature",
            "location",
            "--trunk-threshold",
            "5",
        ])
        .unwrap();
        assert_eq!(args.walk_config().threshold.value(), 5);
    }
}
