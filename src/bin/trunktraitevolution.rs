//! Follows a discrete trait along the trunk of a `findtrunk`-annotated tree
//! and reports its switches and permanence as two CSV tables.
//!
//! ```text
//! trunktraitevolution -i rsv_out.tree --input-format nexus --feature location
//! ```

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use phylotrunk::cli::{TraitEvolutionArgs, init_logging};
use phylotrunk::{io, report, walker};
use std::fs::File;

fn main() -> anyhow::Result<()> {
    let args = TraitEvolutionArgs::parse();
    init_logging(&args.logging)?;
    debug!("trunktraitevolution - Execution started");

    let tree = io::read_tree(&args.input, args.input_format)
        .with_context(|| format!("Cannot read tree from {}", args.input.display()))?;

    // Walk completely before creating any output file
    let config = args.walk_config();
    let result = walker::walk_trunk(&tree, &config)
        .with_context(|| format!("Cannot walk trait [{}] along the trunk", config.trait_name))?;

    let paths = args.report_paths();
    let switches = File::create(&paths.switches)
        .with_context(|| format!("Cannot create {}", paths.switches.display()))?;
    report::write_switches_csv(switches, result.transitions())
        .with_context(|| format!("Cannot write {}", paths.switches.display()))?;

    let summary = File::create(&paths.summary)
        .with_context(|| format!("Cannot create {}", paths.summary.display()))?;
    report::write_summary_csv(summary, result.durations())
        .with_context(|| format!("Cannot write {}", paths.summary.display()))?;

    info!(
        "Wrote {} transitions to {} and the summary to {}",
        result.transitions().len(),
        paths.switches.display(),
        paths.summary.display()
    );
    Ok(())
}
