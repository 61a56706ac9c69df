//! Annotates every edge of a tree with its trunk count.
//!
//! ```text
//! findtrunk -i input_tree.tree --input-format nexus -l rsv
//! ```

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use phylotrunk::cli::{FindTrunkArgs, init_logging};
use phylotrunk::{io, trunk};

fn main() -> anyhow::Result<()> {
    let args = FindTrunkArgs::parse();
    init_logging(&args.logging)?;
    debug!("findtrunk - Execution started");

    let mut tree = io::read_tree(&args.input, args.input_format)
        .with_context(|| format!("Cannot read tree from {}", args.input.display()))?;
    info!(
        "Read tree with {} leaves from {}",
        tree.num_leaves(),
        args.input.display()
    );

    let report = trunk::find_trunk(&mut tree).context("Cannot compute trunk counts")?;
    info!("Total number of edges: {}", report.num_edges());

    let output = args.output_path();
    io::write_tree(&output, &tree, args.output_format)
        .with_context(|| format!("Cannot write tree to {}", output.display()))?;
    info!("Annotated tree written to {}", output.display());

    Ok(())
}
