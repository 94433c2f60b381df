/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::cli::{ArcsArgs, OutputArgs};
use crate::degrees;
use crate::ids::IdMap;
use crate::report::{self, DegreeReport};
use crate::GraphError;
use anyhow::Result;
use clap::{ArgMatches, Args, Command, FromArgMatches};
use dsi_progress_logger::prelude::*;
use std::path::PathBuf;

pub const COMMAND_NAME: &str = "degrees";

#[derive(Args, Debug)]
#[command(
    about = "Compute the in- and out-degree distributions of an arc file without running PageRank."
)]
pub struct CliArgs {
    /// The arc file (a decompressed WikiLinkGraphs CSV).
    pub src: PathBuf,

    #[clap(flatten)]
    pub output: OutputArgs,

    #[clap(flatten)]
    pub arcs: ArcsArgs,
}

pub fn cli(command: Command) -> Command {
    command.subcommand(CliArgs::augment_args(Command::new(COMMAND_NAME)).display_order(0))
}

pub fn main(submatches: &ArgMatches) -> Result<()> {
    let args = CliArgs::from_arg_matches(submatches)?;
    args.output.ensure_dir()?;
    let arcs = args.arcs.to_arc_file(&args.src);

    let mut pl = ProgressLogger::default();
    pl.display_memory(true);

    let ids = IdMap::build(&arcs, &mut pl)?;
    if ids.is_empty() {
        return Err(GraphError::EmptyGraph.into());
    }
    let (outdeg, out_stats) = degrees::outdegrees(&arcs, &ids, &mut pl)?;
    let (indeg, _) = degrees::indegrees(&arcs, &ids, &mut pl)?;

    report::write_json(
        args.output.output_dir.join("degree_distributions.json"),
        &DegreeReport::new(&outdeg, &indeg, out_stats.valid),
    )
}
