/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::cli::{ArcsArgs, OutputArgs, RankArgs};
use crate::degrees;
use crate::ids::IdMap;
use crate::rank::pagerank::PageRank;
use crate::rank::{changes, incoming, select};
use crate::report::{
    self, ChangesReport, DatasetStats, DegreeReport, InvestigationReport, IterationReport, Metadata,
};
use crate::titles;
use crate::GraphError;
use anyhow::{ensure, Result};
use clap::{ArgMatches, Args, Command, FromArgMatches};
use dsi_progress_logger::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;

pub const COMMAND_NAME: &str = "rank";

#[derive(Args, Debug)]
#[command(
    about = "Compute PageRank over an arc file with one streaming pass per iteration. Writes a JSON report per iteration (including the uniform initial state), degree distributions, a change analysis between the first and the final iteration, run metadata, and a best-effort id-to-title map."
)]
pub struct CliArgs {
    /// The arc file (a decompressed WikiLinkGraphs CSV).
    pub src: PathBuf,

    #[arg(long)]
    /// After ranking, investigate the incoming links of this node id.
    pub investigate: Option<u64>,

    #[clap(flatten)]
    pub rank: RankArgs,

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
    ensure!(
        args.rank.alpha > 0.0 && args.rank.alpha < 1.0,
        "The damping factor must be in (0..1), got {}",
        args.rank.alpha
    );
    ensure!(args.rank.iterations >= 1, "At least one iteration is required");
    args.output.ensure_dir()?;
    let dir = &args.output.output_dir;
    let arcs = args.arcs.to_arc_file(&args.src);

    let mut pl = ProgressLogger::default();
    pl.display_memory(true);

    let ids = IdMap::build(&arcs, &mut pl)?;
    if ids.is_empty() {
        return Err(GraphError::EmptyGraph.into());
    }
    let (outdeg, out_stats) = degrees::outdegrees(&arcs, &ids, &mut pl)?;
    let (indeg, _) = degrees::indegrees(&arcs, &ids, &mut pl)?;
    let dataset_stats = DatasetStats {
        total_nodes: ids.len(),
        total_arcs: out_stats.valid,
    };

    report::write_json(
        dir.join("degree_distributions.json"),
        &DegreeReport::new(&outdeg, &indeg, out_stats.valid),
    )?;

    let mut pr = PageRank::new(&arcs, &ids, &outdeg)?;
    pr.alpha(args.rank.alpha);
    log::info!(
        "Computing PageRank (alpha={}, iterations={}) over {} nodes and {} arcs",
        args.rank.alpha,
        args.rank.iterations,
        ids.len(),
        out_stats.valid
    );

    // Ids mentioned by any report, for the final title lookup
    let mut wanted = HashSet::new();

    // Iteration 0 is the uniform initial state
    let initial = IterationReport::new(
        0,
        0.0,
        dataset_stats,
        pr.rank(),
        &ids,
        &indeg,
        args.rank.num_results,
    );
    wanted.extend(initial.referenced_ids());
    report::write_json(report::iteration_path(dir, 0), &initial)?;

    for iteration in 1..=args.rank.iterations {
        let l1_distance = pr.iterate(&mut pl)?;
        let iteration_report = IterationReport::new(
            iteration,
            l1_distance,
            dataset_stats,
            pr.rank(),
            &ids,
            &indeg,
            args.rank.num_results,
        );
        wanted.extend(iteration_report.referenced_ids());
        report::write_json(report::iteration_path(dir, iteration), &iteration_report)?;
    }

    let first = pr
        .first_iteration()
        .expect("at least one iteration has completed");
    let analysis = changes::analyze(first, pr.rank(), &indeg, &ids);
    let changes_report = ChangesReport::new(&analysis, &ids, pr.iteration());
    wanted.extend(changes_report.referenced_ids());
    report::write_json(dir.join("biggest_changes.json"), &changes_report)?;

    report::write_json(
        dir.join("metadata.json"),
        &Metadata {
            dataset: args
                .src
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| args.src.display().to_string()),
            total_nodes: ids.len(),
            total_arcs: out_stats.valid,
            iterations: args.rank.iterations,
            alpha: args.rank.alpha,
        },
    )?;

    let investigation = match args.investigate {
        Some(target) => {
            match incoming::investigate(&arcs, &ids, &outdeg, &indeg, pr.rank(), target, &mut pl) {
                Ok(investigation) => {
                    wanted.insert(target);
                    wanted.extend(investigation.incoming.iter().map(|link| link.id));
                    Some(investigation)
                }
                Err(e)
                    if e.downcast_ref::<GraphError>()
                        .is_some_and(|e| matches!(e, GraphError::NodeNotFound(_))) =>
                {
                    log::error!("{e}; the ranking reports are unaffected");
                    None
                }
                Err(e) => return Err(e),
            }
        }
        None => None,
    };

    // All numeric results are final; from here on titles are attached as
    // purely additive annotations
    let titles = titles::lookup(&arcs, &wanted, &mut pl)?;
    report::write_json(dir.join("titles.json"), &titles)?;
    if let Some(investigation) = &investigation {
        report::write_json(
            report::investigation_path(dir, investigation.target),
            &InvestigationReport::new(investigation, &titles),
        )?;
    }

    log::info!("Top 25 nodes by PageRank:");
    for (i, node) in select::top_k(pr.rank(), &ids, 25).into_iter().enumerate() {
        log::info!(
            "{:2}. id {:<10} score {:e}",
            i + 1,
            ids.original(node),
            pr.rank()[node]
        );
    }

    Ok(())
}
