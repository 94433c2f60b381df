/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Command-line interface structs, functions, and methods.
//!
//! Each command is implemented as a submodule exposing a `COMMAND_NAME`
//! constant, a `cli` function adding the command to the [`Command`] tree,
//! and a `main` function running it on its parsed matches.

use crate::arcs::ArcFile;
use crate::rank::pagerank::PageRank;
use anyhow::{Context, Result};
use clap::{Args, Command};
use std::path::{Path, PathBuf};

pub mod degrees;
pub mod rank;

#[derive(Args, Debug)]
/// Shared CLI arguments describing the layout of the arc file.
pub struct ArcsArgs {
    #[arg(long, default_value_t = 1)]
    /// How many header lines to skip at the start of the file.
    pub lines_to_skip: usize,

    #[arg(long, default_value_t = '\t')]
    /// The column separator.
    pub separator: char,

    #[arg(long, default_value_t = 0)]
    /// The index of the column containing the source node id.
    pub source_column: usize,

    #[arg(long, default_value_t = 2)]
    /// The index of the column containing the target node id.
    pub target_column: usize,

    #[arg(long, default_value_t = 1)]
    /// The index of the column containing the source node label.
    pub source_label_column: usize,

    #[arg(long, default_value_t = 3)]
    /// The index of the column containing the target node label.
    pub target_label_column: usize,
}

impl ArcsArgs {
    pub fn to_arc_file(&self, path: &Path) -> ArcFile {
        ArcFile {
            path: path.to_owned(),
            separator: self.separator,
            lines_to_skip: self.lines_to_skip,
            source_column: self.source_column,
            target_column: self.target_column,
            source_label_column: self.source_label_column,
            target_label_column: self.target_label_column,
        }
    }
}

#[derive(Args, Debug)]
/// Shared CLI arguments for the PageRank computation.
pub struct RankArgs {
    #[arg(short, long, default_value_t = PageRank::DEFAULT_ALPHA)]
    /// The damping factor, in the open interval (0..1).
    pub alpha: f64,

    #[arg(short, long, default_value_t = 3)]
    /// The number of power iterations (at least 1).
    pub iterations: usize,

    #[arg(short = 'k', long, default_value_t = 100)]
    /// How many entries to keep in the top and bottom ranked lists.
    pub num_results: usize,
}

#[derive(Args, Debug)]
/// Shared CLI arguments selecting the report directory.
pub struct OutputArgs {
    #[arg(short, long, default_value = "reports")]
    /// The directory where reports are written, created if missing.
    pub output_dir: PathBuf,
}

impl OutputArgs {
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Cannot create the report directory {}",
                self.output_dir.display()
            )
        })
    }
}

/// The entry point of the command-line interface.
pub fn main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();

    let command = Command::new("wikirank")
        .about("Streaming PageRank over WikiLinkGraphs-style arc files.")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .after_help(
            "Environment (noteworthy environment variables used):
RUST_LOG: configuration for env_logger; the binary defaults to `info`, which
  shows the progress of every scan.
",
        );
    let command = rank::cli(command);
    let command = degrees::cli(command);
    let matches = command.get_matches_from(args);

    match matches.subcommand() {
        Some((rank::COMMAND_NAME, sub_m)) => rank::main(sub_m),
        Some((degrees::COMMAND_NAME, sub_m)) => degrees::main(sub_m),
        Some((command_name, _)) => {
            // this shouldn't happen as clap should catch it
            eprintln!("Unknown command: {:?}", command_name);
            std::process::exit(1);
        }
        None => unreachable!("a subcommand is required"),
    }?;

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Pretty prints seconds in a humanly readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    let mut elapsed_seconds = elapsed as u64;
    let hours = elapsed_seconds / (60 * 60);
    elapsed_seconds %= 60 * 60;
    let minutes = elapsed_seconds / 60;
    elapsed_seconds %= 60;

    let mut result = String::new();
    if hours > 0 {
        result.push_str(&format!("{hours}h "));
    }
    if minutes > 0 {
        result.push_str(&format!("{minutes}m "));
    }
    result.push_str(&format!("{elapsed_seconds}s ({elapsed:.3}s)"));
    result
}
