/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Degree computation by streaming passes.
//!
//! Out-degrees drive the rank-distribution step (a node with out-degree zero
//! is dangling); in-degrees are diagnostic only. Each vector is computed by a
//! dedicated full scan of the arc file: keeping the passes separate is part
//! of the external-memory design, which never materializes an adjacency
//! structure. Counts are pure sums, so they do not depend on the order in
//! which arcs appear.

use crate::arcs::ArcFile;
use crate::ids::IdMap;
use anyhow::Result;
use dsi_progress_logger::ProgressLog;
use itertools::Itertools;

/// Per-scan arc counters, logged after every pass over the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcStats {
    /// Non-self-loop arcs with both endpoints in the id map.
    pub valid: u64,
    /// Arcs with equal endpoints, always excluded.
    pub self_loops: u64,
    /// Arcs with at least one endpoint missing from the id map.
    pub unresolved: u64,
}

/// Computes the out-degree of every node with one full scan.
pub fn outdegrees(
    arcs: &ArcFile,
    ids: &IdMap,
    pl: &mut impl ProgressLog,
) -> Result<(Box<[u32]>, ArcStats)> {
    count_degrees(arcs, ids, pl, "Computing out-degrees...", |source, _| source)
}

/// Computes the in-degree of every node with one full scan.
pub fn indegrees(
    arcs: &ArcFile,
    ids: &IdMap,
    pl: &mut impl ProgressLog,
) -> Result<(Box<[u32]>, ArcStats)> {
    count_degrees(arcs, ids, pl, "Computing in-degrees...", |_, target| target)
}

fn count_degrees(
    arcs: &ArcFile,
    ids: &IdMap,
    pl: &mut impl ProgressLog,
    msg: &str,
    pick: fn(usize, usize) -> usize,
) -> Result<(Box<[u32]>, ArcStats)> {
    let mut degrees = vec![0u32; ids.len()].into_boxed_slice();
    let mut stats = ArcStats::default();
    let mut iter = arcs.arcs()?;

    pl.item_name("arc");
    pl.expected_updates(None);
    pl.start(msg);
    for arc in &mut iter {
        let (source, target) = arc?;
        pl.light_update();
        if source == target {
            stats.self_loops += 1;
            continue;
        }
        let (Some(source), Some(target)) = (ids.dense(source), ids.dense(target)) else {
            stats.unresolved += 1;
            continue;
        };
        degrees[pick(source, target)] += 1;
        stats.valid += 1;
    }
    pl.done();

    log::info!(
        "{} valid arcs ({} self-loops and {} arcs with unresolved endpoints skipped)",
        stats.valid,
        stats.self_loops,
        stats.unresolved
    );
    Ok((degrees, stats))
}

/// Returns the degree histogram as (degree, node count) pairs in ascending
/// degree order.
pub fn distribution(degrees: &[u32]) -> Vec<(u32, u64)> {
    let mut histogram = degrees
        .iter()
        .copied()
        .counts()
        .into_iter()
        .map(|(degree, count)| (degree, count as u64))
        .collect::<Vec<_>>();
    histogram.sort_unstable_by_key(|&(degree, _)| degree);
    histogram
}
